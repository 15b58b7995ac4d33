//! Stage and task records.

use crate::RUNNING_STATUS;

/// The active stage of a job, as of the latest poll.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageSnapshot {
    pub stage_id: u64,
    pub attempt_id: u32,
    pub name: String,
    pub complete_tasks: u32,
    pub active_tasks: u32,
    pub failed_tasks: u32,
    pub total_tasks: u32,
}

impl StageSnapshot {
    /// Fraction of tasks completed, in `[0, 1]`.
    ///
    /// A stage with no tasks reports zero progress.
    pub fn progress(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        (f64::from(self.complete_tasks) / f64::from(self.total_tasks)).clamp(0.0, 1.0)
    }

    /// `complete/total` label for progress bars.
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.complete_tasks, self.total_tasks)
    }
}

/// One row of a stage's task table in the web UI.
///
/// Cells are kept as the UI renders them (`"1.2 min"`, `"64.0 MB / 1000"`);
/// they are logged and displayed verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskRow {
    pub index: String,
    pub task_id: String,
    pub status: String,
    pub locality: String,
    pub executor_id: String,
    pub host: String,
    pub launch_time: String,
    pub duration: String,
    pub gc_time: String,
    pub input: String,
}

impl TaskRow {
    /// Whether the task is still running.
    pub fn is_running(&self) -> bool {
        self.status.eq_ignore_ascii_case(RUNNING_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_of_empty_stage_is_zero() {
        let stage = StageSnapshot::default();
        assert_eq!(stage.progress(), 0.0);
        assert_eq!(stage.progress_label(), "0/0");
    }

    #[test]
    fn progress_is_fraction_complete() {
        let stage = StageSnapshot {
            complete_tasks: 3,
            total_tasks: 12,
            ..Default::default()
        };
        assert!((stage.progress() - 0.25).abs() < f64::EPSILON);
        assert_eq!(stage.progress_label(), "3/12");
    }

    #[test]
    fn running_status_is_case_insensitive() {
        let task = TaskRow {
            status: "running".to_string(),
            ..Default::default()
        };
        assert!(task.is_running());

        let task = TaskRow {
            status: "SUCCESS".to_string(),
            ..Default::default()
        };
        assert!(!task.is_running());
    }
}
