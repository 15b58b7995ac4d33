//! Telemetry - everything one poll cycle collected.

use crate::{ClusterTotals, ExecutorSnapshot, StageSnapshot, TaskRow};

/// A stage that was active during the poll, with the task rows scraped for it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStage {
    pub stage: StageSnapshot,
    pub tasks: Vec<TaskRow>,
}

impl ActiveStage {
    /// Tasks still running.
    pub fn running_tasks(&self) -> impl Iterator<Item = &TaskRow> {
        self.tasks.iter().filter(|t| t.is_running())
    }
}

/// A point-in-time view of a running application.
///
/// Built completely before it is handed to a presenter, so a cycle either
/// yields a whole `Telemetry` or nothing.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telemetry {
    /// Application the data belongs to.
    pub app_id: String,

    /// Unix timestamp in milliseconds when the application attempt started,
    /// if the source knows it.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub started_ms: Option<u64>,

    /// Unix timestamp in milliseconds when this poll completed.
    pub timestamp_ms: u64,

    /// Worker executors, driver excluded, in API order.
    pub executors: Vec<ExecutorSnapshot>,

    /// Stages reported `ACTIVE`, in API order.
    pub active_stages: Vec<ActiveStage>,
}

impl Telemetry {
    /// The stage presenters treat as "the" active stage: the last active one
    /// in API order.
    pub fn active_stage(&self) -> Option<&ActiveStage> {
        self.active_stages.last()
    }

    /// Cluster-wide sums over the executors.
    pub fn totals(&self) -> ClusterTotals {
        ClusterTotals::from_executors(&self.executors)
    }

    /// Seconds elapsed between the attempt start and this poll.
    pub fn elapsed_secs(&self) -> Option<f64> {
        let started = self.started_ms?;
        Some(self.timestamp_ms.saturating_sub(started) as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(id: u64) -> ActiveStage {
        ActiveStage {
            stage: StageSnapshot {
                stage_id: id,
                ..Default::default()
            },
            tasks: vec![],
        }
    }

    #[test]
    fn last_active_stage_wins() {
        let telemetry = Telemetry {
            active_stages: vec![stage(7), stage(3)],
            ..Default::default()
        };
        assert_eq!(telemetry.active_stage().unwrap().stage.stage_id, 3);
    }

    #[test]
    fn elapsed_requires_start_time() {
        let mut telemetry = Telemetry {
            timestamp_ms: 12_345,
            ..Default::default()
        };
        assert!(telemetry.elapsed_secs().is_none());

        telemetry.started_ms = Some(2_345);
        assert_eq!(telemetry.elapsed_secs(), Some(10.0));
    }

    #[test]
    fn running_tasks_filters_by_status() {
        let active = ActiveStage {
            stage: StageSnapshot::default(),
            tasks: vec![
                TaskRow {
                    task_id: "1".into(),
                    status: "RUNNING".into(),
                    ..Default::default()
                },
                TaskRow {
                    task_id: "2".into(),
                    status: "SUCCESS".into(),
                    ..Default::default()
                },
            ],
        };
        let running: Vec<_> = active.running_tasks().map(|t| t.task_id.as_str()).collect();
        assert_eq!(running, vec!["1"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_without_unknown_start() {
        let telemetry = Telemetry {
            app_id: "app-1".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&telemetry).unwrap();
        assert!(json.contains("\"app_id\":\"app-1\""));
        assert!(!json.contains("started_ms"));
    }
}
