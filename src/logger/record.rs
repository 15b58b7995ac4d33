//! Pipe-delimited telemetry records.
//!
//! Every record starts with the same header after its kind:
//! `{phase}|{interval}|{elapsed}|{appId}|{executors}`. The timestamp is
//! prepended by the writer.

use std::fmt;

use flockwatch_types::{StageSnapshot, Telemetry};

use super::phase::Phase;

/// Stage id written before any stage has been seen.
const NO_STAGE_ID: &str = "-1";

/// Record kinds, in the order a cycle emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Tasks,
    Nodes,
    Total,
    Scale,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            RecordKind::Tasks => "TASKS",
            RecordKind::Nodes => "NODES",
            RecordKind::Total => "TOTAL",
            RecordKind::Scale => "SCALE",
        };
        f.write_str(tag)
    }
}

/// Fields shared by every record of one cycle.
#[derive(Debug)]
pub struct RecordHeader<'a> {
    pub phase: &'a Phase,
    pub elapsed_secs: f64,
    pub app_id: &'a str,
    pub executors: usize,
}

impl fmt::Display for RecordHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{:.2}|{}|{}",
            self.phase.name, self.phase.interval, self.elapsed_secs, self.app_id, self.executors
        )
    }
}

/// `{stageId}|{stageName}` of the stage records refer to.
struct StageFields<'a>(Option<&'a StageSnapshot>);

impl fmt::Display for StageFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(stage) => write!(f, "{}|{}", stage.stage_id, stage.name),
            None => write!(f, "{}|", NO_STAGE_ID),
        }
    }
}

/// Format every record of one cycle.
///
/// `stage` is the stage NODES, TOTAL and SCALE refer to: the current
/// active stage, or the last one seen when none is active. TASKS rows carry
/// the stage they were scraped from.
pub fn records(
    header: &RecordHeader<'_>,
    telemetry: &Telemetry,
    stage: Option<&StageSnapshot>,
) -> Vec<String> {
    let mut out = Vec::new();

    for active in &telemetry.active_stages {
        let stage_fields = StageFields(Some(&active.stage));
        for task in active.running_tasks() {
            out.push(format!(
                "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
                RecordKind::Tasks,
                header,
                task.executor_id,
                task.host,
                stage_fields,
                task.task_id,
                task.locality,
                task.launch_time,
                task.duration,
                task.gc_time,
                task.input,
                task.status,
            ));
        }
    }

    let stage_fields = StageFields(stage);
    for e in &telemetry.executors {
        out.push(format!(
            "{}|{}|{}|{}|{}|{}|{}|{:.2}|{:.2}",
            RecordKind::Nodes,
            header,
            e.id,
            e.host_port,
            stage_fields,
            e.rdd_blocks,
            e.total_tasks,
            e.duration_per_core_secs(),
            e.input_megabytes()
        ));
    }

    let totals = telemetry.totals();
    out.push(format!(
        "{}|{}|{}|{}|{}|{:.2}|{:.2}",
        RecordKind::Total,
        header,
        stage_fields,
        totals.rdd_blocks,
        totals.total_tasks,
        totals.duration_secs,
        totals.input_megabytes
    ));

    if let Some(avg) = totals.averages() {
        out.push(format!(
            "{}|{}|{}|{:.2}|{:.2}|{:.2}|{:.2}",
            RecordKind::Scale,
            header,
            stage_fields,
            avg.rdd_blocks,
            avg.total_tasks,
            avg.duration_secs,
            avg.input_megabytes
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flockwatch_types::{ActiveStage, ExecutorSnapshot, TaskRow};

    fn task(id: &str, status: &str, executor: &str) -> TaskRow {
        TaskRow {
            index: id.to_string(),
            task_id: id.to_string(),
            status: status.to_string(),
            locality: "NODE_LOCAL".to_string(),
            executor_id: executor.to_string(),
            host: format!("node{executor}"),
            launch_time: "2019/03/12 10:11:12".to_string(),
            duration: "4 s".to_string(),
            gc_time: "0.1 s".to_string(),
            input: "64.0 MB / 1000".to_string(),
        }
    }

    fn telemetry() -> Telemetry {
        Telemetry {
            app_id: "app-1".to_string(),
            started_ms: Some(0),
            timestamp_ms: 2500,
            executors: vec![
                ExecutorSnapshot::builder("1")
                    .host_port("node1:40001")
                    .cores(4)
                    .total_tasks(14)
                    .total_duration_ms(8000)
                    .total_input_bytes(2 * 1024 * 1024)
                    .rdd_blocks(2)
                    .build(),
                ExecutorSnapshot::builder("2")
                    .host_port("node2:40002")
                    .cores(2)
                    .total_tasks(21)
                    .total_duration_ms(3000)
                    .rdd_blocks(3)
                    .build(),
            ],
            active_stages: vec![ActiveStage {
                stage: StageSnapshot {
                    stage_id: 4,
                    name: "collect".to_string(),
                    ..Default::default()
                },
                tasks: vec![task("41", "RUNNING", "2"), task("40", "SUCCESS", "1")],
            }],
        }
    }

    fn header(phase: &Phase) -> RecordHeader<'_> {
        RecordHeader {
            phase,
            elapsed_secs: 2.5,
            app_id: "app-1",
            executors: 2,
        }
    }

    #[test]
    fn full_cycle() {
        let phase = Phase::default();
        let t = telemetry();
        let stage = t.active_stage().map(|s| &s.stage);
        let lines = records(&header(&phase), &t, stage);

        assert_eq!(
            lines,
            vec![
                "TASKS|None|-1|2.50|app-1|2|2|node2|4|collect|41|NODE_LOCAL|2019/03/12 10:11:12|4 s|0.1 s|64.0 MB / 1000|RUNNING",
                "NODES|None|-1|2.50|app-1|2|1|node1:40001|4|collect|2|14|2.00|2.00",
                "NODES|None|-1|2.50|app-1|2|2|node2:40002|4|collect|3|21|1.50|0.00",
                "TOTAL|None|-1|2.50|app-1|2|4|collect|5|35|3.50|2.00",
                "SCALE|None|-1|2.50|app-1|2|4|collect|2.50|17.50|1.75|1.00",
            ]
        );
    }

    #[test]
    fn only_running_tasks_are_logged() {
        let phase = Phase::default();
        let t = telemetry();
        let lines = records(&header(&phase), &t, None);
        let tasks: Vec<_> = lines.iter().filter(|l| l.starts_with("TASKS")).collect();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].ends_with("|RUNNING"));
    }

    #[test]
    fn no_stage_yet() {
        let phase = Phase::default();
        let mut t = telemetry();
        t.active_stages.clear();
        let lines = records(&header(&phase), &t, None);
        assert_eq!(lines[0], "NODES|None|-1|2.50|app-1|2|1|node1:40001|-1||2|14|2.00|2.00");
    }

    #[test]
    fn no_scale_without_executors() {
        let phase = Phase {
            name: "BFE".to_string(),
            interval: "3".to_string(),
        };
        let mut t = telemetry();
        t.executors.clear();
        t.active_stages.clear();
        let header = RecordHeader {
            executors: 0,
            ..header(&phase)
        };

        let lines = records(&header, &t, None);
        assert_eq!(lines, vec!["TOTAL|BFE|3|2.50|app-1|0|-1||0|0|0.00|0.00"]);
    }
}
