//! Conversion of raw REST payloads into flat telemetry records.
//!
//! Everything here is pure: it takes parsed responses and returns snapshots,
//! so the rules (driver exclusion, active-task clamp, active-stage
//! selection) are testable without a cluster.

use flockwatch_adapters::api::{ExecutorSummary, StageData};
use flockwatch_types::{ExecutorSnapshot, StageSnapshot, ACTIVE_STATUS, DRIVER_ID};

use crate::error::PollError;

/// Convert the executor list, dropping the driver.
///
/// Active tasks are clamped to the executor's cores.
pub fn executors(raw: Vec<ExecutorSummary>) -> Vec<ExecutorSnapshot> {
    raw.into_iter()
        .filter(|e| e.id != DRIVER_ID)
        .map(|e| {
            ExecutorSnapshot::builder(e.id)
                .host_port(e.host_port)
                .cores(e.total_cores)
                .active_tasks(e.active_tasks)
                .completed_tasks(e.completed_tasks)
                .total_tasks(e.total_tasks)
                .total_duration_ms(e.total_duration)
                .total_input_bytes(e.total_input_bytes)
                .rdd_blocks(e.rdd_blocks)
                .build()
        })
        .collect()
}

/// Stages whose status is `ACTIVE`, in response order.
pub fn active_stages(stages: &[StageData]) -> Vec<&StageData> {
    stages.iter().filter(|s| s.status == ACTIVE_STATUS).collect()
}

/// Build the snapshot of an active stage.
///
/// The name is taken from the first entry of the stage's attempt list; a
/// stage without attempts is treated as a failed cycle.
pub fn stage_snapshot(stage: &StageData, attempts: &[StageData]) -> Result<StageSnapshot, PollError> {
    let first = attempts.first().ok_or(PollError::NoStageAttempts(stage.stage_id))?;

    Ok(StageSnapshot {
        stage_id: stage.stage_id,
        attempt_id: stage.attempt_id,
        name: first.name.clone(),
        complete_tasks: stage.num_complete_tasks,
        active_tasks: stage.num_active_tasks,
        failed_tasks: stage.num_failed_tasks,
        total_tasks: stage.num_tasks,
    })
}
