//! Response schemas of the Spark monitoring REST API (`/api/v1`).
//!
//! Only the fields flockwatch reads are modelled; everything else in the
//! payloads is ignored. Missing numeric fields default to zero so older
//! Spark versions still parse.

use serde::Deserialize;

/// An entry of `/api/v1/applications`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attempts: Vec<ApplicationAttempt>,
}

impl ApplicationInfo {
    /// Start time of the first attempt, in Unix milliseconds.
    pub fn start_time_ms(&self) -> Option<u64> {
        self.attempts.first().and_then(|a| a.start_time_epoch)
    }
}

/// One attempt of an application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAttempt {
    #[serde(default)]
    pub start_time_epoch: Option<u64>,
    #[serde(default)]
    pub completed: bool,
}

/// An entry of `/api/v1/applications/{id}/executors`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorSummary {
    pub id: String,
    #[serde(default)]
    pub host_port: String,
    #[serde(default)]
    pub total_cores: u32,
    #[serde(default)]
    pub active_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u64,
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub total_duration: u64,
    #[serde(default)]
    pub total_input_bytes: u64,
    #[serde(default)]
    pub rdd_blocks: u64,
}

/// An entry of `/api/v1/applications/{id}/stages` and of the per-stage
/// attempt list `/api/v1/applications/{id}/stages/{stageId}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageData {
    pub status: String,
    pub stage_id: u64,
    #[serde(default)]
    pub attempt_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub num_tasks: u32,
    #[serde(default)]
    pub num_active_tasks: u32,
    #[serde(default)]
    pub num_complete_tasks: u32,
    #[serde(default)]
    pub num_failed_tasks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_executor() {
        let json = r#"{
            "id": "3",
            "hostPort": "node3:40123",
            "isActive": true,
            "rddBlocks": 12,
            "totalCores": 4,
            "activeTasks": 2,
            "completedTasks": 40,
            "totalTasks": 42,
            "totalDuration": 81234,
            "totalInputBytes": 1048576,
            "memoryUsed": 0
        }"#;

        let e: ExecutorSummary = serde_json::from_str(json).unwrap();
        assert_eq!(e.id, "3");
        assert_eq!(e.host_port, "node3:40123");
        assert_eq!(e.total_cores, 4);
        assert_eq!(e.active_tasks, 2);
        assert_eq!(e.completed_tasks, 40);
        assert_eq!(e.total_duration, 81234);
        assert_eq!(e.rdd_blocks, 12);
    }

    #[test]
    fn deserialize_application_start_time() {
        let json = r#"[{
            "id": "app-20190312101010-0001",
            "name": "FlockFinderMergeLast",
            "attempts": [{ "startTimeEpoch": 1552410610000, "completed": false }]
        }]"#;

        let apps: Vec<ApplicationInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(apps[0].id, "app-20190312101010-0001");
        assert_eq!(apps[0].start_time_ms(), Some(1552410610000));
    }

    #[test]
    fn stage_requires_status() {
        let json = r#"{ "stageId": 4, "name": "collect" }"#;
        assert!(serde_json::from_str::<StageData>(json).is_err());
    }
}
