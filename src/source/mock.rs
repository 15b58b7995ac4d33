//! In-memory cluster for tests.
//!
//! Payloads are stored as JSON text and parsed on every request, so a test
//! can hand the poller a malformed response exactly the way a misbehaving
//! server would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use flockwatch_adapters::api::{ApplicationInfo, ExecutorSummary, StageData};
use flockwatch_adapters::AdapterError;
use flockwatch_types::TaskRow;

use super::{AppIdSource, AppRef, ClusterApi};
use crate::error::PollError;

#[derive(Debug, Default)]
struct MockState {
    applications: String,
    executors: String,
    stages: String,
    stage_attempts: HashMap<u64, String>,
    task_tables: HashMap<u64, Vec<TaskRow>>,
    offline: bool,
    requests: usize,
}

/// A `ClusterApi` serving canned payloads. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn set_applications(&self, json: &str) {
        self.state.lock().unwrap().applications = json.to_string();
    }

    pub fn set_executors(&self, json: &str) {
        self.state.lock().unwrap().executors = json.to_string();
    }

    pub fn set_stages(&self, json: &str) {
        self.state.lock().unwrap().stages = json.to_string();
    }

    pub fn set_stage_attempts(&self, stage_id: u64, json: &str) {
        self.state.lock().unwrap().stage_attempts.insert(stage_id, json.to_string());
    }

    pub fn set_task_table(&self, stage_id: u64, rows: Vec<TaskRow>) {
        self.state.lock().unwrap().task_tables.insert(stage_id, rows);
    }

    /// Make every request fail with a connection error.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn requests(&self) -> usize {
        self.state.lock().unwrap().requests
    }

    fn respond<T: DeserializeOwned>(
        &self,
        pick: impl FnOnce(&MockState) -> Option<String>,
    ) -> Result<T, AdapterError> {
        let mut state = self.state.lock().unwrap();
        state.requests += 1;
        if state.offline {
            return Err(AdapterError::Connection("connection refused".to_string()));
        }
        let body = pick(&state).ok_or_else(|| AdapterError::Http("404".to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ClusterApi for MockApi {
    async fn applications(&self) -> Result<Vec<ApplicationInfo>, AdapterError> {
        self.respond(|s| Some(s.applications.clone()))
    }

    async fn executors(&self, _app_id: &str) -> Result<Vec<ExecutorSummary>, AdapterError> {
        self.respond(|s| Some(s.executors.clone()))
    }

    async fn stages(&self, _app_id: &str) -> Result<Vec<StageData>, AdapterError> {
        self.respond(|s| Some(s.stages.clone()))
    }

    async fn stage_attempts(
        &self,
        _app_id: &str,
        stage_id: u64,
    ) -> Result<Vec<StageData>, AdapterError> {
        self.respond(|s| s.stage_attempts.get(&stage_id).cloned())
    }

    async fn task_table(
        &self,
        stage_id: u64,
        page_size: usize,
    ) -> Result<Vec<TaskRow>, AdapterError> {
        let mut state = self.state.lock().unwrap();
        state.requests += 1;
        if state.offline {
            return Err(AdapterError::Connection("connection refused".to_string()));
        }
        let rows = state.task_tables.get(&stage_id).cloned().unwrap_or_default();
        Ok(rows.into_iter().take(page_size).collect())
    }

    fn description(&self) -> &str {
        "mock"
    }
}

/// An application id source that always answers with the same id.
#[derive(Debug)]
pub struct FixedAppId(pub AppRef);

impl FixedAppId {
    pub fn new(id: &str, started_ms: Option<u64>) -> Self {
        Self(AppRef {
            id: id.to_string(),
            started_ms,
        })
    }
}

#[async_trait]
impl AppIdSource for FixedAppId {
    async fn current(&self, _api: &dyn ClusterApi) -> Result<AppRef, PollError> {
        Ok(self.0.clone())
    }

    fn description(&self) -> &str {
        "fixed"
    }
}

/// Executors payload: the driver plus three workers with
/// cores `[4, 2, 1]` and active tasks `[6, 1, 0]`.
pub const EXECUTORS: &str = r#"[
    { "id": "driver", "hostPort": "master:40000", "totalCores": 0, "activeTasks": 0 },
    { "id": "1", "hostPort": "node1:40001", "totalCores": 4, "activeTasks": 6,
      "completedTasks": 10, "totalTasks": 14, "totalDuration": 8000, "totalInputBytes": 2097152, "rddBlocks": 2 },
    { "id": "2", "hostPort": "node2:40002", "totalCores": 2, "activeTasks": 1,
      "completedTasks": 20, "totalTasks": 21, "totalDuration": 4000, "totalInputBytes": 1048576, "rddBlocks": 3 },
    { "id": "3", "hostPort": "node3:40003", "totalCores": 1, "activeTasks": 0,
      "completedTasks": 30, "totalTasks": 30, "totalDuration": 1000, "totalInputBytes": 0, "rddBlocks": 4 }
]"#;

/// Stages payload with stage 4 active.
pub const STAGES_ACTIVE: &str = r#"[
    { "status": "ACTIVE", "stageId": 4, "attemptId": 0, "name": "collect",
      "numTasks": 10, "numActiveTasks": 3, "numCompleteTasks": 6, "numFailedTasks": 1 },
    { "status": "COMPLETE", "stageId": 3, "name": "count", "numTasks": 10, "numCompleteTasks": 10 }
]"#;

/// Stages payload without any active stage.
pub const STAGES_IDLE: &str = r#"[
    { "status": "COMPLETE", "stageId": 4, "name": "collect", "numTasks": 10, "numCompleteTasks": 10 }
]"#;

/// Attempt list of stage 4.
pub const STAGE_4_ATTEMPTS: &str =
    r#"[{ "status": "ACTIVE", "stageId": 4, "name": "collect at FlockFinder.scala:210" }]"#;

/// A task row as the UI renders it.
pub fn task(id: &str, status: &str, duration: &str) -> TaskRow {
    TaskRow {
        index: id.to_string(),
        task_id: id.to_string(),
        status: status.to_string(),
        locality: "PROCESS_LOCAL".to_string(),
        executor_id: "1".to_string(),
        host: "node1".to_string(),
        launch_time: "2019/03/12 10:11:12".to_string(),
        duration: duration.to_string(),
        gc_time: "0.1 s".to_string(),
        input: "64.0 MB / 1000".to_string(),
    }
}

/// A cluster with three executors and stage 4 running two tasks.
pub fn busy_cluster() -> MockApi {
    let api = MockApi::default();
    api.set_applications(
        r#"[{ "id": "app-1", "attempts": [{ "startTimeEpoch": 1000 }] }]"#,
    );
    api.set_executors(EXECUTORS);
    api.set_stages(STAGES_ACTIVE);
    api.set_stage_attempts(4, STAGE_4_ATTEMPTS);
    api.set_task_table(
        4,
        vec![
            task("41", "RUNNING", "1.2 min"),
            task("40", "SUCCESS", "35 s"),
            task("42", "RUNNING", "4 s"),
        ],
    );
    api
}
