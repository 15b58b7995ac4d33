//! The telemetry poller.
//!
//! One call to [`Poller::poll`] is one cycle: resolve the application, fetch
//! executors and stages, then the detail and task table of the active
//! stage(s). Every request completes before anything is returned, so a cycle
//! either produces a whole [`Telemetry`] or an error and no partial state.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use flockwatch_types::{ActiveStage, Telemetry};

use crate::data::extract;
use crate::error::PollError;
use crate::source::{AppIdSource, ClusterApi};

/// What a cycle fetches beyond executors and stages.
#[derive(Debug, Clone)]
pub struct PollerOptions {
    /// Task rows scraped per active stage. Zero skips the task table.
    pub task_rows: usize,
    /// Fetch detail for every active stage instead of only the last one.
    pub all_active_stages: bool,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            task_rows: 10,
            all_active_stages: false,
        }
    }
}

/// Issues the requests of one poll cycle.
#[derive(Debug)]
pub struct Poller {
    api: Box<dyn ClusterApi>,
    app_id: Box<dyn AppIdSource>,
    options: PollerOptions,
}

impl Poller {
    pub fn new(
        api: Box<dyn ClusterApi>,
        app_id: Box<dyn AppIdSource>,
        options: PollerOptions,
    ) -> Self {
        Self {
            api,
            app_id,
            options,
        }
    }

    /// Description of the endpoint and the application id source.
    pub fn description(&self) -> String {
        format!("{} ({})", self.api.description(), self.app_id.description())
    }

    /// Run one cycle.
    pub async fn poll(&self) -> Result<Telemetry, PollError> {
        let app = self.app_id.current(self.api.as_ref()).await?;
        debug!(app_id = %app.id, "polling application");

        let executors = extract::executors(self.api.executors(&app.id).await?);
        let stages = self.api.stages(&app.id).await?;

        let mut selected = extract::active_stages(&stages);
        if !self.options.all_active_stages {
            selected = selected.pop().into_iter().collect();
        }

        let mut active_stages = Vec::with_capacity(selected.len());
        for stage in selected {
            let attempts = self.api.stage_attempts(&app.id, stage.stage_id).await?;
            let snapshot = extract::stage_snapshot(stage, &attempts)?;
            let tasks = if self.options.task_rows > 0 {
                self.api.task_table(stage.stage_id, self.options.task_rows).await?
            } else {
                Vec::new()
            };
            active_stages.push(ActiveStage {
                stage: snapshot,
                tasks,
            });
        }

        Ok(Telemetry {
            app_id: app.id,
            started_ms: app.started_ms,
            timestamp_ms: now_ms(),
            executors,
            active_stages,
        })
    }
}

/// Current time in milliseconds since Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::{busy_cluster, task, FixedAppId, MockApi, STAGES_IDLE};
    use crate::source::ApplicationsAppIdSource;

    fn poller(api: &MockApi, options: PollerOptions) -> Poller {
        Poller::new(
            Box::new(api.clone()),
            Box::new(FixedAppId::new("app-1", None)),
            options,
        )
    }

    #[tokio::test]
    async fn poll_collects_everything() {
        let api = busy_cluster();
        let telemetry = poller(&api, PollerOptions::default()).poll().await.unwrap();

        assert_eq!(telemetry.app_id, "app-1");
        let active: Vec<u32> = telemetry.executors.iter().map(|e| e.active_tasks).collect();
        assert_eq!(active, vec![4, 1, 0]);

        let stage = telemetry.active_stage().unwrap();
        assert_eq!(stage.stage.stage_id, 4);
        assert_eq!(stage.stage.name, "collect at FlockFinder.scala:210");
        assert_eq!(stage.stage.progress_label(), "6/10");
        assert_eq!(stage.tasks.len(), 3);
    }

    #[tokio::test]
    async fn idle_cluster_has_no_active_stage() {
        let api = busy_cluster();
        api.set_stages(STAGES_IDLE);

        let telemetry = poller(&api, PollerOptions::default()).poll().await.unwrap();
        assert!(telemetry.active_stages.is_empty());
        assert_eq!(telemetry.executors.len(), 3);
    }

    #[tokio::test]
    async fn task_rows_limit_page_size() {
        let api = busy_cluster();
        let options = PollerOptions {
            task_rows: 2,
            ..Default::default()
        };
        let telemetry = poller(&api, options).poll().await.unwrap();
        assert_eq!(telemetry.active_stage().unwrap().tasks.len(), 2);
    }

    #[tokio::test]
    async fn zero_task_rows_skips_scrape() {
        let api = busy_cluster();
        let options = PollerOptions {
            task_rows: 0,
            ..Default::default()
        };
        let telemetry = poller(&api, options).poll().await.unwrap();
        assert!(telemetry.active_stage().unwrap().tasks.is_empty());
        // executors, stages, stage attempts
        assert_eq!(api.requests(), 3);
    }

    #[tokio::test]
    async fn all_active_stages_are_fetched_on_request() {
        let api = busy_cluster();
        api.set_stages(
            r#"[
                { "status": "ACTIVE", "stageId": 5, "numTasks": 4 },
                { "status": "ACTIVE", "stageId": 4, "numTasks": 10 }
            ]"#,
        );
        api.set_stage_attempts(5, r#"[{ "status": "ACTIVE", "stageId": 5, "name": "map" }]"#);
        api.set_task_table(5, vec![task("50", "RUNNING", "3 s")]);

        let only_last = poller(&api, PollerOptions::default()).poll().await.unwrap();
        assert_eq!(only_last.active_stages.len(), 1);
        assert_eq!(only_last.active_stage().unwrap().stage.stage_id, 4);

        let options = PollerOptions {
            all_active_stages: true,
            task_rows: 200,
        };
        let all = poller(&api, options).poll().await.unwrap();
        let ids: Vec<u64> = all.active_stages.iter().map(|s| s.stage.stage_id).collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[tokio::test]
    async fn malformed_executors_fail_the_cycle() {
        let api = busy_cluster();
        api.set_executors(r#"[{ "id": "1", "totalCores": "#);

        let err = poller(&api, PollerOptions::default()).poll().await.unwrap_err();
        assert!(matches!(err, PollError::Adapter(_)));
    }

    #[tokio::test]
    async fn missing_stage_detail_fails_the_cycle() {
        let api = busy_cluster();
        api.set_stage_attempts(4, "[]");

        let err = poller(&api, PollerOptions::default()).poll().await.unwrap_err();
        assert!(matches!(err, PollError::NoStageAttempts(4)));
    }

    #[tokio::test]
    async fn offline_cluster_fails_the_cycle() {
        let api = busy_cluster();
        api.set_offline(true);

        assert!(poller(&api, PollerOptions::default()).poll().await.is_err());
    }

    #[tokio::test]
    async fn start_time_comes_from_the_app_source() {
        let api = busy_cluster();
        let poller = Poller::new(
            Box::new(api.clone()),
            Box::new(ApplicationsAppIdSource::new()),
            PollerOptions::default(),
        );

        let telemetry = poller.poll().await.unwrap();
        assert_eq!(telemetry.started_ms, Some(1000));
        assert!(telemetry.elapsed_secs().unwrap() > 0.0);
    }
}
