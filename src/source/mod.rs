//! Abstractions over where telemetry comes from.
//!
//! Two seams keep the poller testable:
//!
//! - [`ClusterApi`]: the REST and web UI requests of one poll cycle, implemented
//!   by the Spark adapter and by an in-memory mock in tests.
//! - [`AppIdSource`]: which application to poll. The job driver writes its id
//!   to a side-channel file ([`FileAppIdSource`]); alternatively the first
//!   application the API lists is used ([`ApplicationsAppIdSource`]).

mod applications;
mod file;
mod spark;

#[cfg(test)]
pub(crate) mod mock;

pub use applications::ApplicationsAppIdSource;
pub use file::{FileAppIdSource, DEFAULT_APP_ID_FILE};

use std::fmt::Debug;

use async_trait::async_trait;

use flockwatch_adapters::api::{ApplicationInfo, ExecutorSummary, StageData};
use flockwatch_adapters::AdapterError;
use flockwatch_types::TaskRow;

use crate::error::PollError;

/// The requests one poll cycle issues against the cluster.
#[async_trait]
pub trait ClusterApi: Send + Sync + Debug {
    /// List applications known to the UI.
    async fn applications(&self) -> Result<Vec<ApplicationInfo>, AdapterError>;

    /// List the executors of an application, driver included.
    async fn executors(&self, app_id: &str) -> Result<Vec<ExecutorSummary>, AdapterError>;

    /// List the stages of an application.
    async fn stages(&self, app_id: &str) -> Result<Vec<StageData>, AdapterError>;

    /// List the attempts of one stage.
    async fn stage_attempts(
        &self,
        app_id: &str,
        stage_id: u64,
    ) -> Result<Vec<StageData>, AdapterError>;

    /// Scrape up to `page_size` rows of a stage's task table, longest first.
    async fn task_table(&self, stage_id: u64, page_size: usize)
        -> Result<Vec<TaskRow>, AdapterError>;

    /// Returns a human-readable description of the cluster endpoint.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

/// The application a cycle polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRef {
    pub id: String,
    /// Attempt start in Unix milliseconds, when known.
    pub started_ms: Option<u64>,
}

/// Provider of the current application id.
///
/// Consulted once per poll cycle, so a new job is picked up as soon as its
/// id appears.
#[async_trait]
pub trait AppIdSource: Send + Sync + Debug {
    /// Resolve the application to poll this cycle.
    async fn current(&self, api: &dyn ClusterApi) -> Result<AppRef, PollError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
