//! Spark adapter using the monitoring REST API and the web UI.
//!
//! The driver serves both on the same port (4040 by default, or the history
//! server's port). JSON endpoints live under `/api/v1`; the task table is
//! scraped from the HTML stage page.
//!
//! ## Example
//!
//! ```rust,no_run
//! use flockwatch_adapters::spark::SparkAdapter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = SparkAdapter::builder()
//!         .master("localhost", 4040)
//!         .build()?;
//!
//!     let apps = adapter.applications().await?;
//!     for executor in adapter.executors(&apps[0].id).await? {
//!         println!("{} at {}: {} cores", executor.id, executor.host_port, executor.total_cores);
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use flockwatch_types::TaskRow;

use crate::api::{ApplicationInfo, ExecutorSummary, StageData};
use crate::html::parse_task_table;
use crate::AdapterError;

/// Spark adapter for collecting executor, stage and task telemetry.
#[derive(Debug, Clone)]
pub struct SparkAdapter {
    client: Client,
    endpoint: String,
}

impl SparkAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> SparkAdapterBuilder {
        SparkAdapterBuilder::default()
    }

    /// Base URL requests are issued against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET /api/v1/applications`
    pub async fn applications(&self) -> Result<Vec<ApplicationInfo>, AdapterError> {
        self.get_json("/api/v1/applications").await
    }

    /// `GET /api/v1/applications/{id}/executors`
    pub async fn executors(&self, app_id: &str) -> Result<Vec<ExecutorSummary>, AdapterError> {
        self.get_json(&format!("/api/v1/applications/{}/executors", app_id)).await
    }

    /// `GET /api/v1/applications/{id}/stages`
    pub async fn stages(&self, app_id: &str) -> Result<Vec<StageData>, AdapterError> {
        self.get_json(&format!("/api/v1/applications/{}/stages", app_id)).await
    }

    /// `GET /api/v1/applications/{id}/stages/{stageId}` - every attempt of one stage.
    pub async fn stage_attempts(
        &self,
        app_id: &str,
        stage_id: u64,
    ) -> Result<Vec<StageData>, AdapterError> {
        self.get_json(&format!("/api/v1/applications/{}/stages/{}", app_id, stage_id)).await
    }

    /// Scrape the first `page_size` tasks of a stage's first attempt, longest
    /// running first.
    pub async fn task_table(
        &self,
        stage_id: u64,
        page_size: usize,
    ) -> Result<Vec<TaskRow>, AdapterError> {
        let path = format!(
            "/stages/stage/?id={}&attempt=0&task.sort=Duration&task.desc=true&task.pageSize={}",
            stage_id, page_size
        );
        let page = self.get_text(&path).await?;
        parse_task_table(&page)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdapterError> {
        let body = self.get_text(path).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_text(&self, path: &str) -> Result<String, AdapterError> {
        let url = format!("{}{}", self.endpoint, path);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AdapterError::Http(format!("{} not found", url)));
        }

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

/// Builder for SparkAdapter.
#[derive(Debug, Default)]
pub struct SparkAdapterBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl SparkAdapterBuilder {
    /// Set the UI endpoint (e.g., "http://localhost:4040").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the endpoint from the master host and UI port.
    pub fn master(self, host: &str, port: u16) -> Self {
        self.endpoint(format!("http://{}:{}", host, port))
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<SparkAdapter, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:4040".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(SparkAdapter { client, endpoint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let adapter = SparkAdapter::builder().build().unwrap();
        assert_eq!(adapter.endpoint(), "http://localhost:4040");
    }

    #[test]
    fn test_builder_master() {
        let adapter = SparkAdapter::builder().master("dblab-rack11", 4041).build().unwrap();
        assert_eq!(adapter.endpoint(), "http://dblab-rack11:4041");
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let adapter = SparkAdapter::builder().endpoint("http://history:18080/").build().unwrap();
        assert_eq!(adapter.endpoint(), "http://history:18080");
    }
}
