use async_trait::async_trait;

use flockwatch_adapters::api::{ApplicationInfo, ExecutorSummary, StageData};
use flockwatch_adapters::spark::SparkAdapter;
use flockwatch_adapters::AdapterError;
use flockwatch_types::TaskRow;

use super::ClusterApi;

#[async_trait]
impl ClusterApi for SparkAdapter {
    async fn applications(&self) -> Result<Vec<ApplicationInfo>, AdapterError> {
        SparkAdapter::applications(self).await
    }

    async fn executors(&self, app_id: &str) -> Result<Vec<ExecutorSummary>, AdapterError> {
        SparkAdapter::executors(self, app_id).await
    }

    async fn stages(&self, app_id: &str) -> Result<Vec<StageData>, AdapterError> {
        SparkAdapter::stages(self, app_id).await
    }

    async fn stage_attempts(
        &self,
        app_id: &str,
        stage_id: u64,
    ) -> Result<Vec<StageData>, AdapterError> {
        SparkAdapter::stage_attempts(self, app_id, stage_id).await
    }

    async fn task_table(
        &self,
        stage_id: u64,
        page_size: usize,
    ) -> Result<Vec<TaskRow>, AdapterError> {
        SparkAdapter::task_table(self, stage_id, page_size).await
    }

    fn description(&self) -> &str {
        self.endpoint()
    }
}
