//! Application id taken from the API's application list.

use async_trait::async_trait;

use super::{AppIdSource, AppRef, ClusterApi};
use crate::error::PollError;

/// Polls the first application `/api/v1/applications` lists.
///
/// A driver UI only ever lists its own application, so the first entry is
/// the running job. Unlike [`super::FileAppIdSource`] this also yields the
/// attempt start time, which the logger needs for elapsed times.
#[derive(Debug, Default)]
pub struct ApplicationsAppIdSource;

impl ApplicationsAppIdSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AppIdSource for ApplicationsAppIdSource {
    async fn current(&self, api: &dyn ClusterApi) -> Result<AppRef, PollError> {
        let apps = api.applications().await?;
        let app = apps.into_iter().next().ok_or(PollError::NoApplication)?;
        Ok(AppRef {
            started_ms: app.start_time_ms(),
            id: app.id,
        })
    }

    fn description(&self) -> &str {
        "app id: first application"
    }
}
