//! Side-channel file holding the application id.
//!
//! The job driver writes its application id to a well-known file (by default
//! `/tmp/SparkAppID`) when it starts.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{AppIdSource, AppRef, ClusterApi};
use crate::error::PollError;

/// Default location the driver writes its application id to.
pub const DEFAULT_APP_ID_FILE: &str = "/tmp/SparkAppID";

/// An application id source that reads the first line of a file.
///
/// The file is re-read on every call, so a restarted job is followed without
/// restarting the dashboard.
#[derive(Debug)]
pub struct FileAppIdSource {
    path: PathBuf,
    description: String,
}

impl FileAppIdSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("app id: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_id(&self) -> Result<String, PollError> {
        let content = fs::read_to_string(&self.path).map_err(|source| PollError::AppIdFile {
            path: self.path.clone(),
            source,
        })?;

        let id = content.lines().next().map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return Err(PollError::EmptyAppId(self.path.clone()));
        }
        Ok(id.to_string())
    }
}

#[async_trait]
impl AppIdSource for FileAppIdSource {
    async fn current(&self, _api: &dyn ClusterApi) -> Result<AppRef, PollError> {
        Ok(AppRef {
            id: self.read_id()?,
            started_ms: None,
        })
    }

    fn description(&self) -> &str {
        &self.description
    }
}
