//! Layered settings.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `FLOCKWATCH_`-prefixed environment variables (nested keys joined
//! with `__`, e.g. `FLOCKWATCH_MASTER__PORT=4041`), then command-line flags
//! applied by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::data::{FlatSeriesPolicy, DEFAULT_WINDOW};
use crate::source::DEFAULT_APP_ID_FILE;

const ENV_PREFIX: &str = "FLOCKWATCH";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub master: MasterSettings,
    pub dashboard: DashboardSettings,
    pub logger: LoggerSettings,
}

/// Where the driver web UI listens.
#[derive(Debug, Clone, Deserialize)]
pub struct MasterSettings {
    pub host: String,
    pub port: u16,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    pub app_id_file: PathBuf,
    /// Milliseconds between polls.
    pub refresh_ms: u64,
    /// Executor chart panels shown.
    pub panels: usize,
    /// Samples per chart.
    pub window: usize,
    /// Rows of the longest-running task table.
    pub task_rows: usize,
    pub flat_policy: FlatSeriesPolicy,
    /// Diagnostics go here; the terminal belongs to the UI.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggerSettings {
    /// Read the application id from this file instead of the first listed
    /// application.
    #[serde(default)]
    pub app_id_file: Option<PathBuf>,
    pub interval_secs: u64,
    /// Task table rows scraped per active stage.
    pub page_size: usize,
    /// Auxiliary log tailed for phase markers.
    #[serde(default)]
    pub nohup: Option<PathBuf>,
}

impl Settings {
    /// Load defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("master.host", "localhost")?
            .set_default("master.port", 4040)?
            .set_default("master.timeout_secs", 10)?
            .set_default("dashboard.app_id_file", DEFAULT_APP_ID_FILE)?
            .set_default("dashboard.refresh_ms", 1000)?
            .set_default("dashboard.panels", 3)?
            .set_default("dashboard.window", DEFAULT_WINDOW as i64)?
            .set_default("dashboard.task_rows", 10)?
            .set_default("dashboard.flat_policy", "ceiling-aware")?
            .set_default("logger.interval_secs", 1)?
            .set_default("logger.page_size", 200)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the presenters cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.panels == 0 {
            return Err(ConfigError::Message(
                "dashboard.panels must be at least 1".to_string(),
            ));
        }
        if self.dashboard.refresh_ms == 0 {
            return Err(ConfigError::Message(
                "dashboard.refresh_ms must be positive".to_string(),
            ));
        }
        if self.logger.interval_secs == 0 {
            return Err(ConfigError::Message(
                "logger.interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL of the driver web UI.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.master.host, self.master.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.master.timeout_secs)
    }
}
