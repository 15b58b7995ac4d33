//! Dashboard state.
//!
//! `App` owns the poller and everything the renderer reads: one rolling
//! series per executor panel, the active stage and the latest telemetry.
//! A poll result is applied in one step, so a failed cycle leaves the screen
//! exactly as it was.

use std::cmp::Reverse;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, warn};

use flockwatch_types::{ActiveStage, ExecutorSnapshot, TaskRow, Telemetry};

use crate::data::duration::parse_ui_duration;
use crate::data::{FlatSeriesPolicy, RollingSeries, DEFAULT_WINDOW};
use crate::poller::Poller;
use crate::ui::Theme;

/// How long a status message stays on screen.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Layout of the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Executor chart panels.
    pub panels: usize,
    /// Samples per chart.
    pub window: usize,
    /// Rows of the task table.
    pub task_rows: usize,
    pub flat_policy: FlatSeriesPolicy,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            panels: 3,
            window: DEFAULT_WINDOW,
            task_rows: 10,
            flat_policy: FlatSeriesPolicy::default(),
        }
    }
}

/// One executor chart.
///
/// Panel `i` follows the `i`-th worker executor the API lists. A panel whose
/// executor is missing from a poll keeps its last series.
#[derive(Debug, Clone)]
pub struct ExecutorPanel {
    pub executor: Option<ExecutorSnapshot>,
    pub series: RollingSeries,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    /// Set by the `r` key; the main loop polls on its next turn.
    pub refresh_requested: bool,

    poller: Poller,
    pub panels: Vec<ExecutorPanel>,
    /// The last active stage seen, kept while no stage is active.
    pub stage: Option<ActiveStage>,
    pub telemetry: Option<Telemetry>,
    pub last_error: Option<String>,
    pub last_updated: Option<Instant>,
    task_rows: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(poller: Poller, options: DashboardOptions) -> Self {
        Self::with_theme(poller, options, Theme::auto_detect())
    }

    /// Create an app with an explicit theme, skipping terminal detection.
    pub fn with_theme(poller: Poller, options: DashboardOptions, theme: Theme) -> Self {
        let panels = (0..options.panels.max(1))
            .map(|_| ExecutorPanel {
                executor: None,
                series: RollingSeries::new(options.window, options.flat_policy),
            })
            .collect();

        Self {
            running: true,
            show_help: false,
            refresh_requested: false,
            poller,
            panels,
            stage: None,
            telemetry: None,
            last_error: None,
            last_updated: None,
            task_rows: options.task_rows,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the polled endpoint.
    pub fn source_description(&self) -> String {
        self.poller.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Run one poll cycle and apply its result.
    ///
    /// Errors are recorded for the status bar, never returned.
    pub async fn refresh(&mut self) {
        self.refresh_requested = false;
        match self.poller.poll().await {
            Ok(telemetry) => {
                self.apply(telemetry);
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, "poll cycle abandoned");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Commit a complete poll result.
    pub fn apply(&mut self, telemetry: Telemetry) {
        for (panel, executor) in self.panels.iter_mut().zip(&telemetry.executors) {
            panel
                .series
                .push(u64::from(executor.active_tasks), u64::from(executor.cores));
            panel.executor = Some(executor.clone());
        }

        if let Some(active) = telemetry.active_stage() {
            self.stage = Some(active.clone());
        }

        debug!(
            executors = telemetry.executors.len(),
            active_stages = telemetry.active_stages.len(),
            "telemetry applied"
        );
        self.telemetry = Some(telemetry);
        self.last_updated = Some(Instant::now());
    }

    /// Longest-running tasks of the current stage, longest first.
    ///
    /// Rows whose duration cannot be parsed sort last.
    pub fn top_tasks(&self) -> Vec<&TaskRow> {
        let Some(stage) = &self.stage else {
            return Vec::new();
        };

        let mut tasks: Vec<&TaskRow> = stage.tasks.iter().collect();
        tasks.sort_by_key(|t| Reverse(parse_ui_duration(&t.duration).ok()));
        tasks.truncate(self.task_rows);
        tasks
    }

    /// Rows of the task table.
    pub fn task_rows(&self) -> usize {
        self.task_rows
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Ask the main loop to poll now.
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the latest telemetry to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            anyhow::bail!("No data to export");
        };

        let json = serde_json::to_string_pretty(telemetry)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
