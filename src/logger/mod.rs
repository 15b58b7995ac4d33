//! Headless telemetry logger.
//!
//! Each cycle refreshes the experiment phase, polls the cluster and writes
//! one timestamped line per record. A failed poll is logged and skipped; the
//! loop only ends on Ctrl-C or when the output can no longer be written.

pub mod phase;
pub mod record;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tracing::{info, warn};

use flockwatch_types::{StageSnapshot, Telemetry};

use crate::poller::{now_ms, Poller};
use phase::PhaseTracker;
use record::RecordHeader;

/// Logger cadence and inputs.
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    /// Pause between cycles.
    pub interval: Duration,
    /// Auxiliary log tailed for phase markers.
    pub phase_log: Option<PathBuf>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            phase_log: None,
        }
    }
}

/// Writes telemetry records to `W`.
#[derive(Debug)]
pub struct Logger<W: Write> {
    poller: Poller,
    out: W,
    phase: PhaseTracker,
    interval: Duration,
    /// Fallback elapsed-time origin when the app start is unknown.
    started_ms: u64,
    /// Stage records refer to while no stage is active.
    last_stage: Option<StageSnapshot>,
}

impl<W: Write> Logger<W> {
    pub fn new(poller: Poller, out: W, options: LoggerOptions) -> Self {
        Self {
            poller,
            out,
            phase: PhaseTracker::new(options.phase_log),
            interval: options.interval,
            started_ms: now_ms(),
            last_stage: None,
        }
    }

    /// Run one cycle.
    ///
    /// Only write failures are returned; poll failures are logged.
    pub async fn cycle(&mut self) -> io::Result<()> {
        self.phase.refresh();

        match self.poller.poll().await {
            Ok(telemetry) => self.write(&telemetry),
            Err(e) => {
                warn!(error = %e, "poll cycle abandoned");
                Ok(())
            }
        }
    }

    fn write(&mut self, telemetry: &Telemetry) -> io::Result<()> {
        if let Some(active) = telemetry.active_stage() {
            self.last_stage = Some(active.stage.clone());
        }

        let elapsed_secs = telemetry.elapsed_secs().unwrap_or_else(|| {
            telemetry.timestamp_ms.saturating_sub(self.started_ms) as f64 / 1000.0
        });
        let header = RecordHeader {
            phase: self.phase.phase(),
            elapsed_secs,
            app_id: &telemetry.app_id,
            executors: telemetry.executors.len(),
        };

        let timestamp = humantime::format_rfc3339_millis(SystemTime::now());
        for line in record::records(&header, telemetry, self.last_stage.as_ref()) {
            writeln!(self.out, "{timestamp}|{line}")?;
        }
        self.out.flush()
    }

    /// Cycle until Ctrl-C.
    pub async fn run(&mut self) -> io::Result<()> {
        info!(
            source = %self.poller.description(),
            interval = ?self.interval,
            "logger started"
        );

        loop {
            self.cycle().await?;

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted, stopping logger");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Consume the logger, returning its output.
    pub fn into_inner(self) -> W {
        self.out
    }
}
