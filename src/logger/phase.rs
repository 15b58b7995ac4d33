//! Experiment phase announced in an auxiliary process-control log.
//!
//! The experiment driver appends pipe-delimited lines to its own log. When
//! field 5 is `START`, field 7 names the phase and field 10 starts with the
//! interval number; `END` closes the phase.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Bytes read from the end of the log to find its last line.
const TAIL_BYTES: u64 = 8 * 1024;

const STATUS_FIELD: usize = 5;
const NAME_FIELD: usize = 7;
const INTERVAL_FIELD: usize = 10;

/// The phase records are tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub name: String,
    pub interval: String,
}

impl Default for Phase {
    fn default() -> Self {
        Self {
            name: "None".to_string(),
            interval: "-1".to_string(),
        }
    }
}

/// Follows the last line of the auxiliary log.
#[derive(Debug, Default)]
pub struct PhaseTracker {
    path: Option<PathBuf>,
    phase: Phase,
}

impl PhaseTracker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            phase: Phase::default(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Re-read the log and apply its last line.
    ///
    /// Read failures are logged and leave the phase as it was.
    pub fn refresh(&mut self) {
        let Some(path) = &self.path else {
            return;
        };
        match last_line(path) {
            Ok(Some(line)) => {
                debug!(%line, "phase log");
                self.apply(&line);
            }
            Ok(None) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "cannot read phase log"),
        }
    }

    /// Apply one log line.
    pub fn apply(&mut self, line: &str) {
        let fields: Vec<&str> = line.split('|').collect();
        match fields.get(STATUS_FIELD).map(|s| s.trim()) {
            Some("START") => {
                let name = fields.get(NAME_FIELD).map(|s| s.trim());
                let interval = fields.get(INTERVAL_FIELD).and_then(|s| leading_number(s));
                if let (Some(name), Some(interval)) = (name, interval) {
                    self.phase = Phase {
                        name: name.to_string(),
                        interval: interval.to_string(),
                    };
                }
            }
            Some("END") => self.phase = Phase::default(),
            _ => {}
        }
    }
}

/// The digits a field starts with, ignoring leading whitespace.
fn leading_number(field: &str) -> Option<&str> {
    let field = field.trim_start();
    let end = field
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(field.len(), |(i, _)| i);
    (end > 0).then(|| &field[..end])
}

/// Last non-empty line of a file.
fn last_line(path: &Path) -> io::Result<Option<String>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    file.seek(SeekFrom::Start(len.saturating_sub(TAIL_BYTES)))?;

    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    let text = String::from_utf8_lossy(&buf);
    Ok(text
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string))
}
