//! Data models and processing for polled telemetry.
//!
//! This module turns raw REST payloads into flat records and keeps the
//! rolling windows the dashboard charts are drawn from.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing of the web UI's duration cells (e.g., "1.2 min")
//! - [`extract`]: Metric extraction (driver exclusion, active-task clamp, active stage)
//! - [`series`]: Fixed-width rolling windows with flat-series correction
//!
//! ## Data Flow
//!
//! ```text
//! REST payloads (JSON) + task table (HTML)
//!        │
//!        ▼
//! extract::executors() / extract::stage_snapshot()
//!        │
//!        ├──▶ Telemetry (one complete poll)
//!        │
//!        └──▶ RollingSeries::push() (dashboard charts)
//! ```

pub mod duration;
pub mod extract;
pub mod series;

pub use series::{FlatSeriesPolicy, RollingSeries, DEFAULT_WINDOW};
