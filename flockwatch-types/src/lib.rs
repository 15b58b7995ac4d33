//! # flockwatch-types
//!
//! Core types for Spark job telemetry. These are the flat, ephemeral records
//! that flockwatch extracts from the Spark monitoring REST API and web UI on
//! every poll: one [`ExecutorSnapshot`] per worker, the active
//! [`StageSnapshot`] with its [`TaskRow`]s, and cluster-wide
//! [`ClusterTotals`].
//!
//! ## Features
//!
//! - `serde`: JSON serialization via serde (used by the dashboard's export)
//!
//! ## Example
//!
//! ```rust
//! use flockwatch_types::{ClusterTotals, ExecutorSnapshot};
//!
//! let executors = vec![
//!     ExecutorSnapshot::builder("1").cores(4).active_tasks(6).build(),
//!     ExecutorSnapshot::builder("driver").cores(0).build(),
//! ];
//!
//! // Active tasks never exceed the executor's cores.
//! assert_eq!(executors[0].active_tasks, 4);
//!
//! // The driver never counts towards cluster totals.
//! let totals = ClusterTotals::from_executors(&executors);
//! assert_eq!(totals.executors, 1);
//! ```

mod metrics;
mod snapshot;
mod stage;

pub use metrics::*;
pub use snapshot::*;
pub use stage::*;

/// Identifier Spark reports for the driver in the executor list.
pub const DRIVER_ID: &str = "driver";

/// Status Spark reports for a stage that is currently running.
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Status the web UI shows for a task that is currently running.
pub const RUNNING_STATUS: &str = "RUNNING";
