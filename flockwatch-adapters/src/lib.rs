//! # flockwatch-adapters
//!
//! Collectors that gather executor, stage and task telemetry from a running
//! Spark application.
//!
//! ## Supported Systems
//!
//! - **Spark** (`spark` feature) - Polls the monitoring REST API (`/api/v1`)
//!   for executors and stages, and scrapes the web UI's task table for
//!   per-task detail
//!
//! The REST response schemas in [`api`] are always available so payloads can
//! be parsed without pulling in an HTTP client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flockwatch_adapters::spark::SparkAdapter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = SparkAdapter::builder()
//!         .endpoint("http://localhost:4040")
//!         .build()?;
//!
//!     let apps = adapter.applications().await?;
//!     let stages = adapter.stages(&apps[0].id).await?;
//!
//!     println!("{} stages", stages.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;

#[cfg(feature = "spark")]
pub mod html;

#[cfg(feature = "spark")]
pub mod spark;

pub use error::AdapterError;

// Re-export types for convenience
pub use flockwatch_types::{ExecutorSnapshot, StageSnapshot, TaskRow};
