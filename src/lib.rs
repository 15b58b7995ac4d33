//! # flockwatch
//!
//! Operational tooling for flock-detection experiments on Spark: a live
//! terminal dashboard, a headless telemetry logger and two batch helpers
//! around the flock finders.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐                  │
//! │  │ source  │───▶│  poller  │───▶│   app    │───▶ ui (ratatui) │
//! │  │ (REST,  │    │ (one     │    │  (state) │                  │
//! │  │ app id) │    │  cycle)  │    └──────────┘                  │
//! │  └─────────┘    └────┬─────┘                                  │
//! │                      └────────▶ logger ───▶ stdout records    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`ClusterApi`] and [`AppIdSource`] seams, with the
//!   Spark adapter and the side-channel app id file behind them
//! - **[`poller`]**: one fetch-then-commit poll cycle producing a
//!   [`Telemetry`](flockwatch_types::Telemetry)
//! - **[`data`]**: payload extraction, rolling chart windows, UI durations
//! - **[`app`]**, **[`events`]**, **[`ui`]**: the dashboard
//! - **[`logger`]**: pipe-delimited records for offline analysis
//! - **[`tools`]**: the `check` and `notfound` helpers
//! - **[`config`]**: layered settings
//!
//! ## Usage
//!
//! ```bash
//! # Dashboard against the local driver UI
//! flockwatch dashboard
//!
//! # Log every second, tagging records with the experiment phase
//! flockwatch log -m master.cluster -p 4040 -t 1 -n nohup.out > run.log
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use flockwatch::{FileAppIdSource, Poller, PollerOptions};
//! use flockwatch_adapters::spark::SparkAdapter;
//!
//! # tokio_test::block_on(async {
//! let api = SparkAdapter::builder().master("localhost", 4040).build().unwrap();
//! let poller = Poller::new(
//!     Box::new(api),
//!     Box::new(FileAppIdSource::new("/tmp/SparkAppID")),
//!     PollerOptions::default(),
//! );
//!
//! let telemetry = poller.poll().await.unwrap();
//! for executor in &telemetry.executors {
//!     println!("{}: {}/{} slots busy", executor.id, executor.active_tasks, executor.cores);
//! }
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod logger;
pub mod poller;
pub mod source;
pub mod tools;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, DashboardOptions};
pub use config::Settings;
pub use data::{FlatSeriesPolicy, RollingSeries};
pub use error::PollError;
pub use logger::{Logger, LoggerOptions};
pub use poller::{Poller, PollerOptions};
pub use source::{AppIdSource, ApplicationsAppIdSource, ClusterApi, FileAppIdSource};
