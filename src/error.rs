//! Errors that abandon a poll cycle.
//!
//! None of these are fatal: presenters log them and try again on the next
//! cycle.

use std::path::PathBuf;

use flockwatch_adapters::AdapterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    /// A request to the cluster failed or returned something unparsable.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// The side-channel application id file could not be read.
    #[error("cannot read application id from {path}: {source}")]
    AppIdFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The side-channel file exists but holds no id yet.
    #[error("application id file {0} is empty")]
    EmptyAppId(PathBuf),

    /// The cluster reports no application.
    #[error("no application is running")]
    NoApplication,

    /// The per-stage endpoint returned no attempts for an active stage.
    #[error("stage {0} has no attempts")]
    NoStageAttempts(u64),
}
