//! Orchestration error types.

use thiserror::Error;

/// Errors from the run/analyse/report orchestration layer.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown test {0:?}")]
    UnknownTest(String),

    /// A test body failed while producing its metrics. The run record
    /// is still finalized with `status=failed` before this surfaces.
    #[error("test {name} failed: {reason}")]
    TestFailed { name: String, reason: String },

    #[error("{failed} of {total} repeat runs failed")]
    RepeatFailures { failed: usize, total: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] fc_store::StoreError),

    #[error(transparent)]
    Name(#[from] fc_common::NameError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
