//! Store error types.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors from record store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing medium could not be opened or created.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// The store stayed locked past the bounded busy timeout. Callers
    /// should retry the whole run rather than a single write.
    #[error("record store busy")]
    Busy,

    #[error("database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Codec(#[from] fc_codec::CodecError),

    #[error(transparent)]
    Name(#[from] fc_common::NameError),

    #[error("cannot write to {0}")]
    NotWritable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, _) = &err {
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) {
                return StoreError::Busy;
            }
        }
        StoreError::Database(err.to_string())
    }
}
