//! Codec error types.

use thiserror::Error;

/// Errors from encoding or decoding a record field.
///
/// Encode-side errors are validation failures and fail fast at the call
/// site. Decode-side errors are row-level: callers log and skip the
/// single offending field rather than abort the whole record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid key {0:?}: must match ^[A-Za-z]\\w*$")]
    InvalidKey(String),

    #[error("multi-line strings are not supported (key {key:?})")]
    MultiLineStringUnsupported { key: String },

    #[error("unable to store arrays of 2 or more dimensions (key {key:?})")]
    UnsupportedDimensionality { key: String },

    #[error("unsupported value type for key {key:?}")]
    UnsupportedType { key: String },

    #[error("unable to parse {what} for key {key:?}: {token:?}")]
    Parse {
        key: String,
        what: &'static str,
        token: String,
    },

    #[error("unable to split line on ':': {line:?}")]
    MalformedLine { line: String },
}
