//! Shared error types for funcheck.

use thiserror::Error;

/// Result type alias for fc-common operations.
pub type Result<T> = std::result::Result<T, NameError>;

/// Errors from name validation.
///
/// Test names and result keys share the same restricted identifier
/// pattern: an alphabetic first character followed by word characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("invalid name {0:?}: must match ^[A-Za-z]\\w*$")]
    InvalidName(String),
}
