//! Validated test names.
//!
//! A test name doubles as the primary grouping key in the record store,
//! so it is restricted to the same identifier pattern as result keys.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::NameError;

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

/// The restricted identifier pattern shared by test names and result keys.
pub fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z]\w*$").expect("valid name regex"))
}

/// Returns true if `name` is a valid test name or result key.
pub fn is_valid_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

/// A validated test name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestName(String);

impl TestName {
    /// Validate and wrap a test name.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(NameError::InvalidName(name));
        }
        Ok(TestName(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TestName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
