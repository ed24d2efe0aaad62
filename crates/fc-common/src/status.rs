//! Run status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single test run record.
///
/// A record is created `Uninitialised`, moves to `Done` or `Failed` when
/// the run finishes, and keeps `Uninitialised` forever if the process was
/// killed mid-run. Downstream aggregation tolerates all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Uninitialised,
    Done,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Uninitialised => "uninitialised",
            RunStatus::Done => "done",
            RunStatus::Failed => "failed",
        }
    }

    /// Parse a stored status string. Unknown strings are treated as
    /// `Uninitialised` so historical rows never fail a table scan.
    pub fn parse(s: &str) -> Self {
        match s {
            "done" => RunStatus::Done,
            "failed" => RunStatus::Failed,
            _ => RunStatus::Uninitialised,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [RunStatus::Uninitialised, RunStatus::Done, RunStatus::Failed] {
            assert_eq!(RunStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_is_uninitialised() {
        assert_eq!(RunStatus::parse("exploded"), RunStatus::Uninitialised);
        assert_eq!(RunStatus::parse(""), RunStatus::Uninitialised);
    }
}
