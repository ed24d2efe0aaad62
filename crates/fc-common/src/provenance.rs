//! Per-run provenance.
//!
//! A `ProvenanceContext` captures everything needed to later group a run
//! with other runs of the same code revision: versions and commits of the
//! library under test and of the harness itself. It is constructed once
//! per run and passed down explicitly; there is no ambient global state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commit metadata for one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full commit hash.
    pub hash: String,
    /// Author timestamp, if known.
    pub authored_at: Option<DateTime<Utc>>,
    /// Committer timestamp, if known.
    pub committed_at: Option<DateTime<Utc>>,
    /// First line of the commit message, if known.
    pub message: Option<String>,
}

impl CommitInfo {
    pub fn new(hash: impl Into<String>) -> Self {
        CommitInfo {
            hash: hash.into(),
            ..Default::default()
        }
    }
}

/// Immutable provenance for a single test run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceContext {
    /// Version of the language/toolchain the run executed under.
    pub language_version: String,
    /// Version string of the library under test.
    pub library_version: String,
    /// Commit of the library under test.
    pub library_commit: CommitInfo,
    /// Commit of the harness itself.
    pub harness_commit: CommitInfo,
}

impl ProvenanceContext {
    /// Build a context from environment variables, with a fallback for
    /// every field so a run can always be recorded.
    ///
    /// Recognised variables: `FUNCHECK_LANGUAGE_VERSION`,
    /// `FUNCHECK_LIBRARY_VERSION`, `FUNCHECK_LIBRARY_COMMIT`,
    /// `FUNCHECK_HARNESS_COMMIT`.
    pub fn from_env(harness_version: &str) -> Self {
        let var = |key: &str| std::env::var(key).unwrap_or_else(|_| "unknown".to_string());
        ProvenanceContext {
            language_version: var("FUNCHECK_LANGUAGE_VERSION"),
            library_version: var("FUNCHECK_LIBRARY_VERSION"),
            library_commit: CommitInfo::new(var("FUNCHECK_LIBRARY_COMMIT")),
            harness_commit: CommitInfo::new(
                std::env::var("FUNCHECK_HARNESS_COMMIT")
                    .unwrap_or_else(|_| harness_version.to_string()),
            ),
        }
    }

    /// The composite commit identity: library and harness hashes joined
    /// by `/`. This is the grouping key for aggregation.
    pub fn commit_key(&self) -> String {
        format!("{}/{}", self.library_commit.hash, self.harness_commit.hash)
    }
}
