//! Results aggregation and regression detection.
//!
//! This crate is the statistical core of funcheck: a read-only
//! projection layer over stored run records, a commit-keyed aggregation
//! pipeline with robust outlier trimming, and the oracle that decides
//! whether a tracked metric has drifted from its expected baseline.
//!
//! Everything here is pure and side-effect-free with respect to the
//! record store; aggregation can run concurrently with new writes.

pub mod aggregate;
pub mod oracle;
pub mod resultset;
pub mod robust;

pub use aggregate::{aggregate_by_commit, AggregateOptions, CommitAggregate};
pub use oracle::{has_not_deviated, DEFAULT_RECENT_WINDOW};
pub use resultset::ResultSet;
