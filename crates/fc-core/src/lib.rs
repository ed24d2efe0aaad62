//! funcheck orchestration.
//!
//! Ties the workspace together: the test registry and built-in tests,
//! the run lifecycle (seed, provenance, guaranteed finalize), the
//! multi-process repeat pool, the markdown status report, and the CLI.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pool;
pub mod registry;
pub mod report;
pub mod runner;

pub use config::Config;
pub use error::CoreError;
pub use registry::{FunctionalTest, Registry, RunRecorder};
pub use runner::{analyse_test, find_next_test, run_test};
