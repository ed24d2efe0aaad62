//! funcheck common types.
//!
//! This crate provides foundational types shared across the funcheck
//! workspace:
//! - Validated test and result-key names
//! - Run status lifecycle
//! - Per-run provenance context
//! - Date formatting for run identifiers

pub mod date;
pub mod error;
pub mod name;
pub mod provenance;
pub mod status;

pub use date::{format_run_date, parse_run_date, RUN_DATE_FORMAT};
pub use error::{NameError, Result};
pub use name::TestName;
pub use provenance::ProvenanceContext;
pub use status::RunStatus;
