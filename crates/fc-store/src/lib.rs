//! Record store for funcheck.
//!
//! Append-only storage of named, dated test-run records. The primary
//! backend is a SQLite database with one row per run: fixed provenance
//! columns plus an open-ended extension blob encoded with the fc-codec
//! flat format. A legacy flat-file reader/writer is kept for historical
//! result directories; both representations share the same value-type
//! rules, so old and new data aggregate together.

pub mod error;
pub mod flatfile;
pub mod record;
pub mod schema;
pub mod store;

pub use error::StoreError;
pub use flatfile::{read_record_file, unique_path, FlatFileWriter};
pub use record::StoredRecord;
pub use store::{RecordHandle, RecordStore};
