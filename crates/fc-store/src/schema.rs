//! Table schema for test-run records.
//!
//! One row per run: identity columns, fixed provenance columns, and one
//! extension blob column (`json`, name kept from the legacy schema)
//! holding all non-fixed keys in the fc-codec flat encoding.

use rusqlite::Connection;

use crate::error::StoreError;

/// Identity columns: written once at `begin`, never rewritten.
pub const IDENTITY_COLUMNS: &[&str] = &["id", "name", "date"];

/// Fixed columns that `set` routes to directly.
pub const FIXED_COLUMNS: &[&str] = &[
    "status",
    "language_version",
    "library_version",
    "library_commit",
    "harness_commit",
    "commit_hashes",
    "library_authored_at",
    "library_committed_at",
    "library_message",
    "harness_authored_at",
    "harness_committed_at",
    "harness_message",
    "seed",
];

/// Logical keys redirected to a fixed column.
pub const MAPPED_COLUMNS: &[(&str, &str)] = &[("commit", "commit_hashes")];

/// Resolve a logical key to its fixed column, if it has one.
pub fn fixed_column(key: &str) -> Option<&'static str> {
    if let Some((_, target)) = MAPPED_COLUMNS.iter().find(|(from, _)| *from == key) {
        return Some(target);
    }
    FIXED_COLUMNS.iter().find(|col| **col == key).copied()
}

/// Returns true for columns that cannot be rewritten after `begin`.
pub fn is_identity_column(key: &str) -> bool {
    IDENTITY_COLUMNS.contains(&key)
}

pub(crate) fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS test_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'uninitialised',
            language_version TEXT,
            library_version TEXT,
            library_commit TEXT,
            harness_commit TEXT,
            commit_hashes TEXT,
            library_authored_at TEXT,
            library_committed_at TEXT,
            library_message TEXT,
            harness_authored_at TEXT,
            harness_committed_at TEXT,
            harness_message TEXT,
            seed INTEGER,
            json TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_test_results_name ON test_results(name);",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_column_lookup() {
        assert_eq!(fixed_column("status"), Some("status"));
        assert_eq!(fixed_column("seed"), Some("seed"));
        assert_eq!(fixed_column("commit"), Some("commit_hashes"));
        assert_eq!(fixed_column("fbest_relative"), None);
    }

    #[test]
    fn test_identity_columns() {
        assert!(is_identity_column("name"));
        assert!(is_identity_column("date"));
        assert!(is_identity_column("id"));
        assert!(!is_identity_column("status"));
    }
}
