//! SQLite-backed record store.
//!
//! Each run is one row, owned end-to-end by a single process: `begin`
//! inserts a placeholder, `set` upserts fields as the test computes
//! metrics, `finalize` closes the record. Multiple processes may hold
//! independent connections to the same database; contention is resolved
//! by SQLite's own locking with a bounded busy timeout, after which an
//! operation surfaces [`StoreError::Busy`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use fc_codec::{decode_map, encode_map, encode_value, validate_key, Value};
use fc_common::{ProvenanceContext, RunStatus, TestName};

use crate::error::StoreError;
use crate::record::StoredRecord;
use crate::schema;

/// Bounded wait for a locked database before failing with `Busy`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle to one in-progress record row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHandle(pub(crate) i64);

impl RecordHandle {
    pub fn id(self) -> i64 {
        self.0
    }
}

/// A connection to the results database.
pub struct RecordStore {
    conn: Connection,
    path: PathBuf,
}

impl RecordStore {
    /// Open (creating if needed) the results database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| StoreError::Unavailable(format!("{}: {err}", path.display())))?;
            }
        }
        let conn = Connection::open(&path)
            .map_err(|err| StoreError::Unavailable(format!("{}: {err}", path.display())))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        schema::ensure_schema(&conn)?;
        tracing::debug!(path = %path.display(), "opened record store");
        Ok(RecordStore { conn, path })
    }

    /// An in-memory store, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        schema::ensure_schema(&conn)?;
        Ok(RecordStore {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a placeholder row for a new run and return its handle.
    ///
    /// The placeholder is immediately visible to `query`, so a run that
    /// dies mid-way still leaves a `status=uninitialised` row behind.
    pub fn begin(
        &self,
        name: &TestName,
        date: DateTime<Utc>,
    ) -> Result<RecordHandle, StoreError> {
        self.conn.execute(
            "INSERT INTO test_results (name, date, status) VALUES (?1, ?2, ?3)",
            params![name.as_str(), date, RunStatus::Uninitialised.as_str()],
        )?;
        let handle = RecordHandle(self.conn.last_insert_rowid());
        tracing::debug!(name = %name, id = handle.0, "began record");
        Ok(handle)
    }

    /// Upsert one field of an in-progress record.
    ///
    /// Identity columns (`id`, `name`, `date`) are silently ignored;
    /// recognized schema names update their fixed column (`commit` is
    /// redirected to `commit_hashes`); everything else merges into the
    /// extension map. The read-modify-write of the extension blob is
    /// safe because concurrent writers always operate on distinct rows.
    pub fn set(&self, handle: RecordHandle, key: &str, value: &Value) -> Result<(), StoreError> {
        validate_key(key)?;
        if schema::is_identity_column(key) {
            tracing::debug!(key, id = handle.0, "ignoring write to identity column");
            return Ok(());
        }
        if let Some(column) = schema::fixed_column(key) {
            // Column name comes from the static schema list, never from
            // caller input, so interpolation is safe.
            let sql = format!("UPDATE test_results SET {column} = ?1 WHERE id = ?2");
            match value {
                Value::Int(i) => self.conn.execute(&sql, params![i, handle.0])?,
                Value::Float(f) => self.conn.execute(&sql, params![f, handle.0])?,
                Value::Str(s) => self.conn.execute(&sql, params![s, handle.0])?,
                Value::IntArray(_) | Value::FloatArray(_) => {
                    let text = encode_value(key, value)?;
                    self.conn.execute(&sql, params![text, handle.0])?
                }
            };
            return Ok(());
        }
        let raw: Option<String> = self.conn.query_row(
            "SELECT json FROM test_results WHERE id = ?1",
            params![handle.0],
            |row| row.get(0),
        )?;
        let mut map = decode_map(&raw.unwrap_or_default());
        map.insert(key.to_string(), value.clone());
        let text = encode_map(&map)?;
        self.conn.execute(
            "UPDATE test_results SET json = ?1 WHERE id = ?2",
            params![text, handle.0],
        )?;
        Ok(())
    }

    /// Convenience wrapper for status transitions.
    pub fn set_status(&self, handle: RecordHandle, status: RunStatus) -> Result<(), StoreError> {
        self.set(handle, "status", &Value::Str(status.as_str().to_string()))
    }

    /// Record the run's provenance and seed on its fixed columns.
    pub fn record_provenance(
        &self,
        handle: RecordHandle,
        provenance: &ProvenanceContext,
        seed: u32,
    ) -> Result<(), StoreError> {
        let set_str = |key: &str, text: &str| self.set(handle, key, &Value::Str(text.to_string()));
        set_str("language_version", &provenance.language_version)?;
        set_str("library_version", &provenance.library_version)?;
        set_str("library_commit", &provenance.library_commit.hash)?;
        set_str("harness_commit", &provenance.harness_commit.hash)?;
        set_str("commit", &provenance.commit_key())?;
        let set_time = |key: &str, time: &Option<DateTime<Utc>>| -> Result<(), StoreError> {
            if let Some(time) = time {
                set_str(key, &time.to_rfc3339())?;
            }
            Ok(())
        };
        set_time("library_authored_at", &provenance.library_commit.authored_at)?;
        set_time("library_committed_at", &provenance.library_commit.committed_at)?;
        set_time("harness_authored_at", &provenance.harness_commit.authored_at)?;
        set_time("harness_committed_at", &provenance.harness_commit.committed_at)?;
        if let Some(message) = &provenance.library_commit.message {
            set_str("library_message", message)?;
        }
        if let Some(message) = &provenance.harness_commit.message {
            set_str("harness_message", message)?;
        }
        self.set(handle, "seed", &Value::from(seed))?;
        Ok(())
    }

    /// Close a record. Writes are already durable (autocommit); this
    /// only confirms the row survived, so a partial failure surfaces at
    /// the run boundary instead of during a later scan.
    pub fn finalize(&self, handle: RecordHandle) -> Result<(), StoreError> {
        let _: i64 = self.conn.query_row(
            "SELECT id FROM test_results WHERE id = ?1",
            params![handle.0],
            |row| row.get(0),
        )?;
        tracing::debug!(id = handle.0, "finalized record");
        Ok(())
    }

    /// All records for a test, any status, ordered by the two
    /// commit-authored timestamps when present and insertion order
    /// otherwise.
    pub fn query(&self, name: &TestName) -> Result<Vec<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, date, status, language_version, library_version,
                    library_commit, harness_commit, commit_hashes,
                    library_authored_at, library_committed_at, library_message,
                    harness_authored_at, harness_committed_at, harness_message,
                    seed, json
             FROM test_results
             WHERE name = ?1
             ORDER BY COALESCE(library_authored_at, ''),
                      COALESCE(harness_authored_at, ''),
                      id",
        )?;
        let rows = stmt.query_map(params![name.as_str()], |row| {
            let id: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            let date: DateTime<Utc> = row.get(2)?;
            let status: String = row.get(3)?;
            let mut fixed = BTreeMap::new();
            let text_columns: &[(&str, usize)] = &[
                ("language_version", 4),
                ("library_version", 5),
                ("library_commit", 6),
                ("harness_commit", 7),
                ("commit_hashes", 8),
                ("library_authored_at", 9),
                ("library_committed_at", 10),
                ("library_message", 11),
                ("harness_authored_at", 12),
                ("harness_committed_at", 13),
                ("harness_message", 14),
            ];
            for (column, index) in text_columns {
                if let Some(text) = row.get::<_, Option<String>>(*index)? {
                    fixed.insert((*column).to_string(), Value::Str(text));
                }
            }
            if let Some(seed) = row.get::<_, Option<i64>>(15)? {
                fixed.insert("seed".to_string(), Value::Int(seed));
            }
            let extension_raw: Option<String> = row.get(16)?;
            Ok(StoredRecord::new(
                id,
                name,
                date,
                RunStatus::parse(&status),
                fixed,
                extension_raw.unwrap_or_default(),
            ))
        })?;
        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Latest run date per known test name, defaulting to the Unix epoch
    /// for names that have never run. Powers "run the test that has
    /// waited longest" scheduling.
    pub fn latest_dates(
        &self,
        names: &[TestName],
    ) -> Result<BTreeMap<String, DateTime<Utc>>, StoreError> {
        let mut out: BTreeMap<String, DateTime<Utc>> = names
            .iter()
            .map(|name| (name.as_str().to_string(), DateTime::UNIX_EPOCH))
            .collect();
        let mut stmt = self
            .conn
            .prepare("SELECT name, MAX(date) FROM test_results GROUP BY name")?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let date: Option<DateTime<Utc>> = row.get(1)?;
            Ok((name, date))
        })?;
        for row in rows {
            let (name, date) = row?;
            if let (Some(entry), Some(date)) = (out.get_mut(&name), date) {
                *entry = date;
            }
        }
        Ok(out)
    }
}
