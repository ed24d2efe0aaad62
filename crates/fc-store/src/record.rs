//! A materialized test-run record.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fc_codec::{decode_map, Value};
use fc_common::{format_run_date, RunStatus};

use crate::schema;

/// One row from the record store.
///
/// Fixed columns are read eagerly; the extension blob is decoded lazily
/// on first field access, so scanning a large history only pays for the
/// fields a projection actually requests.
#[derive(Debug)]
pub struct StoredRecord {
    id: i64,
    name: String,
    date: DateTime<Utc>,
    status: RunStatus,
    fixed: BTreeMap<String, Value>,
    extension_raw: String,
    extension: OnceCell<BTreeMap<String, Value>>,
}

impl StoredRecord {
    pub(crate) fn new(
        id: i64,
        name: String,
        date: DateTime<Utc>,
        status: RunStatus,
        fixed: BTreeMap<String, Value>,
        extension_raw: String,
    ) -> Self {
        StoredRecord {
            id,
            name,
            date,
            status,
            fixed,
            extension_raw,
            extension: OnceCell::new(),
        }
    }

    /// Build a record directly from a field map, without a database row.
    /// Used by unit tests and by flat-file ingestion; mapped keys should
    /// use their column names (`commit_hashes`, not `commit`).
    pub fn from_fields(
        name: impl Into<String>,
        date: DateTime<Utc>,
        fields: BTreeMap<String, Value>,
    ) -> Self {
        StoredRecord {
            id: 0,
            name: name.into(),
            date,
            status: RunStatus::Done,
            fixed: fields,
            extension_raw: String::new(),
            extension: OnceCell::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Look up a field by logical key.
    ///
    /// Identity and fixed columns resolve first (with `commit` mapped to
    /// the composite `commit_hashes` column), then the extension map.
    /// A missing key is an ordinary `None`, not an error: projections
    /// routinely probe records that predate newer fields.
    pub fn field(&self, key: &str) -> Option<Value> {
        match key {
            "name" => return Some(Value::Str(self.name.clone())),
            "date" => return Some(Value::Str(format_run_date(self.date))),
            "status" => return Some(Value::Str(self.status.as_str().to_string())),
            "id" => return Some(Value::Int(self.id)),
            _ => {}
        }
        if let Some(column) = schema::fixed_column(key) {
            return self.fixed.get(column).cloned();
        }
        self.fixed
            .get(key)
            .cloned()
            .or_else(|| self.extension().get(key).cloned())
    }

    fn extension(&self) -> &BTreeMap<String, Value> {
        self.extension
            .get_or_init(|| decode_map(&self.extension_raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> StoredRecord {
        let mut fixed = BTreeMap::new();
        fixed.insert("seed".to_string(), Value::Int(42));
        fixed.insert(
            "commit_hashes".to_string(),
            Value::Str("abc1234def/fed4321cba".to_string()),
        );
        StoredRecord::new(
            7,
            "opt_fn_CMAES".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            RunStatus::Done,
            fixed,
            "fbest_relative:  1.02000000000000000e+00\ness: [ 9.00000000000000000e-01,  9.50000000000000000e-01]".to_string(),
        )
    }

    #[test]
    fn test_identity_fields() {
        let r = record();
        assert_eq!(r.field("name"), Some(Value::Str("opt_fn_CMAES".into())));
        assert_eq!(r.field("date"), Some(Value::Str("2024-01-02-03:04:05".into())));
        assert_eq!(r.field("status"), Some(Value::Str("done".into())));
        assert_eq!(r.field("id"), Some(Value::Int(7)));
    }

    #[test]
    fn test_commit_maps_to_composite() {
        let r = record();
        assert_eq!(
            r.field("commit"),
            Some(Value::Str("abc1234def/fed4321cba".into()))
        );
        assert_eq!(r.field("commit"), r.field("commit_hashes"));
    }

    #[test]
    fn test_extension_fields_decode_lazily() {
        let r = record();
        assert_eq!(r.field("fbest_relative"), Some(Value::Float(1.02)));
        assert_eq!(
            r.field("ess"),
            Some(Value::FloatArray(vec![0.9, 0.95]))
        );
        assert_eq!(r.field("never_stored"), None);
    }
}
