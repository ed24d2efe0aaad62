//! Read-only column projection over a set of run records.

use std::cell::RefCell;
use std::collections::HashMap;

use fc_codec::Value;
use fc_store::StoredRecord;

/// A collection of records sharing a test name.
///
/// Projections are column-style: given one or more field keys, return
/// parallel value lists across all records. A record missing any
/// requested key is dropped from the projection entirely rather than
/// null-filled; sparse historical data (older schema versions lacking
/// newer fields) simply contributes fewer rows.
///
/// Projection results are cached per exact key set, so repeated reads
/// within one logical epoch are cheap and consistent.
pub struct ResultSet {
    records: Vec<StoredRecord>,
    cache: RefCell<HashMap<Vec<String>, Vec<Vec<Value>>>>,
}

impl ResultSet {
    pub fn new(records: Vec<StoredRecord>) -> Self {
        ResultSet {
            records,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    /// Project the given keys into index-aligned parallel columns.
    pub fn project(&self, keys: &[&str]) -> Vec<Vec<Value>> {
        let cache_key: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();
        if let Some(hit) = self.cache.borrow().get(&cache_key) {
            return hit.clone();
        }
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); keys.len()];
        for record in &self.records {
            // Missing keys are a routine per-record condition, handled
            // with an Option lookup, never an error.
            let row: Option<Vec<Value>> = keys.iter().map(|key| record.field(key)).collect();
            if let Some(row) = row {
                for (column, value) in columns.iter_mut().zip(row) {
                    column.push(value);
                }
            }
        }
        self.cache
            .borrow_mut()
            .insert(cache_key, columns.clone());
        columns
    }

    /// Single-key sugar over [`project`](Self::project).
    pub fn column(&self, key: &str) -> Vec<Value> {
        self.project(&[key]).pop().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn record(fields: &[(&str, Value)]) -> StoredRecord {
        let map: BTreeMap<String, Value> = fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        StoredRecord::from_fields(
            "t",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            map,
        )
    }

    fn sample() -> ResultSet {
        ResultSet::new(vec![
            record(&[("score", Value::Float(1.0)), ("seed", Value::Int(1))]),
            record(&[("score", Value::Float(2.0))]),
            record(&[("seed", Value::Int(3))]),
        ])
    }

    #[test]
    fn test_single_key_projection() {
        let results = sample();
        assert_eq!(
            results.column("score"),
            vec![Value::Float(1.0), Value::Float(2.0)]
        );
    }

    #[test]
    fn test_multi_key_drops_incomplete_records() {
        let results = sample();
        let columns = results.project(&["score", "seed"]);
        // Only the first record has both keys.
        assert_eq!(columns[0], vec![Value::Float(1.0)]);
        assert_eq!(columns[1], vec![Value::Int(1)]);
    }

    #[test]
    fn test_absent_key_yields_empty_not_error() {
        let results = sample();
        assert!(results.column("never_stored").is_empty());
        let columns = results.project(&["score", "never_stored"]);
        assert!(columns[0].is_empty());
        assert!(columns[1].is_empty());
    }

    #[test]
    fn test_repeated_projection_is_consistent() {
        let results = sample();
        let first = results.project(&["score", "seed"]);
        let second = results.project(&["score", "seed"]);
        assert_eq!(first, second);
    }
}
