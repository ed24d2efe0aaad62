//! Legacy flat-file record format.
//!
//! Before the database backend, each run was one text file of sorted
//! `key: value` lines named `<test>-<date>.txt`. The reader keeps
//! historical result directories usable; the writer exists so exported
//! records stay byte-compatible with that history.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fc_codec::{decode_map, encode, Value};

use crate::error::StoreError;

/// Returns a path equal or similar to `path` that does not yet exist,
/// by appending `-2`, `-3`, ... before the extension.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
    let mut counter = 2;
    loop {
        let file_name = match &extension {
            Some(ext) => format!("{stem}-{counter}.{ext}"),
            None => format!("{stem}-{counter}"),
        };
        let candidate = path.with_file_name(file_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Writes one record to a flat file.
///
/// Fields accumulate in memory (encoded immediately, so type errors
/// surface at `set` time) and hit disk once on `write`.
pub struct FlatFileWriter {
    path: PathBuf,
    data: BTreeMap<String, String>,
}

impl FlatFileWriter {
    /// Create a writer. Refuses to target an existing file unless
    /// `overwrite` is set, and never targets a directory or symlink.
    pub fn create(path: impl AsRef<Path>, overwrite: bool) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() && (!overwrite || path.is_dir() || path.is_symlink()) {
            return Err(StoreError::NotWritable(path.display().to_string()));
        }
        Ok(FlatFileWriter {
            path,
            data: BTreeMap::new(),
        })
    }

    /// Store one field for later writing.
    pub fn set(&mut self, key: &str, value: &Value) -> Result<(), StoreError> {
        let line = encode(key, value)?;
        // encode() emits "key: value"; keep only the value part so the
        // final write can re-sort lines by key.
        let encoded = line
            .split_once(": ")
            .map(|(_, v)| v.to_string())
            .unwrap_or_default();
        self.data.insert(key.to_string(), encoded);
        Ok(())
    }

    /// Write all fields as sorted `key: value` lines.
    pub fn write(&self) -> Result<(), StoreError> {
        let mut text = String::new();
        for (key, value) in &self.data {
            text.push_str(key);
            text.push_str(": ");
            text.push_str(value);
            text.push('\n');
        }
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read a flat record file into a field map.
///
/// Malformed lines are logged and skipped; the rest of the record still
/// loads.
pub fn read_record_file(path: impl AsRef<Path>) -> Result<BTreeMap<String, Value>, StoreError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    Ok(decode_map(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("opt_fn_CMAES-2024-05-01-09:00:00.txt");
        let mut writer = FlatFileWriter::create(&path, false).unwrap();
        writer.set("status", &Value::Str("done".into())).unwrap();
        writer.set("seed", &Value::Int(42)).unwrap();
        writer.set("fbest_relative", &Value::Float(1.02)).unwrap();
        writer
            .set("ess", &Value::FloatArray(vec![0.9, 0.95, 0.99]))
            .unwrap();
        writer.write().unwrap();

        let fields = read_record_file(&path).unwrap();
        assert_eq!(fields["status"], Value::Str("done".into()));
        assert_eq!(fields["seed"], Value::Int(42));
        assert_eq!(fields["fbest_relative"], Value::Float(1.02));
        assert_eq!(fields["ess"], Value::FloatArray(vec![0.9, 0.95, 0.99]));
    }

    #[test]
    fn test_lines_are_sorted_by_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.txt");
        let mut writer = FlatFileWriter::create(&path, false).unwrap();
        writer.set("zeta", &Value::Int(1)).unwrap();
        writer.set("alpha", &Value::Int(2)).unwrap();
        writer.write().unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("alpha:"));
        assert!(lines[1].starts_with("zeta:"));
    }

    #[test]
    fn test_refuses_overwrite_by_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.txt");
        std::fs::write(&path, "existing").unwrap();
        assert!(FlatFileWriter::create(&path, false).is_err());
        assert!(FlatFileWriter::create(&path, true).is_ok());
    }

    #[test]
    fn test_unique_path_appends_counter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.txt");
        assert_eq!(unique_path(&path), path);
        std::fs::write(&path, "x").unwrap();
        let second = unique_path(&path);
        assert_eq!(second, dir.path().join("r-2.txt"));
        std::fs::write(&second, "x").unwrap();
        assert_eq!(unique_path(&path), dir.path().join("r-3.txt"));
    }

    #[test]
    fn test_corrupt_line_does_not_poison_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.txt");
        std::fs::write(&path, "good: 1\ngarbage without separator\nother: 2.5\n").unwrap();
        let fields = read_record_file(&path).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["good"], Value::Int(1));
        assert_eq!(fields["other"], Value::Float(2.5));
    }
}
