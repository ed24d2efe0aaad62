//! Harness configuration.
//!
//! A small JSON file at `<config dir>/funcheck/config.json` supplies the
//! database and report paths; a missing file means defaults under the
//! platform data directory. CLI flags override both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Results database path.
    pub database: PathBuf,
    /// Default output path for the markdown report.
    pub report: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("funcheck");
        Config {
            database: data.join("results.db"),
            report: data.join("report.md"),
        }
    }
}

impl Config {
    /// Load from the platform config directory, defaulting when absent.
    pub fn load() -> Result<Self, CoreError> {
        match dirs::config_dir() {
            Some(dir) => Self::load_from(&dir.join("funcheck").join("config.json")),
            None => Ok(Config::default()),
        }
    }

    /// Load from an explicit path. A missing file yields the defaults; a
    /// present but malformed file is an error, not a silent fallback.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|err| CoreError::Config(format!("{}: {err}", path.display()))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}
