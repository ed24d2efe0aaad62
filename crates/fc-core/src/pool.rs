//! Multi-process repeat runs.
//!
//! Repeats execute as child processes of the current binary rather than
//! threads: each run gets its own store connection and its own seed, and
//! a crash in one test body cannot take down the batch. Concurrent
//! record writes are safe because every child owns a distinct row.

use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::{info, warn};

use fc_common::TestName;

use crate::error::CoreError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepeatSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Worker pool size: `min(repeats, cores - 2)`, at least one. Two cores
/// are held back for the parent and whatever else the host is doing.
pub fn worker_count(repeats: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    repeats.min(cores.saturating_sub(2)).max(1)
}

/// Run `repeats` independent runs of `name` against `database`, at most
/// [`worker_count`] at a time. Child failures are tallied, not fatal to
/// the batch; the summary reports both counts.
pub fn run_repeats(
    name: &TestName,
    repeats: usize,
    database: &Path,
) -> Result<RepeatSummary, CoreError> {
    let exe = std::env::current_exe()?;
    let workers = worker_count(repeats);
    info!(%name, repeats, workers, "spawning repeat runs");

    let mut summary = RepeatSummary::default();
    let mut pending = repeats;
    let mut active: Vec<Child> = Vec::new();
    while pending > 0 || !active.is_empty() {
        while pending > 0 && active.len() < workers {
            let child = Command::new(&exe)
                .arg("run")
                .arg(name.as_str())
                .arg("--database")
                .arg(database)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .spawn()?;
            active.push(child);
            pending -= 1;
        }
        let mut child = active.remove(0);
        let status = child.wait()?;
        if status.success() {
            summary.succeeded += 1;
        } else {
            warn!(%name, %status, "repeat run failed");
            summary.failed += 1;
        }
    }
    info!(%name, summary.succeeded, summary.failed, "repeat runs complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_bounds() {
        assert_eq!(worker_count(0), 1);
        assert_eq!(worker_count(1), 1);
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert!(worker_count(1000) <= cores.saturating_sub(2).max(1));
        assert!(worker_count(1000) >= 1);
    }
}
