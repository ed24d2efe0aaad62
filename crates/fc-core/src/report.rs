//! Markdown status report.

use std::path::Path;

use tracing::{info, warn};

use fc_common::format_run_date;
use fc_store::RecordStore;

use crate::error::CoreError;
use crate::registry::Registry;
use crate::runner::analyse_test;

/// Render the status report: one section per registered test with its
/// last run date and verdict, and a trailing failure count. An analysis
/// error counts as a failure for that test but never aborts the batch.
pub fn generate_report(store: &RecordStore, registry: &Registry) -> Result<String, CoreError> {
    let names = registry.names();
    let dates = store.latest_dates(&names)?;

    let mut out = String::from("# funcheck status report\n\n");
    let mut failures = 0usize;
    for name in &names {
        let passed = match analyse_test(store, registry, name.as_str()) {
            Ok(passed) => passed,
            Err(err) => {
                warn!(%name, %err, "analysis error, reported as failure");
                false
            }
        };
        if !passed {
            failures += 1;
        }
        out.push_str(&format!("## {name}\n\n"));
        if let Some(date) = dates.get(name.as_str()) {
            out.push_str(&format!("- Last run on: {}\n", format_run_date(*date)));
        }
        out.push_str(&format!(
            "- Status: {}\n\n",
            if passed { "ok" } else { "FAILED" }
        ));
    }
    out.push_str(&format!("{failures} of {} tests failing\n", names.len()));
    Ok(out)
}

/// Render and write the report to `path`, creating parent directories.
pub fn write_report(
    store: &RecordStore,
    registry: &Registry,
    path: &Path,
) -> Result<(), CoreError> {
    let text = generate_report(store, registry)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, text)?;
    info!(path = %path.display(), "report written");
    Ok(())
}
