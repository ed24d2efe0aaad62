//! The regression oracle: has a tracked metric drifted from baseline?

use tracing::debug;

use crate::aggregate::{aggregate_by_commit, AggregateOptions};
use crate::resultset::ResultSet;

/// Default number of recent commit groups the oracle inspects.
pub const DEFAULT_RECENT_WINDOW: usize = 3;

/// Check that the metric's recent per-commit means all lie within
/// `3 * sigma` of `expected` (absolute deviation, not z-score).
///
/// Only the last `window` commit groups are judged, so an old regression
/// that has since been fixed does not keep failing the check forever;
/// sparse histories with fewer groups are judged over what exists.
/// Outlier trimming is deliberately off here: a run whose metric lands
/// far from its siblings is exactly the signal the oracle exists to
/// catch.
///
/// With no recorded history there is nothing to judge and the check
/// passes vacuously; the first real run seeds the baseline.
pub fn has_not_deviated(
    expected: f64,
    sigma: f64,
    results: &ResultSet,
    metric: &str,
    window: usize,
) -> bool {
    let aggregate = aggregate_by_commit(
        results,
        metric,
        &AggregateOptions {
            remove_outliers: false,
            short_names: false,
            limit_last_n_commits: None,
        },
    );
    let window_start = aggregate.means.len().saturating_sub(window);
    let recent = &aggregate.means[window_start..];
    let tolerance = 3.0 * sigma;
    for (mean, commit) in recent.iter().zip(&aggregate.unique_commits[window_start..]) {
        let deviation = (mean - expected).abs();
        debug!(metric, %commit, mean, deviation, tolerance, "oracle check");
        if !(deviation <= tolerance) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fc_codec::Value;
    use fc_store::StoredRecord;
    use std::collections::BTreeMap;

    fn results(rows: Vec<(&str, f64)>) -> ResultSet {
        ResultSet::new(
            rows.into_iter()
                .map(|(commit, value)| {
                    let mut fields = BTreeMap::new();
                    fields.insert("commit_hashes".to_string(), Value::Str(commit.to_string()));
                    fields.insert("fbest_relative".to_string(), Value::Float(value));
                    StoredRecord::from_fields(
                        "opt_fn_CMAES",
                        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                        fields,
                    )
                })
                .collect(),
        )
    }

    fn check(expected: f64, sigma: f64, results: &ResultSet) -> bool {
        has_not_deviated(
            expected,
            sigma,
            results,
            "fbest_relative",
            DEFAULT_RECENT_WINDOW,
        )
    }

    #[test]
    fn test_within_tolerance_passes() {
        let results = results(vec![("aaa", 1.02), ("bbb", 0.97), ("ccc", 1.05)]);
        assert!(check(1.0, 0.1, &results));
    }

    #[test]
    fn test_deviated_recent_commit_fails() {
        let results = results(vec![("aaa", 1.02), ("bbb", 0.97), ("ccc", 1.5)]);
        assert!(!check(1.0, 0.1, &results));
    }

    #[test]
    fn test_old_regression_ages_out_of_window() {
        let results = results(vec![
            ("aaa", 5.0),
            ("bbb", 1.0),
            ("ccc", 1.0),
            ("ddd", 1.0),
        ]);
        assert!(check(1.0, 0.1, &results));
        // A wider window reaches back to the bad commit.
        assert!(!has_not_deviated(1.0, 0.1, &results, "fbest_relative", 4));
    }

    #[test]
    fn test_sparse_history_judged_over_what_exists() {
        let results = results(vec![("aaa", 1.02)]);
        assert!(check(1.0, 0.1, &results));
        let results = self::results(vec![("aaa", 1.5)]);
        assert!(!check(1.0, 0.1, &results));
    }

    #[test]
    fn test_empty_history_passes_vacuously() {
        let results = results(vec![]);
        assert!(check(1.0, 0.1, &results));
    }

    #[test]
    fn test_nan_mean_fails() {
        let results = results(vec![("aaa", f64::NAN)]);
        assert!(!check(1.0, 0.1, &results));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let results = results(vec![("aaa", 1.3)]);
        assert!(check(1.0, 0.1, &results));
        let results = self::results(vec![("aaa", 1.3000001)]);
        assert!(!check(1.0, 0.1, &results));
    }
}
