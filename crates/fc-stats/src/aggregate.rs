//! Commit-keyed aggregation of a tracked metric.

use std::collections::HashMap;

use fc_codec::Value;

use crate::resultset::ResultSet;
use crate::robust;

/// Knobs for [`aggregate_by_commit`].
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Trim gross outliers per commit group before computing statistics.
    pub remove_outliers: bool,
    /// Abbreviate each commit hash component to 7 characters.
    pub short_names: bool,
    /// Keep only the most recent N commit groups.
    pub limit_last_n_commits: Option<usize>,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions {
            remove_outliers: false,
            short_names: true,
            limit_last_n_commits: None,
        }
    }
}

/// Per-commit aggregation result.
///
/// `commits` and `values` are the flat post-trim observations, parallel
/// and ordered by commit group; `unique_commits`, `means` and `stds` are
/// parallel per-group summaries. Groups left with no observations after
/// trimming are omitted from all five lists.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitAggregate {
    pub commits: Vec<String>,
    pub values: Vec<f64>,
    pub unique_commits: Vec<String>,
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

/// Group a metric's observations by commit and summarize each group.
///
/// Records are assumed chronologically ordered (the store's query order),
/// so first-seen commit order is chronological order. Array-valued
/// metrics flatten into independent scalar observations within their
/// record's group. Group statistics are computed over the finite subset;
/// a group with no finite observations reports its first raw value as
/// the mean with a zero spread, so a run that produced only NaN still
/// shows up in a report instead of silently vanishing.
pub fn aggregate_by_commit(
    results: &ResultSet,
    metric: &str,
    options: &AggregateOptions,
) -> CommitAggregate {
    let columns = results.project(&["commit", metric]);
    let (commit_column, value_column) = (&columns[0], &columns[1]);

    // Group observations by commit, preserving first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut groups: Vec<Vec<f64>> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();
    for (commit, value) in commit_column.iter().zip(value_column) {
        let commit = match commit.as_str() {
            Some(s) => s.to_string(),
            None => continue,
        };
        let index = *index_of.entry(commit.clone()).or_insert_with(|| {
            order.push(commit);
            groups.push(Vec::new());
            order.len() - 1
        });
        value.flatten_into(&mut groups[index]);
    }

    if let Some(n) = options.limit_last_n_commits {
        if order.len() > n {
            let cut = order.len() - n;
            order.drain(..cut);
            groups.drain(..cut);
        }
    }

    if options.short_names {
        for commit in &mut order {
            *commit = short_commit(commit);
        }
    }

    let mut aggregate = CommitAggregate {
        commits: Vec::new(),
        values: Vec::new(),
        unique_commits: Vec::new(),
        means: Vec::new(),
        stds: Vec::new(),
    };
    for (commit, group) in order.into_iter().zip(groups) {
        let group = if options.remove_outliers {
            robust::trim_outliers(&group)
        } else {
            group
        };
        if group.is_empty() {
            continue;
        }
        let finite: Vec<f64> = group.iter().copied().filter(|x| x.is_finite()).collect();
        let (mean, std) = if finite.is_empty() {
            (group[0], 0.0)
        } else {
            (robust::mean(&finite), robust::std(&finite))
        };
        for value in &group {
            aggregate.commits.push(commit.clone());
            aggregate.values.push(*value);
        }
        aggregate.unique_commits.push(commit);
        aggregate.means.push(mean);
        aggregate.stds.push(std);
    }
    aggregate
}

/// Abbreviate each `/`-separated hash component to its first 7
/// characters, joined with newlines for stacked axis labels.
fn short_commit(commit: &str) -> String {
    commit
        .split('/')
        .map(|part| part.chars().take(7).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
