//! Command line interface.
//!
//! stdout carries command output only (test listings, verdicts); logs go
//! to stderr. `analyse` prints its verdict and exits zero either way, so
//! scripted callers parse the output rather than the exit code; `run`
//! exits non-zero when the run (or any repeat) fails.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use fc_common::{format_run_date, TestName};
use fc_store::RecordStore;

use crate::config::Config;
use crate::error::CoreError;
use crate::pool;
use crate::registry::Registry;
use crate::report;
use crate::runner;

/// Functional regression testing for a Bayesian inference library.
#[derive(Parser)]
#[command(name = "funcheck", version, about, propagate_version = true)]
pub struct Cli {
    /// Path to the results database (overrides config)
    #[arg(long, global = true, env = "FUNCHECK_DB")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered tests with their last run dates, oldest first
    List,

    /// Run the test that has waited longest
    Next,

    /// Run a named test, optionally repeated across worker processes
    Run {
        name: String,

        /// Number of independent runs
        #[arg(short, long, default_value_t = 1)]
        repeats: usize,
    },

    /// Analyse a test's history and print ok or FAILED
    Analyse { name: String },

    /// Write the markdown status report
    Report {
        /// Output path (defaults to the configured report path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Dispatch a parsed invocation.
pub fn run(cli: Cli) -> Result<(), CoreError> {
    let config = Config::load()?;
    let database = cli.database.unwrap_or(config.database);
    let registry = Registry::builtin()?;

    match cli.command {
        Commands::List => {
            let store = RecordStore::open(&database)?;
            let names = registry.names();
            let dates = store.latest_dates(&names)?;
            let width = names.iter().map(|n| n.as_str().len()).max().unwrap_or(0) + 1;
            let mut listing: Vec<_> = dates.into_iter().collect();
            listing.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
            for (name, date) in listing {
                println!("{name:<width$}{}", format_run_date(date));
            }
            Ok(())
        }
        Commands::Next => {
            let store = RecordStore::open(&database)?;
            match runner::find_next_test(&store, &registry)? {
                Some(name) => runner::run_test(&store, &registry, name.as_str()),
                None => {
                    info!("no tests registered");
                    Ok(())
                }
            }
        }
        Commands::Run { name, repeats } => {
            if repeats > 1 {
                // Validate up front so a typo fails before any spawn.
                registry
                    .get(&name)
                    .ok_or_else(|| CoreError::UnknownTest(name.clone()))?;
                let name = TestName::new(name)?;
                let summary = pool::run_repeats(&name, repeats, &database)?;
                println!("{} succeeded, {} failed", summary.succeeded, summary.failed);
                if summary.failed > 0 {
                    return Err(CoreError::RepeatFailures {
                        failed: summary.failed,
                        total: repeats,
                    });
                }
                Ok(())
            } else {
                let store = RecordStore::open(&database)?;
                runner::run_test(&store, &registry, &name)
            }
        }
        Commands::Analyse { name } => {
            let store = RecordStore::open(&database)?;
            let passed = runner::analyse_test(&store, &registry, &name)?;
            println!("{}", if passed { "ok" } else { "FAILED" });
            Ok(())
        }
        Commands::Report { output } => {
            let store = RecordStore::open(&database)?;
            let path = output.unwrap_or(config.report);
            report::write_report(&store, &registry, &path)
        }
    }
}
