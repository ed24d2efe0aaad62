//! Run lifecycle and scheduling.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use fc_common::{ProvenanceContext, RunStatus, TestName};
use fc_stats::ResultSet;
use fc_store::RecordStore;

use crate::error::CoreError;
use crate::registry::{Registry, RunRecorder};

/// Execute one run of the named test.
///
/// The record lifecycle is fixed: a placeholder row goes in first with
/// provenance and the drawn seed, then the test body writes its metrics,
/// then the final status. A test failure still produces a complete
/// `status=failed` record (finalize runs on every path) before the error
/// propagates; a half-written record only appears if the process dies.
pub fn run_test(store: &RecordStore, registry: &Registry, name: &str) -> Result<(), CoreError> {
    let test = registry
        .get(name)
        .ok_or_else(|| CoreError::UnknownTest(name.to_string()))?;
    info!(name, "running test");

    let seed: u32 = rand::rng().random();
    let handle = store.begin(test.name(), Utc::now())?;
    let provenance = ProvenanceContext::from_env(env!("CARGO_PKG_VERSION"));
    store.record_provenance(handle, &provenance, seed)?;

    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    let recorder = RunRecorder::new(store, handle);
    let outcome = test.run(&recorder, &mut rng);
    match &outcome {
        Ok(()) => store.set_status(handle, RunStatus::Done)?,
        Err(err) => {
            error!(name, %err, seed, "test body failed");
            store.set_status(handle, RunStatus::Failed)?;
        }
    }
    store.finalize(handle)?;
    info!(name, seed, ok = outcome.is_ok(), "run recorded");
    outcome
}

/// Judge the named test's stored history.
pub fn analyse_test(
    store: &RecordStore,
    registry: &Registry,
    name: &str,
) -> Result<bool, CoreError> {
    let test = registry
        .get(name)
        .ok_or_else(|| CoreError::UnknownTest(name.to_string()))?;
    let results = ResultSet::new(store.query(test.name())?);
    info!(name, runs = results.len(), "analysing history");
    Ok(test.analyse(&results))
}

/// The registered test that has gone longest without a run; `None` for
/// an empty registry. Never-run tests sort first (epoch default).
pub fn find_next_test(
    store: &RecordStore,
    registry: &Registry,
) -> Result<Option<TestName>, CoreError> {
    let names = registry.names();
    let dates = store.latest_dates(&names)?;
    Ok(names
        .into_iter()
        .min_by_key(|name| dates.get(name.as_str()).copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_codec::Value;
    use crate::registry::FunctionalTest;

    struct AlwaysFails(TestName);

    impl FunctionalTest for AlwaysFails {
        fn name(&self) -> &TestName {
            &self.0
        }
        fn run(&self, recorder: &RunRecorder, _rng: &mut StdRng) -> Result<(), CoreError> {
            recorder.set("partial_metric", 0.5)?;
            Err(CoreError::TestFailed {
                name: self.0.to_string(),
                reason: "solver diverged".into(),
            })
        }
        fn analyse(&self, _results: &ResultSet) -> bool {
            false
        }
    }

    #[test]
    fn test_successful_run_records_done_with_provenance() {
        let store = RecordStore::open_in_memory().unwrap();
        let registry = Registry::builtin().unwrap();
        run_test(&store, &registry, "opt_fn_CMAES_100").unwrap();

        let name = TestName::new("opt_fn_CMAES_100").unwrap();
        let records = store.query(&name).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.status(), RunStatus::Done);
        assert!(matches!(record.field("seed"), Some(Value::Int(_))));
        assert!(record.field("commit").is_some());
        assert!(record.field("fbest_relative").is_some());
    }

    #[test]
    fn test_failed_run_still_leaves_complete_record() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut registry = Registry::new();
        let name = TestName::new("always_fails").unwrap();
        registry.add(Box::new(AlwaysFails(name.clone())));

        let outcome = run_test(&store, &registry, "always_fails");
        assert!(matches!(outcome, Err(CoreError::TestFailed { .. })));

        let records = store.query(&name).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status(), RunStatus::Failed);
        // Metrics written before the failure are preserved.
        assert_eq!(records[0].field("partial_metric"), Some(Value::Float(0.5)));
    }

    #[test]
    fn test_unknown_test_is_an_error() {
        let store = RecordStore::open_in_memory().unwrap();
        let registry = Registry::builtin().unwrap();
        assert!(matches!(
            run_test(&store, &registry, "no_such_test"),
            Err(CoreError::UnknownTest(_))
        ));
        assert!(matches!(
            analyse_test(&store, &registry, "no_such_test"),
            Err(CoreError::UnknownTest(_))
        ));
    }

    #[test]
    fn test_analyse_passes_after_steady_runs() {
        let store = RecordStore::open_in_memory().unwrap();
        let registry = Registry::builtin().unwrap();
        for _ in 0..3 {
            run_test(&store, &registry, "opt_fn_CMAES_100").unwrap();
        }
        assert!(analyse_test(&store, &registry, "opt_fn_CMAES_100").unwrap());
    }

    #[test]
    fn test_next_prefers_never_run_then_oldest() {
        let store = RecordStore::open_in_memory().unwrap();
        let registry = Registry::builtin().unwrap();

        // Run everything except one; the leftover is next in line.
        run_test(&store, &registry, "opt_fn_CMAES_100").unwrap();
        run_test(&store, &registry, "mcmc_normal_HaarioBardenet_4").unwrap();
        let next = find_next_test(&store, &registry).unwrap().unwrap();
        assert_eq!(next.as_str(), "opt_fn_XNES_100");

        // Once all have run, the earliest run date wins.
        run_test(&store, &registry, "opt_fn_XNES_100").unwrap();
        let next = find_next_test(&store, &registry).unwrap().unwrap();
        assert_eq!(next.as_str(), "opt_fn_CMAES_100");
    }

    #[test]
    fn test_next_on_empty_registry_is_none() {
        let store = RecordStore::open_in_memory().unwrap();
        let registry = Registry::new();
        assert!(find_next_test(&store, &registry).unwrap().is_none());
    }
}
