//! Test registry and the built-in functional tests.
//!
//! Each test produces one record per run through a [`RunRecorder`] and
//! judges its own history in `analyse`. The built-in tests emit
//! synthetic metrics from the run's seeded generator; the harness
//! machinery (record lifecycle, aggregation, oracle) is what is actually
//! under test here, and real inference workloads plug in through the
//! same [`FunctionalTest`] trait.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;

use fc_codec::Value;
use fc_common::TestName;
use fc_stats::{has_not_deviated, ResultSet, DEFAULT_RECENT_WINDOW};
use fc_store::{RecordHandle, RecordStore};

use crate::error::CoreError;

/// Write-side view of one in-progress run record.
pub struct RunRecorder<'a> {
    store: &'a RecordStore,
    handle: RecordHandle,
}

impl<'a> RunRecorder<'a> {
    pub fn new(store: &'a RecordStore, handle: RecordHandle) -> Self {
        RunRecorder { store, handle }
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        self.store.set(self.handle, key, &value.into())?;
        Ok(())
    }
}

/// One functional test: produce metrics for a run, and judge the
/// accumulated history.
pub trait FunctionalTest {
    fn name(&self) -> &TestName;

    /// Execute the test body, writing metrics through `recorder`. The
    /// generator is seeded by the runner so a failing run can be
    /// replayed from its recorded seed.
    fn run(&self, recorder: &RunRecorder, rng: &mut StdRng) -> Result<(), CoreError>;

    /// Pass/fail verdict over this test's stored history.
    fn analyse(&self, results: &ResultSet) -> bool;
}

/// Name-keyed collection of available tests.
pub struct Registry {
    tests: BTreeMap<String, Box<dyn FunctionalTest>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            tests: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, test: Box<dyn FunctionalTest>) {
        self.tests.insert(test.name().as_str().to_string(), test);
    }

    pub fn get(&self, name: &str) -> Option<&dyn FunctionalTest> {
        self.tests.get(name).map(|t| t.as_ref())
    }

    /// Sorted test names.
    pub fn names(&self) -> Vec<TestName> {
        self.tests.values().map(|t| t.name().clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// The registry of built-in tests.
    pub fn builtin() -> Result<Self, CoreError> {
        let mut registry = Registry::new();
        registry.add(Box::new(OptimisationToy::new("CMAES", 100)?));
        registry.add(Box::new(OptimisationToy::new("XNES", 100)?));
        registry.add(Box::new(SamplingNormalToy::new("HaarioBardenet", 4)?));
        Ok(registry)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

/// Toy optimisation run: the best score relative to the score at the
/// true parameters should stay near 1.
pub struct OptimisationToy {
    name: TestName,
    method: String,
    max_iterations: u32,
}

impl OptimisationToy {
    pub fn new(method: &str, max_iterations: u32) -> Result<Self, CoreError> {
        let name = TestName::new(format!("opt_fn_{method}_{max_iterations}"))?;
        Ok(OptimisationToy {
            name,
            method: method.to_string(),
            max_iterations,
        })
    }
}

impl FunctionalTest for OptimisationToy {
    fn name(&self) -> &TestName {
        &self.name
    }

    fn run(&self, recorder: &RunRecorder, rng: &mut StdRng) -> Result<(), CoreError> {
        recorder.set("method", self.method.as_str())?;
        recorder.set("max_iterations", i64::from(self.max_iterations))?;

        // Synthetic optimiser: lands near the true optimum with a small
        // seed-dependent wobble.
        let xbest: Vec<f64> = (0..3).map(|_| rng.random_range(0.0..10.0)).collect();
        let fbest_relative = 1.0 + 0.05 * (rng.random::<f64>() - 0.5);
        recorder.set("xbest", xbest)?;
        recorder.set("fbest_relative", fbest_relative)?;
        Ok(())
    }

    fn analyse(&self, results: &ResultSet) -> bool {
        has_not_deviated(1.0, 1.0, results, "fbest_relative", DEFAULT_RECENT_WINDOW)
    }
}

/// Toy MCMC run on a normal target: KL divergence to the true
/// distribution should decay towards zero with chain length.
pub struct SamplingNormalToy {
    name: TestName,
    method: String,
    chains: u32,
}

impl SamplingNormalToy {
    pub fn new(method: &str, chains: u32) -> Result<Self, CoreError> {
        let name = TestName::new(format!("mcmc_normal_{method}_{chains}"))?;
        Ok(SamplingNormalToy {
            name,
            method: method.to_string(),
            chains,
        })
    }
}

impl FunctionalTest for SamplingNormalToy {
    fn name(&self) -> &TestName {
        &self.name
    }

    fn run(&self, recorder: &RunRecorder, rng: &mut StdRng) -> Result<(), CoreError> {
        recorder.set("method", self.method.as_str())?;
        recorder.set("chains", i64::from(self.chains))?;

        // KLD trace sampled every 100 iterations, decaying as 1/n.
        let step = 100i64;
        let iters: Vec<i64> = (1..=40).map(|i| i * step).collect();
        let klds: Vec<f64> = iters
            .iter()
            .map(|i| 100.0 / *i as f64 + 0.01 * rng.random::<f64>())
            .collect();
        let kld = klds[klds.len() - 1];
        recorder.set("iters", iters)?;
        recorder.set("klds", klds)?;
        recorder.set("kld", kld)?;
        Ok(())
    }

    fn analyse(&self, results: &ResultSet) -> bool {
        has_not_deviated(0.0, 0.1, results, "kld", DEFAULT_RECENT_WINDOW)
    }
}
