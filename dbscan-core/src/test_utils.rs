//! Shared test utilities for `dbscan-core`.

use dbscan_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    dataset::{Dataset, DatasetId},
    error::QueryError,
    index::{LinearScan, Neighbour, RangeQueryProvider},
    metric::Euclidean,
};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `DBSCAN_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Uniform vectors in `[-10, 10)^dimensions`, reproducible from `seed`.
#[must_use]
pub(crate) fn random_vectors(count: usize, dimensions: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (0..dimensions)
                .map(|_| rng.gen_range(-10.0_f32..10.0))
                .collect()
        })
        .collect()
}

/// [`RangeQueryProvider`] wrapper that counts builds and range queries.
///
/// # Examples
/// ```ignore
/// let provider = CountingProvider::default();
/// let queries = provider.queries();
/// // hand `provider` to an engine, run it, then inspect `queries`.
/// ```
pub(crate) struct CountingProvider {
    inner: LinearScan<Vec<f32>, Euclidean>,
    builds: Arc<AtomicUsize>,
    queries: Arc<AtomicUsize>,
}

impl Default for CountingProvider {
    fn default() -> Self {
        Self {
            inner: LinearScan::new(Euclidean),
            builds: Arc::new(AtomicUsize::new(0)),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl CountingProvider {
    /// Returns the shared build counter for assertions.
    #[must_use]
    pub(crate) fn builds(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.builds)
    }

    /// Returns the shared range query counter for assertions.
    #[must_use]
    pub(crate) fn queries(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.queries)
    }
}

impl RangeQueryProvider<Vec<f32>> for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn dataset_id(&self) -> Option<DatasetId> {
        self.inner.dataset_id()
    }

    fn attach(&mut self, dataset: Arc<Dataset<Vec<f32>>>) {
        self.inner.attach(dataset);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn is_built(&self) -> bool {
        self.inner.is_built()
    }

    fn build(&mut self) -> Result<(), QueryError> {
        self.builds.fetch_add(1, Ordering::Relaxed);
        self.inner.build()
    }

    fn range_query(&self, center: &Vec<f32>, radius: f32) -> Result<Vec<Neighbour>, QueryError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.inner.range_query(center, radius)
    }

    fn knn_query(&self, center: &Vec<f32>, k: usize) -> Result<Vec<Neighbour>, QueryError> {
        self.inner.knn_query(center, k)
    }
}
