//! Density-based clustering engine.
//!
//! [`Dbscan`] owns the per-point label arena and grows clusters by frontier
//! expansion over range queries answered by a pluggable
//! [`RangeQueryProvider`]. The frontier is an explicit stack, so deep
//! density chains never recurse.

use std::{fmt, num::NonZeroUsize, sync::Arc};

use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    builder::{DbscanParams, IndexStrategy},
    dataset::Dataset,
    index::{Neighbour, RangeQueryProvider},
    label::{LabelStore, PointLabel},
    metric::Metric,
    result::{ClusterId, ClusteringResult},
};

/// Clustering engine bound to one dataset and metric.
///
/// Labels and the cluster count reflect the most recent [`Dbscan::run`]; every
/// run starts from scratch, so the engine can be re-run after changing the
/// parameters or the provider.
///
/// # Examples
/// ```
/// use dbscan_core::{Dataset, DbscanBuilder, Euclidean};
///
/// let dataset = Dataset::shared(
///     "pairs",
///     vec![vec![0.0_f32, 0.0], vec![0.1, 0.0], vec![9.0, 9.0], vec![9.1, 9.0], vec![50.0, 0.0]],
/// );
/// let mut dbscan = DbscanBuilder::new()
///     .with_radius(0.5)
///     .with_min_neighbours(2)
///     .build(dataset, Euclidean)?;
/// let result = dbscan.run()?;
///
/// assert_eq!(result.cluster_count(), 2);
/// assert_eq!(dbscan.cluster_id_of(3).map(|id| id.get()), Some(1));
/// assert!(dbscan.is_noise(4));
/// assert_eq!(dbscan.cluster_id_of(4), None);
/// # Ok::<(), dbscan_core::DbscanError>(())
/// ```
pub struct Dbscan<T, M> {
    dataset: Arc<Dataset<T>>,
    metric: M,
    params: DbscanParams,
    strategy: IndexStrategy,
    leaf_size: NonZeroUsize,
    provider: Option<Box<dyn RangeQueryProvider<T>>>,
    labels: LabelStore,
    cluster_count: usize,
}

impl<T, M> Dbscan<T, M> {
    pub(crate) fn new(
        dataset: Arc<Dataset<T>>,
        metric: M,
        params: DbscanParams,
        strategy: IndexStrategy,
        leaf_size: NonZeroUsize,
    ) -> Self {
        let mut labels = LabelStore::default();
        labels.reset(dataset.len());
        Self {
            dataset,
            metric,
            params,
            strategy,
            leaf_size,
            provider: None,
            labels,
            cluster_count: 0,
        }
    }

    /// Returns the dataset being clustered.
    #[must_use]
    pub fn dataset(&self) -> &Arc<Dataset<T>> {
        &self.dataset
    }

    /// Returns the metric the engine was built with.
    #[must_use]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Returns the parameters used by the next run.
    #[must_use]
    pub fn params(&self) -> DbscanParams {
        self.params
    }

    /// Returns the strategy used when no provider is registered.
    #[must_use]
    pub fn index_strategy(&self) -> IndexStrategy {
        self.strategy
    }

    /// Returns the name of the current provider, if one exists yet.
    ///
    /// The default provider is created lazily by the first run.
    #[must_use]
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|provider| provider.name())
    }

    /// Changes the neighbourhood radius for subsequent runs.
    ///
    /// # Errors
    /// Returns [`crate::DbscanError::InvalidRadius`] and keeps the previous
    /// radius when `radius` is not positive and finite.
    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        self.params.set_radius(radius)
    }

    /// Changes the minimum neighbour count for subsequent runs.
    pub fn set_min_neighbours(&mut self, min_neighbours: usize) {
        self.params.set_min_neighbours(min_neighbours);
    }

    /// Replaces the range query provider used by subsequent runs.
    ///
    /// The provider may be unattached, unbuilt or built over another dataset;
    /// the next run attaches and builds it as needed.
    pub fn register_provider(&mut self, provider: Box<dyn RangeQueryProvider<T>>) {
        self.provider = Some(provider);
    }

    /// Number of clusters found by the most recent run.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Returns the label of point `id`, or `None` when `id` is out of range.
    #[must_use]
    pub fn label_of(&self, id: usize) -> Option<PointLabel> {
        self.labels.get(id)
    }

    /// Returns the cluster of point `id`.
    ///
    /// Noise, unvisited and out-of-range points all yield `None`; use
    /// [`Self::is_noise`] or [`Self::label_of`] to tell them apart.
    #[must_use]
    pub fn cluster_id_of(&self, id: usize) -> Option<ClusterId> {
        self.labels.get(id).and_then(PointLabel::cluster)
    }

    /// Returns whether point `id` was labelled noise.
    #[must_use]
    pub fn is_noise(&self, id: usize) -> bool {
        self.labels.get(id).is_some_and(PointLabel::is_noise)
    }

    /// Returns whether point `id` belongs to a cluster.
    ///
    /// Noise and unvisited points both report `false`.
    #[must_use]
    pub fn is_assigned(&self, id: usize) -> bool {
        self.labels.get(id).is_some_and(PointLabel::is_assigned)
    }

    /// Returns every label in identity order.
    #[must_use]
    pub fn labels(&self) -> &[PointLabel] {
        self.labels.as_slice()
    }

    /// Snapshots the labels and cluster count of the most recent run.
    #[must_use]
    pub fn result(&self) -> ClusteringResult {
        ClusteringResult::from_parts(self.labels.as_slice().to_vec(), self.cluster_count)
    }

    fn reset(&mut self) {
        self.labels.reset(self.dataset.len());
        self.cluster_count = 0;
    }
}

impl<T, M> Dbscan<T, M>
where
    T: Send + Sync + 'static,
    M: Metric<T> + Clone + 'static,
{
    /// Clusters the dataset with the current parameters and provider.
    ///
    /// Creates the default provider on first use, reattaches a provider built
    /// over a different dataset, and builds the index when it is not built.
    ///
    /// # Errors
    /// Returns [`crate::DbscanError::Query`] when the provider fails. Labels
    /// are then left partially assigned.
    #[instrument(
        name = "dbscan.run",
        err,
        skip(self),
        fields(
            data_source = %self.dataset.name(),
            points = self.dataset.len(),
            radius = self.params.radius(),
            min_neighbours = self.params.min_neighbours(),
        ),
    )]
    pub fn run(&mut self) -> Result<ClusteringResult> {
        self.reset();
        record_run();

        let mut provider = match self.provider.take() {
            Some(provider) => provider,
            None => self.strategy.provider(self.metric.clone(), self.leaf_size),
        };
        let outcome = self
            .prepare_provider(provider.as_mut())
            .and_then(|()| self.scan(provider.as_ref()));
        self.provider = Some(provider);
        outcome?;

        let result = self.result();
        info!(
            clusters = result.cluster_count(),
            noise = result.noise_count(),
            "clustering completed"
        );
        Ok(result)
    }

    #[instrument(
        name = "dbscan.prepare_provider",
        err,
        skip(self, provider),
        fields(provider = %provider.name()),
    )]
    fn prepare_provider(&self, provider: &mut dyn RangeQueryProvider<T>) -> Result<()> {
        let expected = self.dataset.id();
        match provider.dataset_id() {
            Some(attached) if attached == expected => {}
            Some(attached) => {
                warn!(
                    provider = provider.name(),
                    attached = attached.get(),
                    expected = expected.get(),
                    "provider was built for a different dataset; rebuilding"
                );
                provider.clear();
                provider.attach(Arc::clone(&self.dataset));
            }
            None => provider.attach(Arc::clone(&self.dataset)),
        }
        if !provider.is_built() {
            provider.build()?;
        }
        Ok(())
    }

    fn scan(&mut self, provider: &dyn RangeQueryProvider<T>) -> Result<()> {
        let dataset = Arc::clone(&self.dataset);
        let min_neighbours = self.params.min_neighbours();
        let mut frontier = Vec::new();

        for point in dataset.iter() {
            if self.labels.get(point.id) != Some(PointLabel::Unassigned) {
                continue;
            }
            let seed = self.neighbours(provider, point.value)?;
            if seed.len() < min_neighbours {
                self.labels.mark_noise(point.id);
                continue;
            }

            let cluster = ClusterId::new(self.cluster_count as u64);
            self.cluster_count += 1;
            let mut members = 0_usize;
            frontier.clear();
            for neighbour in &seed {
                if claimed(self.labels.claim(neighbour.id, cluster)) {
                    members += 1;
                }
                if neighbour.id != point.id {
                    frontier.push(neighbour.id);
                }
            }

            while let Some(current) = frontier.pop() {
                let Some(value) = dataset.get(current) else {
                    continue;
                };
                let reachable = self.neighbours(provider, value)?;
                if reachable.len() < min_neighbours {
                    continue;
                }
                for neighbour in reachable {
                    let previous = self.labels.claim(neighbour.id, cluster);
                    if claimed(previous) {
                        members += 1;
                    }
                    // Reclaimed noise is a border point; only fresh points
                    // can extend the frontier.
                    if previous == Some(PointLabel::Unassigned) {
                        frontier.push(neighbour.id);
                    }
                }
            }
            debug!(cluster = cluster.get(), members, "cluster discovered");
        }
        Ok(())
    }

    fn neighbours(&self, provider: &dyn RangeQueryProvider<T>, center: &T) -> Result<Vec<Neighbour>> {
        record_range_query();
        Ok(provider.range_query(center, self.params.radius())?)
    }
}

fn claimed(previous: Option<PointLabel>) -> bool {
    matches!(previous, Some(PointLabel::Unassigned | PointLabel::Noise))
}

#[cfg(feature = "metrics")]
fn record_run() {
    metrics::counter!("dbscan_runs_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_run() {}

#[cfg(feature = "metrics")]
fn record_range_query() {
    metrics::counter!("dbscan_range_queries_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_range_query() {}

impl<T, M: fmt::Debug> fmt::Debug for Dbscan<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dbscan")
            .field("dataset", &self.dataset.name())
            .field("points", &self.dataset.len())
            .field("metric", &self.metric)
            .field("params", &self.params)
            .field("strategy", &self.strategy)
            .field("leaf_size", &self.leaf_size)
            .field("provider", &self.provider_name())
            .field("cluster_count", &self.cluster_count)
            .finish_non_exhaustive()
    }
}
