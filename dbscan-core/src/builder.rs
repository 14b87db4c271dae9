//! Builder utilities for configuring DBSCAN runs.
//!
//! Exposes the validated run parameters, the index strategy selection surface
//! and the builder used to construct [`Dbscan`] instances.

use std::{fmt, num::NonZeroUsize, sync::Arc};

use crate::{
    Result,
    dataset::Dataset,
    engine::Dbscan,
    error::DbscanError,
    index::{BallTree, LinearScan, RangeQueryProvider},
    metric::Metric,
};

/// Default neighbourhood radius used by [`DbscanBuilder`].
pub const DEFAULT_RADIUS: f32 = 0.5;
/// Default minimum neighbour count used by [`DbscanBuilder`].
pub const DEFAULT_MIN_NEIGHBOURS: usize = 5;

/// Validated parameters of a clustering run.
///
/// `min_neighbours` counts the query point itself, so `1` turns every point
/// into a core point and `0` behaves the same way.
///
/// # Examples
/// ```
/// use dbscan_core::DbscanParams;
///
/// let params = DbscanParams::new(1.5, 4).expect("parameters are valid");
/// assert_eq!(params.radius(), 1.5);
/// assert_eq!(params.min_neighbours(), 4);
/// assert!(DbscanParams::new(0.0, 4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanParams {
    radius: f32,
    min_neighbours: usize,
}

impl DbscanParams {
    /// Validates and stores run parameters.
    ///
    /// # Errors
    /// Returns [`DbscanError::InvalidRadius`] when `radius` is not positive
    /// and finite.
    pub fn new(radius: f32, min_neighbours: usize) -> Result<Self> {
        Ok(Self {
            radius: validate_radius(radius)?,
            min_neighbours,
        })
    }

    /// Returns the neighbourhood radius.
    #[rustfmt::skip]
    #[must_use]
    pub const fn radius(&self) -> f32 { self.radius }

    /// Returns the minimum neighbour count, including the point itself.
    #[rustfmt::skip]
    #[must_use]
    pub const fn min_neighbours(&self) -> usize { self.min_neighbours }

    pub(crate) fn set_radius(&mut self, radius: f32) -> Result<()> {
        self.radius = validate_radius(radius)?;
        Ok(())
    }

    pub(crate) fn set_min_neighbours(&mut self, min_neighbours: usize) {
        self.min_neighbours = min_neighbours;
    }
}

fn validate_radius(radius: f32) -> Result<f32> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(DbscanError::InvalidRadius { got: radius })
    }
}

/// Selects the range query provider [`Dbscan`] creates when none is
/// registered.
///
/// # Examples
/// ```
/// use dbscan_core::IndexStrategy;
///
/// assert_eq!(IndexStrategy::default(), IndexStrategy::BallTree);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexStrategy {
    /// Metric ball tree; sub-linear queries on well-spread data.
    #[default]
    BallTree,
    /// Exhaustive scan; quadratic runs, no build cost.
    LinearScan,
}

impl IndexStrategy {
    pub(crate) fn provider<T, M>(
        self,
        metric: M,
        leaf_size: NonZeroUsize,
    ) -> Box<dyn RangeQueryProvider<T>>
    where
        T: Send + Sync + 'static,
        M: Metric<T> + 'static,
    {
        match self {
            Self::BallTree => Box::new(BallTree::new(metric).with_leaf_size(leaf_size)),
            Self::LinearScan => Box::new(LinearScan::new(metric)),
        }
    }
}

/// Configures and constructs [`Dbscan`] instances.
///
/// # Examples
/// ```
/// use dbscan_core::{Dataset, DbscanBuilder, Euclidean, IndexStrategy};
///
/// let dataset = Dataset::shared("points", vec![vec![0.0_f32], vec![0.4], vec![5.0]]);
/// let mut dbscan = DbscanBuilder::new()
///     .with_radius(0.5)
///     .with_min_neighbours(2)
///     .with_index_strategy(IndexStrategy::LinearScan)
///     .build(dataset, Euclidean)
///     .expect("builder configuration is valid");
/// dbscan.run()?;
/// assert_eq!(dbscan.cluster_count(), 1);
/// assert!(dbscan.is_noise(2));
/// # Ok::<(), dbscan_core::DbscanError>(())
/// ```
pub struct DbscanBuilder<T> {
    radius: f32,
    min_neighbours: usize,
    strategy: IndexStrategy,
    leaf_size: usize,
    provider: Option<Box<dyn RangeQueryProvider<T>>>,
}

impl<T> Default for DbscanBuilder<T> {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            min_neighbours: DEFAULT_MIN_NEIGHBOURS,
            strategy: IndexStrategy::default(),
            leaf_size: crate::index::DEFAULT_LEAF_SIZE.get(),
            provider: None,
        }
    }
}

impl<T> fmt::Debug for DbscanBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbscanBuilder")
            .field("radius", &self.radius)
            .field("min_neighbours", &self.min_neighbours)
            .field("strategy", &self.strategy)
            .field("leaf_size", &self.leaf_size)
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_owned()))
            .finish()
    }
}

impl<T> DbscanBuilder<T> {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use dbscan_core::{DbscanBuilder, IndexStrategy};
    ///
    /// let builder = DbscanBuilder::<Vec<f32>>::new();
    /// assert_eq!(builder.radius(), 0.5);
    /// assert_eq!(builder.min_neighbours(), 5);
    /// assert_eq!(builder.index_strategy(), IndexStrategy::BallTree);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the neighbourhood radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Returns the configured radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Overrides the minimum neighbour count.
    #[must_use]
    pub fn with_min_neighbours(mut self, min_neighbours: usize) -> Self {
        self.min_neighbours = min_neighbours;
        self
    }

    /// Returns the configured minimum neighbour count.
    #[must_use]
    pub fn min_neighbours(&self) -> usize {
        self.min_neighbours
    }

    /// Selects the provider created when none is registered.
    #[must_use]
    pub fn with_index_strategy(mut self, strategy: IndexStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the configured index strategy.
    #[must_use]
    pub fn index_strategy(&self) -> IndexStrategy {
        self.strategy
    }

    /// Overrides the ball tree leaf capacity.
    ///
    /// # Examples
    /// ```
    /// use dbscan_core::{Dataset, DbscanBuilder, DbscanError, Euclidean};
    ///
    /// let dataset = Dataset::shared("empty", Vec::<Vec<f32>>::new());
    /// let err = DbscanBuilder::new()
    ///     .with_leaf_size(0)
    ///     .build(dataset, Euclidean)
    ///     .expect_err("zero leaf size must be rejected");
    /// assert_eq!(err, DbscanError::InvalidLeafSize { got: 0 });
    /// ```
    #[must_use]
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Returns the configured ball tree leaf capacity.
    #[must_use]
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Registers a custom provider, overriding the index strategy.
    #[must_use]
    pub fn with_provider(mut self, provider: Box<dyn RangeQueryProvider<T>>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Validates the configuration and constructs a [`Dbscan`] instance.
    ///
    /// # Errors
    /// Returns [`DbscanError::InvalidRadius`] for a radius that is not
    /// positive and finite and [`DbscanError::InvalidLeafSize`] for a zero
    /// leaf size.
    pub fn build<M>(self, dataset: Arc<Dataset<T>>, metric: M) -> Result<Dbscan<T, M>>
    where
        T: Send + Sync + 'static,
        M: Metric<T> + Clone + 'static,
    {
        let params = DbscanParams::new(self.radius, self.min_neighbours)?;
        let leaf_size = NonZeroUsize::new(self.leaf_size).ok_or(DbscanError::InvalidLeafSize {
            got: self.leaf_size,
        })?;
        let mut dbscan = Dbscan::new(dataset, metric, params, self.strategy, leaf_size);
        if let Some(provider) = self.provider {
            dbscan.register_provider(provider);
        }
        Ok(dbscan)
    }
}
