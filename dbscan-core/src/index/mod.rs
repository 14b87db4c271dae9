//! Range query providers consumed by the clustering engine.
//!
//! The engine depends only on the [`RangeQueryProvider`] capability: a
//! build/rebuild lifecycle plus sphere and k-nearest-neighbour queries. Two
//! interchangeable strategies ship with the crate: [`BallTree`], the default
//! metric tree, and [`LinearScan`], an exhaustive oracle.

mod ball_tree;
mod linear;
mod types;

use std::sync::Arc;

use crate::{
    dataset::{Dataset, DatasetId},
    error::QueryError,
};

pub use self::{
    ball_tree::{BallTree, DEFAULT_LEAF_SIZE},
    linear::LinearScan,
    types::Neighbour,
};

/// Spatial index answering range queries over an attached [`Dataset`].
///
/// Range queries use strict inequality: a point exactly `radius` away from
/// the centre is **not** part of the neighbourhood. Providers must evaluate
/// membership with the same metric the engine was configured with, and
/// queries never mutate the index.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use dbscan_core::{Dataset, Euclidean, LinearScan, RangeQueryProvider};
///
/// let dataset = Dataset::shared("line", vec![vec![0.0_f32], vec![1.0], vec![2.0]]);
/// let mut index = LinearScan::new(Euclidean);
/// index.attach(Arc::clone(&dataset));
/// index.build()?;
///
/// let ids: Vec<usize> = index
///     .range_query(&vec![0.0], 1.0)?
///     .into_iter()
///     .map(|neighbour| neighbour.id)
///     .collect();
/// assert_eq!(ids, [0]);
/// # Ok::<(), dbscan_core::QueryError>(())
/// ```
pub trait RangeQueryProvider<T>: Send {
    /// Returns a short name used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the identity of the attached dataset, if any.
    fn dataset_id(&self) -> Option<DatasetId>;

    /// Attaches `dataset`, discarding any index built over a previous one.
    fn attach(&mut self, dataset: Arc<Dataset<T>>);

    /// Discards the index while keeping the attached dataset.
    fn clear(&mut self);

    /// Returns whether the index can answer queries.
    fn is_built(&self) -> bool;

    /// Builds the index over the attached dataset, replacing any previous
    /// index.
    ///
    /// # Errors
    /// Returns [`QueryError::NoDataset`] when no dataset is attached.
    fn build(&mut self) -> Result<(), QueryError>;

    /// Returns every indexed point strictly closer than `radius` to `center`,
    /// in ascending id order.
    ///
    /// # Errors
    /// Returns [`QueryError::InvalidRadius`] when `radius` is not positive and
    /// finite, and [`QueryError::NotBuilt`] before [`Self::build`].
    fn range_query(&self, center: &T, radius: f32) -> Result<Vec<Neighbour>, QueryError>;

    /// Returns the `k` indexed points nearest to `center`, ordered by
    /// ascending distance with ties broken by the lower id.
    ///
    /// # Errors
    /// Returns [`QueryError::NotBuilt`] before [`Self::build`].
    fn knn_query(&self, center: &T, k: usize) -> Result<Vec<Neighbour>, QueryError>;
}

/// Rejects radii that are not strictly positive and finite.
pub(crate) fn validate_radius(radius: f32) -> Result<(), QueryError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(QueryError::InvalidRadius { got: radius })
    }
}
