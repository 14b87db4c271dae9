//! Clustering many independent datasets at once.
//!
//! Engines share no state, so a batch runs them data-parallel when the
//! `parallel` feature is enabled and sequentially otherwise.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{Result, engine::Dbscan, metric::Metric, result::ClusteringResult};

/// Runs every engine in `engines`, returning one outcome per engine in input
/// order.
///
/// A failing engine does not stop the others.
///
/// # Examples
/// ```
/// use dbscan_core::{Dataset, DbscanBuilder, Euclidean, cluster_batch};
///
/// let mut engines = [vec![0.0_f32, 0.2, 5.0], vec![1.0, 9.0]]
///     .into_iter()
///     .map(|xs| {
///         let points = xs.into_iter().map(|x| vec![x]).collect();
///         DbscanBuilder::new()
///             .with_radius(0.5)
///             .with_min_neighbours(2)
///             .build(Dataset::shared("batch", points), Euclidean)
///     })
///     .collect::<Result<Vec<_>, _>>()?;
///
/// let counts: Vec<usize> = cluster_batch(&mut engines)
///     .into_iter()
///     .map(|outcome| outcome.map(|result| result.cluster_count()))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(counts, [1, 0]);
/// # Ok::<(), dbscan_core::DbscanError>(())
/// ```
#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub fn cluster_batch<T, M>(engines: &mut [Dbscan<T, M>]) -> Vec<Result<ClusteringResult>>
where
    T: Send + Sync + 'static,
    M: Metric<T> + Clone + 'static,
{
    engines.par_iter_mut().map(Dbscan::run).collect()
}

/// Runs every engine in `engines`, returning one outcome per engine in input
/// order.
#[cfg(not(feature = "parallel"))]
pub fn cluster_batch<T, M>(engines: &mut [Dbscan<T, M>]) -> Vec<Result<ClusteringResult>>
where
    T: Send + Sync + 'static,
    M: Metric<T> + Clone + 'static,
{
    engines.iter_mut().map(Dbscan::run).collect()
}
