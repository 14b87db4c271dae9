//! Density-based clustering (DBSCAN) over arbitrary metric spaces.
//!
//! [`Dbscan`] groups points that are density-reachable from one another into
//! clusters and labels isolated points as noise. Neighbourhoods come from a
//! pluggable [`RangeQueryProvider`]; the default [`BallTree`] works for any
//! [`Metric`], and [`LinearScan`] serves as an exhaustive alternative.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//!
//! use dbscan_core::{Dataset, DbscanBuilder, Euclidean};
//!
//! let dataset = Dataset::from_vectors(
//!     "readings",
//!     vec![vec![1.0, 1.0], vec![1.2, 0.9], vec![0.9, 1.1], vec![8.0, 8.0]],
//! )?;
//! let mut dbscan = DbscanBuilder::new()
//!     .with_radius(0.5)
//!     .with_min_neighbours(3)
//!     .build(Arc::new(dataset), Euclidean)?;
//! let result = dbscan.run()?;
//!
//! assert_eq!(result.cluster_count(), 1);
//! assert_eq!(result.noise(), [3]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod batch;
mod builder;
mod dataset;
mod engine;
mod error;
mod index;
mod label;
mod metric;
mod result;

#[cfg(test)]
mod test_utils;

pub use crate::{
    batch::cluster_batch,
    builder::{
        DEFAULT_MIN_NEIGHBOURS, DEFAULT_RADIUS, DbscanBuilder, DbscanParams, IndexStrategy,
    },
    dataset::{Dataset, DatasetId, IndexedPoint},
    engine::Dbscan,
    error::{
        DatasetError, DatasetErrorCode, DbscanError, DbscanErrorCode, QueryError, QueryErrorCode,
        Result,
    },
    index::{BallTree, DEFAULT_LEAF_SIZE, LinearScan, Neighbour, RangeQueryProvider},
    label::PointLabel,
    metric::{Chebyshev, Euclidean, Levenshtein, Manhattan, Metric},
    result::{ClusterId, ClusteringResult, NonContiguousClusterIds},
};
