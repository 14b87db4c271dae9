//! Benchmark setup error type.
//!
//! Aggregates the failures that may arise while preparing benchmark data so
//! setup functions can propagate them with `?` instead of `.expect()`.

use dbscan_core::{DbscanError, QueryError};

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic source generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Engine configuration or a clustering run failed.
    #[error("clustering failed: {0}")]
    Dbscan(#[from] DbscanError),
    /// Building or querying a range query provider failed.
    #[error("range query failed: {0}")]
    Query(#[from] QueryError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
