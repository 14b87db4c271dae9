//! Benchmark parameter types.
//!
//! Groups related benchmark parameters so Criterion ids render consistently.

use std::fmt;

use dbscan_core::IndexStrategy;

/// Parameters for an end-to-end clustering benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct RunBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Range query provider used by the engine.
    pub strategy: IndexStrategy,
}

impl fmt::Display for RunBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = match self.strategy {
            IndexStrategy::BallTree => "ball_tree",
            IndexStrategy::LinearScan => "linear_scan",
        };
        write!(f, "n={},index={index}", self.point_count)
    }
}

/// Parameters for a ball tree construction benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct BuildBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Maximum number of points per leaf.
    pub leaf_size: usize,
}

impl fmt::Display for BuildBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},leaf={}", self.point_count, self.leaf_size)
    }
}
