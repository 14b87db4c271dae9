//! Benchmark support crate for the DBSCAN engine.
//!
//! Provides seeded synthetic datasets and parameter types used by the
//! Criterion benchmarks that compare the ball tree against a linear scan.

pub mod error;
pub mod params;
pub mod source;
