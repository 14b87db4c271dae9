//! Synthetic benchmark datasets.
//!
//! Seeded generators for Gaussian blobs of dense vectors and for corpora of
//! mutated words. Both produce [`dbscan_core::Dataset`] values directly.

mod blobs;
mod errors;
mod text;

pub use blobs::{GaussianBlobConfig, gaussian_blobs};
pub use errors::SyntheticError;
pub use text::{SyntheticTextConfig, synthetic_text};

#[cfg(test)]
mod tests;
