//! Metrics over dense `f32` vectors.
//!
//! Inputs are expected to share a dimension and hold finite values; use
//! [`crate::Dataset::from_vectors`] to validate rows up front. Components are
//! accumulated in `f64` so repeated distance evaluations of the same pair
//! are bit-identical regardless of which provider performs them.

use super::Metric;

/// Straight-line (L2) distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Euclidean;

/// Taxicab (L1) distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Manhattan;

/// Maximum-coordinate (L∞) distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chebyshev;

fn components<'a>(left: &'a [f32], right: &'a [f32]) -> impl Iterator<Item = f64> + 'a {
    debug_assert_eq!(left.len(), right.len(), "vectors must share a dimension");
    left.iter()
        .zip(right)
        .map(|(&l, &r)| (f64::from(l) - f64::from(r)).abs())
}

impl<V: AsRef<[f32]> + ?Sized> Metric<V> for Euclidean {
    fn distance(&self, left: &V, right: &V) -> f32 {
        let sum: f64 = components(left.as_ref(), right.as_ref())
            .map(|diff| diff * diff)
            .sum();
        sum.sqrt() as f32
    }

    fn name(&self) -> &str {
        "euclidean"
    }
}

impl<V: AsRef<[f32]> + ?Sized> Metric<V> for Manhattan {
    fn distance(&self, left: &V, right: &V) -> f32 {
        components(left.as_ref(), right.as_ref()).sum::<f64>() as f32
    }

    fn name(&self) -> &str {
        "manhattan"
    }
}

impl<V: AsRef<[f32]> + ?Sized> Metric<V> for Chebyshev {
    fn distance(&self, left: &V, right: &V) -> f32 {
        components(left.as_ref(), right.as_ref()).fold(0.0_f64, f64::max) as f32
    }

    fn name(&self) -> &str {
        "chebyshev"
    }
}
