//! Distance metrics shared by the engine and its range query providers.
//!
//! A [`Metric`] is a pure function: it must be symmetric, non-negative and
//! return zero for identical points. Tree-based providers additionally rely on
//! the triangle inequality to prune their search, so every built-in metric is
//! a true metric.

mod text;
mod vector;

pub use self::text::Levenshtein;
pub use self::vector::{Chebyshev, Euclidean, Manhattan};

/// Distance function over points of type `T`.
///
/// Closures of the form `Fn(&T, &T) -> f32` implement this trait, which makes
/// ad-hoc metric spaces cheap to express.
///
/// # Examples
/// ```
/// use dbscan_core::{Euclidean, Metric};
///
/// let metric = Euclidean;
/// let d = metric.distance(&vec![0.0_f32, 0.0], &vec![3.0, 4.0]);
/// assert!((d - 5.0).abs() < 1e-6);
///
/// let absolute = |a: &i32, b: &i32| a.abs_diff(*b) as f32;
/// assert_eq!(absolute.distance(&-2, &3), 5.0);
/// ```
pub trait Metric<T: ?Sized>: Send + Sync {
    /// Computes the distance between `left` and `right`.
    fn distance(&self, left: &T, right: &T) -> f32;

    /// Returns a short human-readable metric name used in diagnostics.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<T: ?Sized, F> Metric<T> for F
where
    F: Fn(&T, &T) -> f32 + Send + Sync,
{
    fn distance(&self, left: &T, right: &T) -> f32 {
        self(left, right)
    }
}
