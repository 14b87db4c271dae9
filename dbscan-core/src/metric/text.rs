//! Edit-distance metric for string datasets.

use super::Metric;

/// Levenshtein edit distance between two strings, counted in characters.
///
/// # Examples
/// ```
/// use dbscan_core::{Levenshtein, Metric};
///
/// assert_eq!(Levenshtein.distance("kitten", "sitting"), 3.0);
/// assert_eq!(Levenshtein.distance(&String::from("abc"), &String::from("abc")), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl<S: AsRef<str> + ?Sized> Metric<S> for Levenshtein {
    fn distance(&self, left: &S, right: &S) -> f32 {
        strsim::levenshtein(left.as_ref(), right.as_ref()) as f32
    }

    fn name(&self) -> &str {
        "levenshtein"
    }
}
