//! Query result types and neighbour ordering semantics.

use std::cmp::Ordering;

/// Indexed point returned by a query, with its distance from the query centre.
///
/// Neighbours order by ascending distance, then ascending id, which makes
/// k-nearest results deterministic when distances tie.
///
/// # Examples
/// ```
/// use dbscan_core::Neighbour;
///
/// let near = Neighbour { id: 3, distance: 0.25 };
/// let far = Neighbour { id: 1, distance: 0.5 };
/// assert!(near < far);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    /// Identity of the neighbour within the attached dataset.
    pub id: usize,
    /// Distance between the query centre and [`Neighbour::id`].
    pub distance: f32,
}

impl Eq for Neighbour {}

impl Ord for Neighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tree node awaiting expansion during best-first search, ordered so that a
/// [`std::collections::BinaryHeap`] pops the smallest lower bound first.
#[derive(Clone, Copy, Debug)]
pub(super) struct NodeCandidate {
    pub(super) node: usize,
    pub(super) lower_bound: f32,
}

impl PartialEq for NodeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeCandidate {}

impl Ord for NodeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .lower_bound
            .total_cmp(&self.lower_bound)
            .then(other.node.cmp(&self.node))
    }
}

impl PartialOrd for NodeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
