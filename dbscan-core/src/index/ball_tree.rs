//! Metric ball tree used as the engine's default range query provider.
//!
//! Nodes live in a flat arena. Each node covers a contiguous slice of the
//! permuted id array and stores a pivot drawn from the dataset together with
//! the largest distance from that pivot to any covered point. Because pivots
//! are data points rather than centroids the tree works for any [`Metric`],
//! not only vector spaces.
//!
//! Pruning relies on the triangle inequality, but final membership is always
//! decided by a direct `distance < radius` comparison so results match
//! [`super::LinearScan`] exactly, including at the boundary.

use std::{collections::BinaryHeap, fmt, num::NonZeroUsize, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    dataset::{Dataset, DatasetId},
    error::QueryError,
    metric::Metric,
};

use super::{Neighbour, RangeQueryProvider, types::NodeCandidate, validate_radius};

/// Leaf capacity used when none is configured.
pub const DEFAULT_LEAF_SIZE: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(size) => size,
    None => panic!("default leaf size must be non-zero"),
};

/// Relative slack applied to triangle-inequality bounds so that rounding in
/// the metric can never prune a node holding a qualifying point.
const BOUND_TOLERANCE: f32 = 1.0e-5;

#[derive(Clone, Copy, Debug)]
struct Node {
    pivot: usize,
    radius: f32,
    start: usize,
    end: usize,
    children: Option<(usize, usize)>,
}

/// Ball tree over an attached [`Dataset`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use dbscan_core::{BallTree, Dataset, Euclidean, RangeQueryProvider};
///
/// let dataset = Dataset::shared(
///     "grid",
///     (0..10).map(|x| vec![x as f32, 0.0]).collect::<Vec<_>>(),
/// );
/// let mut tree = BallTree::new(Euclidean);
/// tree.attach(Arc::clone(&dataset));
/// tree.build()?;
///
/// let ids: Vec<usize> = tree
///     .range_query(&vec![4.0, 0.0], 2.0)?
///     .iter()
///     .map(|neighbour| neighbour.id)
///     .collect();
/// assert_eq!(ids, [3, 4, 5]);
///
/// let nearest = tree.knn_query(&vec![8.6, 0.0], 2)?;
/// assert_eq!(nearest.iter().map(|n| n.id).collect::<Vec<_>>(), [9, 8]);
/// # Ok::<(), dbscan_core::QueryError>(())
/// ```
pub struct BallTree<T, M> {
    metric: M,
    leaf_size: NonZeroUsize,
    dataset: Option<Arc<Dataset<T>>>,
    order: Vec<usize>,
    nodes: Vec<Node>,
    built: bool,
}

impl<T, M> BallTree<T, M> {
    /// Creates an unattached tree with [`DEFAULT_LEAF_SIZE`].
    #[must_use]
    pub const fn new(metric: M) -> Self {
        Self {
            metric,
            leaf_size: DEFAULT_LEAF_SIZE,
            dataset: None,
            order: Vec::new(),
            nodes: Vec::new(),
            built: false,
        }
    }

    /// Overrides the maximum number of points stored in a leaf.
    ///
    /// Takes effect on the next [`RangeQueryProvider::build`].
    #[must_use]
    pub const fn with_leaf_size(mut self, leaf_size: NonZeroUsize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Returns the configured leaf capacity.
    #[must_use]
    pub const fn leaf_size(&self) -> NonZeroUsize {
        self.leaf_size
    }

    /// Returns the number of nodes in the built tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn attached_id(&self) -> Option<DatasetId> {
        self.dataset.as_ref().map(|dataset| dataset.id())
    }

    fn points(&self) -> Result<&[T], QueryError> {
        match (&self.dataset, self.built) {
            (Some(dataset), true) => Ok(dataset.as_slice()),
            _ => Err(QueryError::NotBuilt),
        }
    }

    fn covered(&self, node: &Node) -> &[usize] {
        self.order.get(node.start..node.end).unwrap_or_default()
    }
}

impl<T, M: fmt::Debug> fmt::Debug for BallTree<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BallTree")
            .field("metric", &self.metric)
            .field("leaf_size", &self.leaf_size)
            .field("dataset", &self.attached_id())
            .field("nodes", &self.nodes.len())
            .field("built", &self.built)
            .finish()
    }
}

/// Lower bound on the distance from a query to any point inside a ball.
fn lower_bound(to_pivot: f32, ball_radius: f32) -> f32 {
    (to_pivot - ball_radius).max(0.0)
}

/// Whether a ball can be skipped when only distances up to `limit` matter.
fn beyond(to_pivot: f32, ball_radius: f32, limit: f32) -> bool {
    let slack = BOUND_TOLERANCE * (to_pivot + ball_radius + limit);
    lower_bound(to_pivot, ball_radius) > limit + slack
}

struct Builder<'a, T, M> {
    points: &'a [T],
    metric: &'a M,
    leaf_size: usize,
    order: Vec<usize>,
    nodes: Vec<Node>,
}

impl<T, M: Metric<T>> Builder<'_, T, M> {
    fn run(mut self) -> (Vec<usize>, Vec<Node>) {
        if self.order.is_empty() {
            return (self.order, self.nodes);
        }
        let root = self.push_node(0, self.order.len());
        let mut pending = vec![root];
        while let Some(index) = pending.pop() {
            if let Some(children) = self.split(index) {
                pending.push(children.0);
                pending.push(children.1);
            }
        }
        (self.order, self.nodes)
    }

    fn point(&self, id: usize) -> Option<&T> {
        self.points.get(id)
    }

    /// Creates a node over `order[start..end]`, pivoting on `order[start]`.
    fn push_node(&mut self, start: usize, end: usize) -> usize {
        let pivot = self.order.get(start).copied().unwrap_or_default();
        let radius = self
            .farthest_from(pivot, start, end)
            .map_or(0.0, |(_, distance)| distance);
        self.nodes.push(Node {
            pivot,
            radius,
            start,
            end,
            children: None,
        });
        self.nodes.len() - 1
    }

    fn farthest_from(&self, anchor: usize, start: usize, end: usize) -> Option<(usize, f32)> {
        let anchor = self.point(anchor)?;
        let mut farthest: Option<(usize, f32)> = None;
        for &id in self.order.get(start..end)? {
            let Some(point) = self.point(id) else {
                continue;
            };
            let distance = self.metric.distance(anchor, point);
            if farthest.is_none_or(|(_, best)| distance > best) {
                farthest = Some((id, distance));
            }
        }
        farthest
    }

    /// Splits a node around two far-apart pivots, returning the children.
    fn split(&mut self, index: usize) -> Option<(usize, usize)> {
        let node = *self.nodes.get(index)?;
        if node.end - node.start <= self.leaf_size {
            return None;
        }
        let (left_pivot, _) = self.farthest_from(node.pivot, node.start, node.end)?;
        let (right_pivot, spread) = self.farthest_from(left_pivot, node.start, node.end)?;
        if spread <= 0.0 {
            // Every covered point coincides with the pivot.
            return None;
        }

        let mid = self.partition(node.start, node.end, left_pivot, right_pivot)?;
        self.move_to_front(node.start, mid, left_pivot);
        self.move_to_front(mid, node.end, right_pivot);

        let left = self.push_node(node.start, mid);
        let right = self.push_node(mid, node.end);
        if let Some(parent) = self.nodes.get_mut(index) {
            parent.children = Some((left, right));
        }
        Some((left, right))
    }

    /// Reorders `order[start..end]` so points nearer `left` come first and
    /// returns the boundary. Ties go left.
    fn partition(&mut self, start: usize, end: usize, left: usize, right: usize) -> Option<usize> {
        let left_point = self.point(left)?;
        let right_point = self.point(right)?;
        let (near_left, near_right): (Vec<usize>, Vec<usize>) =
            self.order.get(start..end)?.iter().partition(|&&id| {
                self.point(id).is_some_and(|point| {
                    self.metric.distance(point, left_point)
                        <= self.metric.distance(point, right_point)
                })
            });
        if near_left.is_empty() || near_right.is_empty() {
            return None;
        }
        let mid = start + near_left.len();
        let slot = self.order.get_mut(start..end)?;
        for (target, id) in slot.iter_mut().zip(near_left.into_iter().chain(near_right)) {
            *target = id;
        }
        Some(mid)
    }

    fn move_to_front(&mut self, start: usize, end: usize, id: usize) {
        let Some(slice) = self.order.get_mut(start..end) else {
            return;
        };
        if let Some(position) = slice.iter().position(|&candidate| candidate == id) {
            slice.swap(0, position);
        }
    }
}

impl<T, M> BallTree<T, M>
where
    M: Metric<T>,
{
    fn visit_range(
        &self,
        points: &[T],
        center: &T,
        radius: f32,
        found: &mut Vec<Neighbour>,
    ) {
        let mut pending = Vec::new();
        if !self.nodes.is_empty() {
            pending.push(0_usize);
        }
        while let Some(index) = pending.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            let Some(pivot) = points.get(node.pivot) else {
                continue;
            };
            let to_pivot = self.metric.distance(center, pivot);
            if beyond(to_pivot, node.radius, radius) {
                continue;
            }
            if let Some((left, right)) = node.children {
                pending.push(right);
                pending.push(left);
                continue;
            }
            for &id in self.covered(node) {
                let Some(point) = points.get(id) else {
                    continue;
                };
                let distance = self.metric.distance(center, point);
                if distance < radius {
                    found.push(Neighbour { id, distance });
                }
            }
        }
    }

    fn node_candidate(&self, points: &[T], center: &T, index: usize) -> Option<NodeCandidate> {
        let node = self.nodes.get(index)?;
        let pivot = points.get(node.pivot)?;
        let to_pivot = self.metric.distance(center, pivot);
        Some(NodeCandidate {
            node: index,
            lower_bound: lower_bound(to_pivot, node.radius),
        })
    }
}

impl<T, M> RangeQueryProvider<T> for BallTree<T, M>
where
    T: Send + Sync,
    M: Metric<T>,
{
    fn name(&self) -> &str {
        "ball_tree"
    }

    fn dataset_id(&self) -> Option<DatasetId> {
        self.attached_id()
    }

    fn attach(&mut self, dataset: Arc<Dataset<T>>) {
        self.dataset = Some(dataset);
        self.clear();
    }

    fn clear(&mut self) {
        self.order.clear();
        self.nodes.clear();
        self.built = false;
    }

    #[instrument(
        name = "ball_tree.build",
        err,
        skip(self),
        fields(points = self.dataset.as_ref().map_or(0, |dataset| dataset.len()), leaf_size = self.leaf_size.get()),
    )]
    fn build(&mut self) -> Result<(), QueryError> {
        let dataset = Arc::clone(self.dataset.as_ref().ok_or(QueryError::NoDataset)?);
        let builder = Builder {
            points: dataset.as_slice(),
            metric: &self.metric,
            leaf_size: self.leaf_size.get(),
            order: (0..dataset.len()).collect(),
            nodes: Vec::new(),
        };
        let (order, nodes) = builder.run();
        self.order = order;
        self.nodes = nodes;
        self.built = true;
        debug!(nodes = self.nodes.len(), "ball tree built");
        Ok(())
    }

    fn is_built(&self) -> bool {
        self.built
    }

    fn range_query(&self, center: &T, radius: f32) -> Result<Vec<Neighbour>, QueryError> {
        validate_radius(radius)?;
        let points = self.points()?;
        let mut found = Vec::new();
        self.visit_range(points, center, radius, &mut found);
        found.sort_unstable_by_key(|neighbour| neighbour.id);
        Ok(found)
    }

    fn knn_query(&self, center: &T, k: usize) -> Result<Vec<Neighbour>, QueryError> {
        let points = self.points()?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let mut best: BinaryHeap<Neighbour> = BinaryHeap::with_capacity(k.saturating_add(1));
        let mut frontier = BinaryHeap::new();
        frontier.extend(self.node_candidate(points, center, 0));

        while let Some(candidate) = frontier.pop() {
            if best.len() >= k
                && best.peek().is_some_and(|worst| {
                    let slack = BOUND_TOLERANCE * (candidate.lower_bound + worst.distance);
                    candidate.lower_bound > worst.distance + slack
                })
            {
                break;
            }
            let Some(node) = self.nodes.get(candidate.node) else {
                continue;
            };
            if let Some((left, right)) = node.children {
                frontier.extend(self.node_candidate(points, center, left));
                frontier.extend(self.node_candidate(points, center, right));
                continue;
            }
            for &id in self.covered(node) {
                let Some(point) = points.get(id) else {
                    continue;
                };
                best.push(Neighbour {
                    id,
                    distance: self.metric.distance(center, point),
                });
                if best.len() > k {
                    best.pop();
                }
            }
        }
        Ok(best.into_sorted_vec())
    }
}
