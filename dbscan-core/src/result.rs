//! Result types for clustering runs.
//!
//! Provides an immutable snapshot of the labels produced by one run and
//! validation of the cluster identifier constraints.

use thiserror::Error;

use crate::label::PointLabel;

/// Snapshot of the labels produced by [`crate::Dbscan::run`].
///
/// # Examples
/// ```
/// use dbscan_core::{ClusterId, ClusteringResult, PointLabel};
///
/// let result = ClusteringResult::try_from_labels(vec![
///     PointLabel::Member(ClusterId::new(0)),
///     PointLabel::Noise,
///     PointLabel::Member(ClusterId::new(0)),
/// ])?;
/// assert_eq!(result.cluster_count(), 1);
/// assert_eq!(result.noise(), [1]);
/// # Ok::<(), dbscan_core::NonContiguousClusterIds>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringResult {
    labels: Vec<PointLabel>,
    cluster_count: usize,
}

/// Error returned when cluster identifiers are not contiguous starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NonContiguousClusterIds {
    /// Some cluster exists but cluster `0` does not.
    #[error("cluster identifiers must include 0")]
    MissingZero,
    /// The labels skip identifiers.
    #[error("cluster identifiers must be contiguous without gaps")]
    Gap,
    /// The labels require identifiers beyond the host pointer width.
    #[error("cluster identifiers exceed or reach the host pointer-width limit")]
    Overflow,
    /// A point was never visited.
    #[error("point {id} is still unassigned")]
    Unassigned {
        /// Identity of the unvisited point.
        id: usize,
    },
}

impl ClusteringResult {
    pub(crate) fn from_parts(labels: Vec<PointLabel>, cluster_count: usize) -> Self {
        Self {
            labels,
            cluster_count,
        }
    }

    /// Attempts to build a result from explicit labels.
    ///
    /// Every point must be visited and member identifiers must cover
    /// `0..cluster_count` without gaps. Labels holding only noise yield
    /// `cluster_count == 0`.
    ///
    /// # Errors
    /// Returns [`NonContiguousClusterIds::Unassigned`] for unvisited points,
    /// [`NonContiguousClusterIds::MissingZero`] when cluster `0` is absent,
    /// [`NonContiguousClusterIds::Gap`] when identifiers skip values, and
    /// [`NonContiguousClusterIds::Overflow`] when identifiers exceed the host
    /// pointer width.
    pub fn try_from_labels(labels: Vec<PointLabel>) -> Result<Self, NonContiguousClusterIds> {
        let mut seen = Vec::<bool>::new();
        for (id, label) in labels.iter().enumerate() {
            match label {
                PointLabel::Unassigned => return Err(NonContiguousClusterIds::Unassigned { id }),
                PointLabel::Noise => {}
                PointLabel::Member(cluster) => {
                    let value = usize::try_from(cluster.get())
                        .ok()
                        .filter(|value| *value < usize::MAX)
                        .ok_or(NonContiguousClusterIds::Overflow)?;
                    // Identifiers beyond the point count cannot be contiguous.
                    if value >= labels.len() {
                        return Err(NonContiguousClusterIds::Gap);
                    }
                    if seen.len() <= value {
                        seen.resize(value + 1, false);
                    }
                    seen[value] = true;
                }
            }
        }

        match seen.first() {
            None => Ok(Self::from_parts(labels, 0)),
            Some(false) => Err(NonContiguousClusterIds::MissingZero),
            Some(true) if seen.iter().all(|present| *present) => {
                let cluster_count = seen.len();
                Ok(Self::from_parts(labels, cluster_count))
            }
            Some(true) => Err(NonContiguousClusterIds::Gap),
        }
    }

    /// Returns the label of every point in identity order.
    #[must_use]
    pub fn labels(&self) -> &[PointLabel] {
        &self.labels
    }

    /// Returns the cluster of every point, `None` for noise.
    ///
    /// # Examples
    /// ```
    /// use dbscan_core::{ClusterId, ClusteringResult, PointLabel};
    ///
    /// let result = ClusteringResult::try_from_labels(vec![
    ///     PointLabel::Noise,
    ///     PointLabel::Member(ClusterId::new(0)),
    /// ])
    /// .expect("labels are contiguous");
    /// assert_eq!(result.assignments(), vec![None, Some(ClusterId::new(0))]);
    /// ```
    #[must_use]
    pub fn assignments(&self) -> Vec<Option<ClusterId>> {
        self.labels.iter().map(|label| label.cluster()).collect()
    }

    /// Counts the clusters discovered; noise never counts.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Returns the identities of noise points in ascending order.
    #[must_use]
    pub fn noise(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(id, label)| label.is_noise().then_some(id))
            .collect()
    }

    /// Counts the noise points.
    #[must_use]
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|label| label.is_noise()).count()
    }

    /// Groups member identities by cluster, indexed by cluster id.
    ///
    /// # Examples
    /// ```
    /// use dbscan_core::{ClusterId, ClusteringResult, PointLabel};
    ///
    /// let result = ClusteringResult::try_from_labels(vec![
    ///     PointLabel::Member(ClusterId::new(1)),
    ///     PointLabel::Member(ClusterId::new(0)),
    ///     PointLabel::Member(ClusterId::new(1)),
    /// ])
    /// .expect("labels are contiguous");
    /// assert_eq!(result.clusters(), vec![vec![1], vec![0, 2]]);
    /// ```
    #[must_use]
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); self.cluster_count];
        for (id, label) in self.labels.iter().enumerate() {
            let Some(cluster) = label.cluster() else {
                continue;
            };
            if let Some(members) = usize::try_from(cluster.get())
                .ok()
                .and_then(|index| clusters.get_mut(index))
            {
                members.push(id);
            }
        }
        clusters
    }
}

/// Identifier assigned to a cluster.
///
/// Identifiers are allocated from zero in discovery order.
///
/// # Examples
/// ```
/// use dbscan_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
