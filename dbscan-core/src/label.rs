//! Per-point clustering state.

use crate::result::ClusterId;

/// Clustering state of a single point.
///
/// Points start [`PointLabel::Unassigned`]. A point marked
/// [`PointLabel::Noise`] may later be claimed by a cluster as a border point,
/// but a [`PointLabel::Member`] never changes again within a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointLabel {
    /// Not yet visited by the current run.
    #[default]
    Unassigned,
    /// Visited, but not density-reachable from any core point so far.
    Noise,
    /// Member of the given cluster.
    Member(ClusterId),
}

impl PointLabel {
    /// Returns the cluster for [`PointLabel::Member`] and `None` otherwise.
    ///
    /// # Examples
    /// ```
    /// use dbscan_core::{ClusterId, PointLabel};
    ///
    /// assert_eq!(PointLabel::Member(ClusterId::new(2)).cluster(), Some(ClusterId::new(2)));
    /// assert_eq!(PointLabel::Noise.cluster(), None);
    /// assert_eq!(PointLabel::Unassigned.cluster(), None);
    /// ```
    #[must_use]
    pub const fn cluster(self) -> Option<ClusterId> {
        match self {
            Self::Member(cluster) => Some(cluster),
            Self::Unassigned | Self::Noise => None,
        }
    }

    /// Returns whether the label is [`PointLabel::Noise`].
    #[rustfmt::skip]
    #[must_use]
    pub const fn is_noise(self) -> bool { matches!(self, Self::Noise) }

    /// Returns whether the label is a [`PointLabel::Member`] of some cluster.
    #[rustfmt::skip]
    #[must_use]
    pub const fn is_assigned(self) -> bool { matches!(self, Self::Member(_)) }
}

/// Arena of labels indexed by point identity.
#[derive(Clone, Debug, Default)]
pub(crate) struct LabelStore {
    labels: Vec<PointLabel>,
}

impl LabelStore {
    /// Resets every label to [`PointLabel::Unassigned`], resizing to `len`.
    pub(crate) fn reset(&mut self, len: usize) {
        self.labels.clear();
        self.labels.resize(len, PointLabel::Unassigned);
    }

    pub(crate) fn get(&self, id: usize) -> Option<PointLabel> {
        self.labels.get(id).copied()
    }

    pub(crate) fn as_slice(&self) -> &[PointLabel] {
        &self.labels
    }

    pub(crate) fn mark_noise(&mut self, id: usize) {
        if let Some(label) = self.labels.get_mut(id) {
            *label = PointLabel::Noise;
        }
    }

    /// Assigns `cluster` to `id` unless it already belongs to a cluster.
    ///
    /// Returns the label held before the call; the store changed only when
    /// that label was `Unassigned` or `Noise`.
    pub(crate) fn claim(&mut self, id: usize, cluster: ClusterId) -> Option<PointLabel> {
        let label = self.labels.get_mut(id)?;
        let previous = *label;
        if !matches!(previous, PointLabel::Member(_)) {
            *label = PointLabel::Member(cluster);
        }
        Some(previous)
    }
}
