//! Exhaustive range query provider.

use std::{collections::BinaryHeap, fmt, sync::Arc};

use crate::{
    dataset::{Dataset, DatasetId},
    error::QueryError,
    metric::Metric,
};

use super::{Neighbour, RangeQueryProvider, validate_radius};

/// Provider that answers every query by scanning the whole dataset.
///
/// Each query costs `O(n)` distance evaluations, so a full clustering pass
/// is quadratic. It is useful for tiny datasets and as a reference oracle for
/// tree-based providers.
pub struct LinearScan<T, M> {
    metric: M,
    dataset: Option<Arc<Dataset<T>>>,
    built: bool,
}

impl<T, M> LinearScan<T, M> {
    /// Creates an unattached provider using `metric`.
    #[must_use]
    pub const fn new(metric: M) -> Self {
        Self {
            metric,
            dataset: None,
            built: false,
        }
    }

    /// Returns the metric used to evaluate distances.
    #[must_use]
    pub const fn metric(&self) -> &M {
        &self.metric
    }

    fn dataset_id_inner(&self) -> Option<DatasetId> {
        self.dataset.as_ref().map(|dataset| dataset.id())
    }

    fn points(&self) -> Result<&[T], QueryError> {
        match (&self.dataset, self.built) {
            (Some(dataset), true) => Ok(dataset.as_slice()),
            _ => Err(QueryError::NotBuilt),
        }
    }
}

impl<T, M: fmt::Debug> fmt::Debug for LinearScan<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearScan")
            .field("metric", &self.metric)
            .field("dataset", &self.dataset_id_inner())
            .field("built", &self.built)
            .finish()
    }
}

impl<T, M> RangeQueryProvider<T> for LinearScan<T, M>
where
    T: Send + Sync,
    M: Metric<T>,
{
    fn name(&self) -> &str {
        "linear_scan"
    }

    fn dataset_id(&self) -> Option<DatasetId> {
        self.dataset_id_inner()
    }

    fn attach(&mut self, dataset: Arc<Dataset<T>>) {
        self.dataset = Some(dataset);
        self.built = false;
    }

    fn clear(&mut self) {
        self.built = false;
    }

    fn is_built(&self) -> bool {
        self.built
    }

    fn build(&mut self) -> Result<(), QueryError> {
        if self.dataset.is_none() {
            return Err(QueryError::NoDataset);
        }
        self.built = true;
        Ok(())
    }

    fn range_query(&self, center: &T, radius: f32) -> Result<Vec<Neighbour>, QueryError> {
        validate_radius(radius)?;
        let points = self.points()?;
        Ok(points
            .iter()
            .enumerate()
            .filter_map(|(id, point)| {
                let distance = self.metric.distance(center, point);
                (distance < radius).then_some(Neighbour { id, distance })
            })
            .collect())
    }

    fn knn_query(&self, center: &T, k: usize) -> Result<Vec<Neighbour>, QueryError> {
        let points = self.points()?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let mut best = BinaryHeap::with_capacity(k.saturating_add(1));
        for (id, point) in points.iter().enumerate() {
            best.push(Neighbour {
                id,
                distance: self.metric.distance(center, point),
            });
            if best.len() > k {
                best.pop();
            }
        }
        Ok(best.into_sorted_vec())
    }
}
