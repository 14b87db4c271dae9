//! Sealed datasets of indexed points.
//!
//! A [`Dataset`] assigns every point a stable integer identity at
//! construction time. Identities double as array indices for all per-point
//! engine state, and the dataset never changes once built, so the engine and
//! any range query provider can share it behind an [`Arc`].

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::error::DatasetError;

static NEXT_DATASET_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`Dataset`] instance.
///
/// Providers record the identity of the dataset they were built over so the
/// engine can detect an index built against a different dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetId(u64);

impl DatasetId {
    fn next() -> Self {
        Self(NEXT_DATASET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying numeric identity.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// A point paired with its stable identity.
///
/// # Examples
/// ```
/// use dbscan_core::Dataset;
///
/// let dataset = Dataset::new("demo", vec![10, 20]);
/// let second = dataset.point(1).expect("id 1 exists");
/// assert_eq!(second.id, 1);
/// assert_eq!(*second.value, 20);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct IndexedPoint<'a, T> {
    /// Identity assigned when the dataset was sealed.
    pub id: usize,
    /// The point itself.
    pub value: &'a T,
}

impl<T> Clone for IndexedPoint<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IndexedPoint<'_, T> {}

/// An immutable collection of points with stable identities.
///
/// Identities are `0..len()` in insertion order, which is also the iteration
/// order used by the clustering scan.
///
/// # Examples
/// ```
/// use dbscan_core::Dataset;
///
/// let dataset = Dataset::new("letters", vec!['a', 'b', 'c']);
/// assert_eq!(dataset.len(), 3);
/// assert_eq!(dataset.name(), "letters");
/// let ids: Vec<usize> = dataset.iter().map(|point| point.id).collect();
/// assert_eq!(ids, [0, 1, 2]);
/// ```
#[derive(Debug)]
pub struct Dataset<T> {
    id: DatasetId,
    name: Arc<str>,
    points: Vec<T>,
}

impl<T> Dataset<T> {
    /// Seals `points` into a dataset, assigning identities in order.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, points: Vec<T>) -> Self {
        Self {
            id: DatasetId::next(),
            name: name.into(),
            points,
        }
    }

    /// Convenience constructor returning the dataset behind an [`Arc`].
    #[must_use]
    pub fn shared(name: impl Into<Arc<str>>, points: Vec<T>) -> Arc<Self> {
        Arc::new(Self::new(name, points))
    }

    /// Returns the identity of this dataset instance.
    #[must_use]
    pub const fn id(&self) -> DatasetId {
        self.id
    }

    /// Returns the human-readable dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the dataset holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point with identity `id`, if present.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&T> {
        self.points.get(id)
    }

    /// Returns the indexed point with identity `id`, if present.
    #[must_use]
    pub fn point(&self, id: usize) -> Option<IndexedPoint<'_, T>> {
        self.points.get(id).map(|value| IndexedPoint { id, value })
    }

    /// Iterates over the indexed points in identity order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = IndexedPoint<'_, T>> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(id, value)| IndexedPoint { id, value })
    }

    /// Returns the points as a slice indexed by identity.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.points
    }
}

impl Dataset<Vec<f32>> {
    /// Seals dense vectors after validating their shape.
    ///
    /// Every row must have the same positive dimension and contain only
    /// finite values. An empty row set is accepted.
    ///
    /// # Errors
    /// Returns [`DatasetError::ZeroDimension`] when the first row is empty,
    /// [`DatasetError::DimensionMismatch`] when a row disagrees with the first
    /// row, and [`DatasetError::NonFinite`] when a value is NaN or infinite.
    ///
    /// # Examples
    /// ```
    /// use dbscan_core::{Dataset, DatasetError};
    ///
    /// let dataset = Dataset::from_vectors("plane", vec![vec![0.0, 1.0], vec![2.0, 3.0]])?;
    /// assert_eq!(dataset.dimension(), Some(2));
    ///
    /// let err = Dataset::from_vectors("bad", vec![vec![0.0], vec![f32::NAN]])
    ///     .expect_err("NaN must be rejected");
    /// assert!(matches!(err, DatasetError::NonFinite { index: 1, dimension: 0 }));
    /// # Ok::<(), DatasetError>(())
    /// ```
    pub fn from_vectors(
        name: impl Into<Arc<str>>,
        rows: Vec<Vec<f32>>,
    ) -> Result<Self, DatasetError> {
        validate_rows(&rows)?;
        Ok(Self::new(name, rows))
    }

    /// Returns the shared dimension of the vectors, or `None` when empty.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.points.first().map(Vec::len)
    }
}

fn validate_rows(rows: &[Vec<f32>]) -> Result<(), DatasetError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let expected = first.len();
    if expected == 0 {
        return Err(DatasetError::ZeroDimension);
    }
    for (index, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(DatasetError::DimensionMismatch {
                index,
                expected,
                found: row.len(),
            });
        }
        if let Some(dimension) = row.iter().position(|value| !value.is_finite()) {
            return Err(DatasetError::NonFinite { index, dimension });
        }
    }
    Ok(())
}
