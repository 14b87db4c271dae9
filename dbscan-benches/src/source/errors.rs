//! Error types for synthetic benchmark data generation.

/// Errors that may occur while generating benchmark datasets.
#[derive(Debug, thiserror::Error)]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
    /// The requested cluster count was zero.
    #[error("cluster count must be greater than zero")]
    ZeroClusters,
    /// The configured cluster count exceeded the available points.
    #[error("cluster count ({cluster_count}) must not exceed point count ({point_count})")]
    ClusterCountExceedsPointCount {
        /// Number of clusters requested.
        cluster_count: usize,
        /// Number of points requested.
        point_count: usize,
    },
    /// A floating-point generator parameter was invalid.
    #[error("invalid floating-point parameter `{parameter}`")]
    InvalidFloatParameter {
        /// Name of the invalid parameter.
        parameter: &'static str,
    },
    /// The requested text alphabet was empty.
    #[error("text alphabet must not be empty")]
    EmptyAlphabet,
    /// The requested text corpus size was zero.
    #[error("text item count must be greater than zero")]
    ZeroTextItems,
    /// The requested minimum text length was zero.
    #[error("minimum text length must be greater than zero")]
    ZeroTextLength,
    /// The requested text length range was invalid.
    #[error("invalid text length range: min={min_length}, max={max_length}")]
    InvalidTextLengthRange {
        /// Minimum configured text length.
        min_length: usize,
        /// Maximum configured text length.
        max_length: usize,
    },
}
