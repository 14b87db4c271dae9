//! Error types for the DBSCAN core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing a [`crate::Dataset`] from raw vectors.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DatasetError {
    /// Vectors must carry at least one component.
    #[error("dataset vectors must have positive dimension")]
    ZeroDimension,
    /// A row did not match the dimension of the first row.
    #[error("row {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        /// Row that disagreed with the first row.
        index: usize,
        /// Dimension established by the first row.
        expected: usize,
        /// Dimension found on the offending row.
        found: usize,
    },
    /// A row contained NaN or an infinity.
    #[error("row {index} contains a non-finite value at dimension {dimension}")]
    NonFinite {
        /// Row holding the offending value.
        index: usize,
        /// Component position of the offending value.
        dimension: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`DatasetError`] variants.
    enum DatasetErrorCode for DatasetError {
        /// Vectors must carry at least one component.
        ZeroDimension => ZeroDimension => "DATASET_ZERO_DIMENSION",
        /// A row did not match the dimension of the first row.
        DimensionMismatch => DimensionMismatch { .. } => "DATASET_DIMENSION_MISMATCH",
        /// A row contained NaN or an infinity.
        NonFinite => NonFinite { .. } => "DATASET_NON_FINITE",
    }
}

/// An error produced by [`crate::RangeQueryProvider`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum QueryError {
    /// Query radius was zero, negative or not finite.
    #[error("query radius must be positive and finite (got {got})")]
    InvalidRadius {
        /// Radius supplied by the caller.
        got: f32,
    },
    /// The provider was queried before [`crate::RangeQueryProvider::build`].
    #[error("the index has not been built")]
    NotBuilt,
    /// The provider was asked to build without an attached dataset.
    #[error("no dataset is attached to the index")]
    NoDataset,
}

define_error_codes! {
    /// Stable codes describing [`QueryError`] variants.
    enum QueryErrorCode for QueryError {
        /// Query radius was zero, negative or not finite.
        InvalidRadius => InvalidRadius { .. } => "QUERY_INVALID_RADIUS",
        /// The provider was queried before it was built.
        NotBuilt => NotBuilt => "QUERY_NOT_BUILT",
        /// The provider was asked to build without an attached dataset.
        NoDataset => NoDataset => "QUERY_NO_DATASET",
    }
}

/// Error type produced when configuring or running [`crate::Dbscan`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DbscanError {
    /// The neighbourhood radius must be positive and finite.
    #[error("neighbourhood radius must be positive and finite (got {got})")]
    InvalidRadius {
        /// The rejected radius.
        got: f32,
    },
    /// Ball tree leaves must hold at least one point.
    #[error("leaf_size must be at least 1 (got {got})")]
    InvalidLeafSize {
        /// The rejected leaf size.
        got: usize,
    },
    /// The range query provider failed.
    #[error("range query provider failed: {0}")]
    Query(#[from] QueryError),
}

define_error_codes! {
    /// Stable codes describing [`DbscanError`] variants.
    enum DbscanErrorCode for DbscanError {
        /// The neighbourhood radius must be positive and finite.
        InvalidRadius => InvalidRadius { .. } => "DBSCAN_INVALID_RADIUS",
        /// Ball tree leaves must hold at least one point.
        InvalidLeafSize => InvalidLeafSize { .. } => "DBSCAN_INVALID_LEAF_SIZE",
        /// The range query provider failed.
        QueryFailure => Query(..) => "DBSCAN_QUERY_FAILURE",
    }
}

impl DbscanError {
    /// Retrieve the inner [`QueryErrorCode`] when the error originated in a provider.
    #[must_use]
    pub const fn query_code(&self) -> Option<QueryErrorCode> {
        match self {
            Self::Query(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DbscanError>;
