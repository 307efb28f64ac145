use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KdIndexError {
    /// A tree or point was configured with zero dimensions.
    #[error("KD-trees can only have positive dimensions, got {0}")]
    InvalidDimension(usize),

    /// A coordinate vector does not have the length the tree or point expects.
    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch {
        /// The configured dimension.
        expected: usize,
        /// The length of the offending coordinate vector.
        actual: usize,
    },

    /// A radius query was issued with a negative (or NaN) radius.
    #[error("Radius must be non-negative, got {0}")]
    NegativeRadius(f64),

    /// A coordinate slot holds NaN or an infinity.
    #[error("Coordinate {index} is not finite")]
    InvalidCoordinate {
        /// Position of the offending slot.
        index: usize,
    },

    /// The requested distance is not defined for these coordinates.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A node descent path could not be followed.
    #[error("Path not found: {0}")]
    PathNotFound(String),
}

/// Result type with [`KdIndexError`] as the error.
pub type Result<T> = std::result::Result<T, KdIndexError>;
