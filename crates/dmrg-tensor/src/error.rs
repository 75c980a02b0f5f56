//! Error types for tensor operations.

use thiserror::Error;

/// Result type for tensor operations.
pub type Result<T> = std::result::Result<T, TensorError>;

/// Errors that can occur during tensor operations.
#[derive(Error, Debug)]
pub enum TensorError {
    /// An axis index is out of range for the tensor's rank.
    #[error("axis {axis} out of bounds for rank-{rank} tensor")]
    AxisOutOfBounds {
        /// The offending axis index.
        axis: usize,
        /// The tensor rank.
        rank: usize,
    },

    /// Two tensors (or axis pairs) have incompatible shapes.
    #[error("shape mismatch: {message}")]
    ShapeMismatch {
        /// Description of the mismatch.
        message: String,
    },

    /// An operation produced or received a tensor with no elements.
    #[error("empty tensor")]
    Empty,

    /// The linear algebra backend failed (e.g. SVD non-convergence).
    #[error("linear algebra backend error: {0}")]
    Backend(String),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
