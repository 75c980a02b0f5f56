//! Error types for MPS/MPO containers.

use dmrg_tensor::TensorError;
use thiserror::Error;

/// Result type for MPS/MPO operations.
pub type Result<T> = std::result::Result<T, MpsError>;

/// Errors from MPS/MPO containers and block-operator persistence.
#[derive(Error, Debug)]
pub enum MpsError {
    /// A site tensor was accessed while paged out to disk.
    #[error("site {site} tensor is not resident in memory")]
    NotResident {
        /// The site index.
        site: usize,
    },

    /// A site index is out of range.
    #[error("site {site} out of bounds for chain of length {len}")]
    SiteOutOfBounds {
        /// The offending site index.
        site: usize,
        /// The chain length.
        len: usize,
    },

    /// A tensor primitive failed.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Structurally invalid request or container state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of the problem.
        message: String,
    },
}
