#![warn(missing_docs)]
//! Dense tensor primitives for DMRG-style tensor network algorithms.
//!
//! This crate provides the small set of operations a finite-size DMRG core
//! consumes:
//! - [`Tensor`]: a dense, dynamic-rank `f64` tensor carrying a U(1) charge
//!   divergence as tracked metadata
//! - [`contract`]: axis-pair contraction backed by a GEMM
//! - [`svd`] / [`truncated_svd`]: matricized singular value decompositions,
//!   the truncated variant with `[Dmin, Dmax]` bounds and a target
//!   truncation error
//! - [`linear_combine`]: in-place linear combination of equally shaped
//!   tensors
//! - per-tensor file dump/load
//!
//! The divergence is bookkeeping only: contraction adds divergences,
//! [`Tensor::dag`] negates, and the SVD splits the divergence between the
//! two factors. No block-sparse storage is implemented.

pub mod contract;
pub mod error;
pub mod io;
pub mod svd;
pub mod tensor;

pub use contract::contract;
pub use error::{Result, TensorError};
pub use svd::{svd, truncated_svd, SvdOutcome};
pub use tensor::{linear_combine, Tensor};
