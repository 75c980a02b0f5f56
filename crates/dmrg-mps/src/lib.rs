#![warn(missing_docs)]
//! One-dimensional tensor network containers for finite DMRG.
//!
//! - [`FiniteMps`]: site-tensor sequence with a tracked canonical center,
//!   per-site canonical flags, and per-site disk paging
//! - [`MatReprMpo`]: matrix-represented MPO, a sparse grid of on-site
//!   operators per site indexed by MPO virtual bonds
//! - [`block_ops`]: persistence of left/right environment operator groups
//! - [`truncate_mps`]: whole-chain truncation sweep

pub mod block_ops;
pub mod error;
pub mod mpo;
pub mod mps;
pub mod truncate;

pub use block_ops::{
    gen_block_op_file_name, read_and_remove_operator_group, read_operator_group,
    trivial_operator_group, write_operator_group, BlockSide, OperatorGroup,
};
pub use error::{MpsError, Result};
pub use mpo::{MatReprMpo, SparseOpMat};
pub use mps::{gen_mps_ten_name, CanoType, FiniteMps, MPS_TEN_BASE_NAME, TEN_FILE_SUFFIX};
pub use truncate::truncate_mps;
