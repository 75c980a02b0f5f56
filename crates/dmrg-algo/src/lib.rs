#![warn(missing_docs)]
//! Two-site finite-size DMRG over matrix-represented MPOs.
//!
//! The sweep core: at each bond it assembles the effective Hamiltonian as
//! a group of `(left env, W_l, W_r, right env)` contraction terms, finds
//! its lowest eigenpair with a matrix-free Lanczos iteration, splits the
//! optimized two-site state by truncated SVD, and grows the adjacent
//! environment block incrementally. Environments and finalized site
//! tensors are paged to disk between steps, so only a small moving window
//! is resident.
//!
//! Entry points: [`DmrgExecutor`] for a driven run, or [`finite_dmrg`]
//! for a one-shot ground-state search.

pub mod executor;
pub mod grow;
pub mod lanczos;
pub mod measure;
pub mod params;
pub mod terms;

pub use executor::{finite_dmrg, DmrgExecutor, ExecutorStatus};
pub use grow::{update_left_block_ops, update_right_block_ops};
pub use lanczos::{lanczos_solver, tridiag_gs_eigpair, tridiag_gs_eigval, LanczosResult};
pub use measure::entanglement_entropy;
pub use params::{LanczosParams, SweepParams};
pub use terms::{assemble_eff_ham_terms, eff_ham_terms_mul_two_site_state, EffHamTerm};
