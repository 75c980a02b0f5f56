//! Whole-chain MPS truncation.

use crate::error::Result;
use crate::mps::FiniteMps;
use dmrg_tensor::{contract, truncated_svd};

/// Truncate every bond of the MPS.
///
/// Centralizes to the left end and normalizes the head tensor, then
/// truncates each bond left to right with a truncated SVD, renormalizing
/// the singular-value tensor at every step. Reports the per-bond
/// truncation error and kept dimension. Leaves the chain uncentralized.
pub fn truncate_mps(
    mps: &mut FiniteMps,
    trunc_err: f64,
    dmin: usize,
    dmax: usize,
) -> Result<()> {
    let n = mps.len();
    assert!(n >= 2, "cannot truncate a chain of fewer than 2 sites");

    mps.centralize(0)?;
    mps.ten_mut(0)?.normalize();

    for i in 0..n - 1 {
        let ldiv = mps.ten(i)?.div();
        let out = truncated_svd(mps.ten(i)?, 2, ldiv, trunc_err, dmin, dmax)?;
        println!(
            "Truncate MPS bond {:4} TruncErr = {:.2e} D = {:5}",
            i, out.trunc_err, out.d
        );
        let mut s = out.s;
        s.normalize();
        let sv = contract(&s, &out.vt, &[1], &[0])?;
        let next = contract(&sv, mps.ten(i + 1)?, &[1], &[0])?;
        mps.set_ten(i, out.u)?;
        mps.set_ten(i + 1, next)?;
    }
    Ok(())
}
