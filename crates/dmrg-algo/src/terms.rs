//! Effective-Hamiltonian term groups and their action on a two-site
//! state.

use dmrg_mps::{OperatorGroup, SparseOpMat};
use dmrg_tensor::{contract, linear_combine, Result, Tensor};
use rayon::prelude::*;

/// One term of the effective Hamiltonian at a bond: four borrowed tensor
/// references tied to the current bond update.
///
/// ```text
/// |----1                       1-----
/// |          1        1             |
/// |          |        |             |
/// |          0        0             |
/// |          1        2             |
/// |          |        |             |
/// |----0 0-------------------3 0----|
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EffHamTerm<'a> {
    /// Left environment slice for the incoming MPO bond.
    pub l_env: &'a Tensor,
    /// On-site operator of the left site.
    pub w_l: &'a Tensor,
    /// On-site operator of the right site.
    pub w_r: &'a Tensor,
    /// Right environment slice for the outgoing MPO bond.
    pub r_env: &'a Tensor,
}

/// Enumerate the non-null `(i, j, k)` MPO bond triples at a bond and
/// collect the corresponding term group.
///
/// The iteration order is the ascending triple loop, which keeps
/// floating-point summation reproducible for a given MPO.
pub fn assemble_eff_ham_terms<'a>(
    lopg: &'a OperatorGroup,
    w_l: &'a SparseOpMat,
    w_r: &'a SparseOpMat,
    ropg: &'a OperatorGroup,
) -> Vec<EffHamTerm<'a>> {
    let mut terms = Vec::new();
    for i in 0..lopg.len() {
        for j in 0..w_l.cols() {
            for k in 0..w_r.cols() {
                if let (Some(op_l), Some(op_r)) = (w_l.get(i, j), w_r.get(j, k)) {
                    terms.push(EffHamTerm {
                        l_env: &lopg[i],
                        w_l: op_l,
                        w_r: op_r,
                        r_env: &ropg[k],
                    });
                }
            }
        }
    }
    terms
}

/// Apply the effective Hamiltonian to a rank-4 two-site state.
///
/// Each term is a chain of four single-axis-pair contractions mapping the
/// state layout `(l, p1, p2, r)` back onto itself; the per-term products
/// are computed in parallel, then summed sequentially in term order with
/// unit coefficients.
pub fn eff_ham_terms_mul_two_site_state(
    terms: &[EffHamTerm<'_>],
    state: &Tensor,
) -> Result<Tensor> {
    if terms.is_empty() {
        return Ok(Tensor::zeros_like(state));
    }
    let products: Vec<Tensor> = terms
        .par_iter()
        .map(|term| {
            let t0 = contract(state, term.l_env, &[0], &[0])?;
            let t1 = contract(&t0, term.w_l, &[0], &[1])?;
            let t2 = contract(&t1, term.w_r, &[0], &[1])?;
            contract(&t2, term.r_env, &[0], &[0])
        })
        .collect::<Result<Vec<_>>>()?;

    let coefs = vec![1.0; products.len()];
    let refs: Vec<&Tensor> = products.iter().collect();
    let mut res = Tensor::zeros_like(&products[0]);
    linear_combine(&coefs, &refs, 0.0, &mut res)?;
    Ok(res)
}
