//! Incremental growth of environment block-operator groups.

use dmrg_mps::{OperatorGroup, SparseOpMat};
use dmrg_tensor::{contract, linear_combine, Result, Tensor, TensorError};
use rayon::prelude::*;

fn sum_partials(partials: Vec<Tensor>, bond_dim: usize) -> Result<Tensor> {
    if partials.is_empty() {
        // A structurally empty MPO column/row contributes a zero
        // environment slice.
        return Ok(Tensor::new(vec![bond_dim, bond_dim], 0));
    }
    let coefs = vec![1.0; partials.len()];
    let refs: Vec<&Tensor> = partials.iter().collect();
    let mut acc = Tensor::zeros_like(&partials[0]);
    linear_combine(&coefs, &refs, 0.0, &mut acc)?;
    Ok(acc)
}

/// Grow a left block-operator group across one site.
///
/// `a` is the freshly left-canonicalized site tensor and `w` the site's
/// operator grid. For each outgoing MPO bond `j`,
/// `L'[j] = Σ_i L[i] · A · W(i, j) · A†`, closed on the bra-side bond and
/// physical legs.
pub fn update_left_block_ops(
    lopg: &OperatorGroup,
    a: &Tensor,
    w: &SparseOpMat,
) -> Result<OperatorGroup> {
    if lopg.len() != w.rows() {
        return Err(TensorError::ShapeMismatch {
            message: format!(
                "left group of size {} against an operator grid with {} rows",
                lopg.len(),
                w.rows()
            ),
        });
    }
    let a_dag = a.dag();
    let bond_dim = a.dim(2);
    (0..w.cols())
        .into_par_iter()
        .map(|j| {
            let mut partials = Vec::new();
            for i in 0..w.rows() {
                if let Some(op) = w.get(i, j) {
                    let t = contract(&lopg[i], a, &[0], &[0])?;
                    let t = contract(&t, op, &[1], &[1])?;
                    partials.push(contract(&t, &a_dag, &[0, 2], &[0, 1])?);
                }
            }
            sum_partials(partials, bond_dim)
        })
        .collect()
}

/// Grow a right block-operator group across one site; the mirror of
/// [`update_left_block_ops`].
///
/// `b` is the freshly right-canonicalized site tensor. For each incoming
/// MPO bond `i`, `R'[i] = Σ_k B · W(i, k) · R[k] · B†`.
pub fn update_right_block_ops(
    ropg: &OperatorGroup,
    b: &Tensor,
    w: &SparseOpMat,
) -> Result<OperatorGroup> {
    if ropg.len() != w.cols() {
        return Err(TensorError::ShapeMismatch {
            message: format!(
                "right group of size {} against an operator grid with {} columns",
                ropg.len(),
                w.cols()
            ),
        });
    }
    let b_dag = b.dag();
    let bond_dim = b.dim(0);
    (0..w.rows())
        .into_par_iter()
        .map(|i| {
            let mut partials = Vec::new();
            for k in 0..w.cols() {
                if let Some(op) = w.get(i, k) {
                    let t = contract(b, &ropg[k], &[2], &[0])?;
                    let t = contract(&t, op, &[1], &[1])?;
                    partials.push(contract(&t, &b_dag, &[1, 2], &[2, 1])?);
                }
            }
            sum_partials(partials, bond_dim)
        })
        .collect()
}
