//! Matrix-free Lanczos eigensolver and its tridiagonal ground-state
//! solver.

use crate::params::LanczosParams;
use anyhow::{bail, Result};
use dmrg_tensor::{linear_combine, Tensor};
use faer::Side;

/// Result of a Lanczos ground-state solve.
#[derive(Debug, Clone)]
pub struct LanczosResult {
    /// Number of matrix-vector products performed.
    pub iters: usize,
    /// Ground-state energy estimate.
    pub gs_eng: f64,
    /// Ground-state vector, normalized.
    pub gs_vec: Tensor,
}

/// Find the lowest eigenpair of a Hermitian operator given only its
/// action `apply_h` on a state tensor.
///
/// `init_state` seeds the Krylov space and is consumed. The iteration
/// keeps all basis vectors for the final recombination; the residual
/// overwrites the previous matrix-vector product in place, so at most
/// `m + 2` tensors are live at once.
///
/// Convergence is one-sided: the loop stops once the Rayleigh–Ritz
/// estimate improves by less than `params.error`, or the Krylov dimension
/// reaches the state size or `params.max_iterations`. A zero-norm
/// residual (breakdown) is exact convergence on the spanned subspace and
/// is handled locally.
pub fn lanczos_solver<F>(
    apply_h: F,
    mut init_state: Tensor,
    params: &LanczosParams,
) -> Result<LanczosResult>
where
    F: Fn(&Tensor) -> Result<Tensor>,
{
    let eff_dim = init_state.size();
    if init_state.normalize() == 0.0 {
        bail!("Lanczos initial state has zero norm");
    }

    let mut bases: Vec<Tensor> = Vec::with_capacity(params.max_iterations.min(eff_dim) + 1);
    let mut alpha: Vec<f64> = Vec::new();
    let mut beta: Vec<f64> = Vec::new();

    bases.push(init_state);
    let mut w = apply_h(&bases[0])?;
    alpha.push(w.scalar_product(&bases[0])?);
    let mut energy = alpha[0];
    let mut m = 0usize;

    loop {
        m += 1;
        // Residual γ = w − α_{m-1} b_{m-1} − β_{m-2} b_{m-2}, in place of w.
        if m == 1 {
            linear_combine(&[-alpha[m - 1]], &[&bases[m - 1]], 1.0, &mut w)?;
        } else {
            linear_combine(
                &[-alpha[m - 1], -beta[m - 2]],
                &[&bases[m - 1], &bases[m - 2]],
                1.0,
                &mut w,
            )?;
        }
        let norm_gamma = w.normalize();
        if norm_gamma == 0.0 {
            if m == 1 {
                // The initial state is an exact eigenvector.
                return Ok(LanczosResult {
                    iters: 1,
                    gs_eng: energy,
                    gs_vec: bases.swap_remove(0),
                });
            }
            let (eigval, eigvec) = tridiag_gs_eigpair(&alpha, &beta, m)?;
            let gs_vec = recombine(&eigvec, &bases[..m])?;
            return Ok(LanczosResult {
                iters: m,
                gs_eng: eigval,
                gs_vec,
            });
        }

        beta.push(norm_gamma);
        bases.push(w);
        w = apply_h(&bases[m])?;
        alpha.push(w.scalar_product(&bases[m])?);

        let energy_new = tridiag_gs_eigval(&alpha, &beta, m + 1)?;
        if (energy - energy_new) < params.error
            || m == eff_dim
            || m == params.max_iterations.saturating_sub(1)
        {
            let (eigval, eigvec) = tridiag_gs_eigpair(&alpha, &beta, m + 1)?;
            let gs_vec = recombine(&eigvec, &bases)?;
            return Ok(LanczosResult {
                iters: m + 1,
                gs_eng: eigval,
                gs_vec,
            });
        }
        energy = energy_new;
    }
}

fn recombine(coefs: &[f64], bases: &[Tensor]) -> Result<Tensor> {
    let refs: Vec<&Tensor> = bases.iter().collect();
    let mut gs = Tensor::zeros_like(&bases[0]);
    linear_combine(coefs, &refs, 0.0, &mut gs)?;
    Ok(gs)
}

fn tridiag_eigen(alpha: &[f64], beta: &[f64], size: usize) -> Result<(Vec<f64>, faer::Mat<f64>)> {
    debug_assert!(alpha.len() >= size && beta.len() + 1 >= size);
    let t = faer::Mat::<f64>::from_fn(size, size, |i, j| {
        if i == j {
            alpha[i]
        } else if i == j + 1 {
            beta[j]
        } else if j == i + 1 {
            beta[i]
        } else {
            0.0
        }
    });
    let evd = t
        .as_ref()
        .self_adjoint_eigen(Side::Lower)
        .map_err(|e| anyhow::anyhow!("tridiagonal eigensolve failed: {e:?}"))?;
    let s_col = evd.S().column_vector();
    let eigvals: Vec<f64> = (0..size).map(|i| s_col[i]).collect();
    Ok((eigvals, evd.U().to_owned()))
}

/// Lowest eigenvalue of the `size × size` symmetric tridiagonal matrix
/// with diagonal `alpha` and off-diagonal `beta`.
pub fn tridiag_gs_eigval(alpha: &[f64], beta: &[f64], size: usize) -> Result<f64> {
    let (eigvals, _) = tridiag_eigen(alpha, beta, size)?;
    Ok(eigvals.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Lowest eigenpair of the `size × size` symmetric tridiagonal matrix.
pub fn tridiag_gs_eigpair(alpha: &[f64], beta: &[f64], size: usize) -> Result<(f64, Vec<f64>)> {
    let (eigvals, u) = tridiag_eigen(alpha, beta, size)?;
    let mut min_idx = 0usize;
    for i in 1..size {
        if eigvals[i] < eigvals[min_idx] {
            min_idx = i;
        }
    }
    let eigvec: Vec<f64> = (0..size).map(|i| u[(i, min_idx)]).collect();
    Ok((eigvals[min_idx], eigvec))
}
