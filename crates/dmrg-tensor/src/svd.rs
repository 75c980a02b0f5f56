//! Singular value decomposition of matricized tensors.

use crate::error::{Result, TensorError};
use crate::tensor::Tensor;

/// Result of a truncated SVD split.
#[derive(Debug, Clone)]
pub struct SvdOutcome {
    /// Left factor with shape `dims[..ldims] ++ [d]`; carries the target
    /// divergence.
    pub u: Tensor,
    /// Diagonal singular-value tensor of shape `[d, d]` with divergence 0.
    pub s: Tensor,
    /// Right factor with shape `[d] ++ dims[ldims..]`; carries the
    /// remaining divergence.
    pub vt: Tensor,
    /// Actual relative truncation error `Σ_discarded σ² / Σ σ²`.
    pub trunc_err: f64,
    /// Kept bond dimension.
    pub d: usize,
}

fn matricize(t: &Tensor, ldims: usize) -> Result<(usize, usize)> {
    if ldims == 0 || ldims >= t.rank() {
        return Err(TensorError::ShapeMismatch {
            message: format!(
                "left axis count {} must split a rank-{} tensor",
                ldims,
                t.rank()
            ),
        });
    }
    let m: usize = t.dims()[..ldims].iter().product();
    let n: usize = t.dims()[ldims..].iter().product();
    if m == 0 || n == 0 {
        return Err(TensorError::Empty);
    }
    Ok((m, n))
}

fn backend_svd(t: &Tensor, m: usize, n: usize) -> Result<(faer::Mat<f64>, Vec<f64>, faer::Mat<f64>)> {
    let data = t.data();
    let a = faer::Mat::<f64>::from_fn(m, n, |i, j| data[i * n + j]);
    let svd = a
        .as_ref()
        .thin_svd()
        .map_err(|e| TensorError::Backend(format!("SVD failed: {e:?}")))?;
    let kk = m.min(n);
    let s_col = svd.S().column_vector();
    let svals: Vec<f64> = (0..kk).map(|i| s_col[i]).collect();
    Ok((svd.U().to_owned(), svals, svd.V().to_owned()))
}

fn pack_factors(
    t: &Tensor,
    ldims: usize,
    ldiv: i64,
    u_mat: &faer::Mat<f64>,
    svals: &[f64],
    v_mat: &faer::Mat<f64>,
    m: usize,
    n: usize,
    d: usize,
) -> Result<(Tensor, Tensor, Tensor)> {
    let mut u_dims: Vec<usize> = t.dims()[..ldims].to_vec();
    u_dims.push(d);
    let mut u_data = Vec::with_capacity(m * d);
    for i in 0..m {
        for j in 0..d {
            u_data.push(u_mat[(i, j)]);
        }
    }
    let u = Tensor::from_data(u_dims, ldiv, u_data)?;

    let mut s = Tensor::new(vec![d, d], 0);
    for (i, &sv) in svals.iter().take(d).enumerate() {
        s.set(&[i, i], sv);
    }

    // The backend returns V (columns are right singular vectors); row j of
    // Vᵀ is column j of V.
    let mut vt_dims = vec![d];
    vt_dims.extend_from_slice(&t.dims()[ldims..]);
    let mut vt_data = Vec::with_capacity(d * n);
    for j in 0..d {
        for c in 0..n {
            vt_data.push(v_mat[(c, j)]);
        }
    }
    let vt = Tensor::from_data(vt_dims, t.div() - ldiv, vt_data)?;

    Ok((u, s, vt))
}

/// Untruncated SVD split of `t` after matricizing its first `ldims` axes,
/// returning `(U, S, Vᵀ)`. `U` carries the target divergence `ldiv` and
/// `Vᵀ` the remainder.
pub fn svd(t: &Tensor, ldims: usize, ldiv: i64) -> Result<(Tensor, Tensor, Tensor)> {
    let (m, n) = matricize(t, ldims)?;
    let (u_mat, svals, v_mat) = backend_svd(t, m, n)?;
    let d = svals.len();
    pack_factors(t, ldims, ldiv, &u_mat, &svals, &v_mat, m, n, d)
}

/// Truncated SVD split with target truncation error and kept-dimension
/// bounds `[dmin, dmax]`.
///
/// Singular values are discarded from the tail while the discarded weight
/// `Σ σ²` stays within `trunc_err` of the total; the kept dimension is
/// then clamped into `[dmin, dmax]` and the actual truncation error is
/// recomputed for the final choice.
pub fn truncated_svd(
    t: &Tensor,
    ldims: usize,
    ldiv: i64,
    trunc_err: f64,
    dmin: usize,
    dmax: usize,
) -> Result<SvdOutcome> {
    let (m, n) = matricize(t, ldims)?;
    let (u_mat, svals, v_mat) = backend_svd(t, m, n)?;
    let kk = svals.len();
    if kk == 0 {
        return Err(TensorError::Empty);
    }

    let total: f64 = svals.iter().map(|s| s * s).sum();
    let mut d = kk;
    if total > 0.0 {
        let budget = trunc_err * total;
        let mut discarded = 0.0;
        for i in (0..kk).rev() {
            let next = discarded + svals[i] * svals[i];
            if next > budget {
                break;
            }
            discarded = next;
            d = i;
        }
    }
    let d = d.max(dmin).min(dmax).min(kk).max(1);

    let actual_trunc_err = if total > 0.0 {
        svals[d..].iter().map(|s| s * s).sum::<f64>() / total
    } else {
        0.0
    };

    let (u, s, vt) = pack_factors(t, ldims, ldiv, &u_mat, &svals, &v_mat, m, n, d)?;
    Ok(SvdOutcome {
        u,
        s,
        vt,
        trunc_err: actual_trunc_err,
        d,
    })
}
