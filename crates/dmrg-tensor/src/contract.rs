//! Tensor contraction over explicit axis pairs.

use crate::error::{Result, TensorError};
use crate::tensor::Tensor;
use faer::linalg::matmul::matmul as faer_matmul;
use faer::{Accum, Par};

/// Contract `a` and `b` over the paired axes `axes_a[k] ↔ axes_b[k]`.
///
/// The result's axes are the free axes of `a` in their original order,
/// followed by the free axes of `b` in their original order. Its
/// divergence is the sum of the operands' divergences.
///
/// Contracting every axis of both operands yields a rank-0 tensor.
pub fn contract(a: &Tensor, b: &Tensor, axes_a: &[usize], axes_b: &[usize]) -> Result<Tensor> {
    if axes_a.len() != axes_b.len() {
        return Err(TensorError::ShapeMismatch {
            message: format!(
                "{} contracted axes on the left vs {} on the right",
                axes_a.len(),
                axes_b.len()
            ),
        });
    }
    for (&ax_a, &ax_b) in axes_a.iter().zip(axes_b.iter()) {
        if ax_a >= a.rank() {
            return Err(TensorError::AxisOutOfBounds {
                axis: ax_a,
                rank: a.rank(),
            });
        }
        if ax_b >= b.rank() {
            return Err(TensorError::AxisOutOfBounds {
                axis: ax_b,
                rank: b.rank(),
            });
        }
        if a.dim(ax_a) != b.dim(ax_b) {
            return Err(TensorError::ShapeMismatch {
                message: format!(
                    "contracted axis pair ({}, {}) has sizes {} and {}",
                    ax_a,
                    ax_b,
                    a.dim(ax_a),
                    b.dim(ax_b)
                ),
            });
        }
    }

    let free_a: Vec<usize> = (0..a.rank()).filter(|i| !axes_a.contains(i)).collect();
    let free_b: Vec<usize> = (0..b.rank()).filter(|i| !axes_b.contains(i)).collect();
    if free_a.len() + axes_a.len() != a.rank() || free_b.len() + axes_b.len() != b.rank() {
        return Err(TensorError::ShapeMismatch {
            message: "duplicate contracted axis".to_string(),
        });
    }

    // Move contracted axes to the end of `a` and the front of `b`, in the
    // paired order, so the contraction becomes a single GEMM.
    let perm_a: Vec<usize> = free_a.iter().chain(axes_a.iter()).copied().collect();
    let perm_b: Vec<usize> = axes_b.iter().chain(free_b.iter()).copied().collect();
    let a_perm = a.transpose(&perm_a)?;
    let b_perm = b.transpose(&perm_b)?;

    let m: usize = free_a.iter().map(|&i| a.dim(i)).product();
    let k: usize = axes_a.iter().map(|&i| a.dim(i)).product();
    let n: usize = free_b.iter().map(|&i| b.dim(i)).product();

    let mut out_dims: Vec<usize> = free_a.iter().map(|&i| a.dim(i)).collect();
    out_dims.extend(free_b.iter().map(|&i| b.dim(i)));
    let mut out = Tensor::new(out_dims, a.div() + b.div());
    if m == 0 || n == 0 {
        return Ok(out);
    }
    if k == 0 {
        return Ok(out);
    }

    // Row-major GEMM through raw faer views: row_stride = number of
    // columns, col_stride = 1.
    let a_mat = unsafe { faer::MatRef::from_raw_parts(a_perm.data().as_ptr(), m, k, k as isize, 1) };
    let b_mat = unsafe { faer::MatRef::from_raw_parts(b_perm.data().as_ptr(), k, n, n as isize, 1) };
    let mut c_mat = unsafe {
        faer::MatMut::from_raw_parts_mut(out.data_mut().as_mut_ptr(), m, n, n as isize, 1)
    };
    faer_matmul(&mut c_mat, Accum::Replace, a_mat, b_mat, 1.0f64, Par::Seq);

    Ok(out)
}
