//! The dense dynamic-rank tensor type.

use crate::error::{Result, TensorError};
use serde::{Deserialize, Serialize};

/// A dense, dynamic-rank tensor of `f64` elements in row-major order.
///
/// Each tensor carries a U(1) charge divergence `div` describing its net
/// charge flow. The divergence participates in the algebra as metadata:
/// contraction adds divergences, [`Tensor::dag`] negates, and the SVD
/// splits the divergence between its factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    dims: Vec<usize>,
    div: i64,
    data: Vec<f64>,
}

impl Tensor {
    /// Create a zero-filled tensor with the given shape and divergence.
    pub fn new(dims: Vec<usize>, div: i64) -> Self {
        let size = dims.iter().product();
        Self {
            dims,
            div,
            data: vec![0.0; size],
        }
    }

    /// Create a tensor from flat row-major data.
    pub fn from_data(dims: Vec<usize>, div: i64, data: Vec<f64>) -> Result<Self> {
        let size: usize = dims.iter().product();
        if data.len() != size {
            return Err(TensorError::ShapeMismatch {
                message: format!(
                    "data length {} does not match shape {:?} (size {})",
                    data.len(),
                    dims,
                    size
                ),
            });
        }
        Ok(Self { dims, div, data })
    }

    /// Create a rank-0 tensor holding a single scalar.
    pub fn scalar(value: f64) -> Self {
        Self {
            dims: Vec::new(),
            div: 0,
            data: vec![value],
        }
    }

    /// Create a zero tensor with the same shape and divergence as `other`.
    pub fn zeros_like(other: &Tensor) -> Self {
        Self::new(other.dims.clone(), other.div)
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// The shape.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Size of one axis.
    pub fn dim(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The charge divergence.
    pub fn div(&self) -> i64 {
        self.div
    }

    /// Replace the charge divergence.
    pub fn set_div(&mut self, div: i64) {
        self.div = div;
    }

    /// Flat row-major element slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat row-major element slice.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    fn flat_index(&self, idx: &[usize]) -> usize {
        debug_assert_eq!(idx.len(), self.dims.len());
        let mut flat = 0;
        for (i, &ix) in idx.iter().enumerate() {
            debug_assert!(ix < self.dims[i]);
            flat = flat * self.dims[i] + ix;
        }
        flat
    }

    /// Element access by multi-index.
    pub fn get(&self, idx: &[usize]) -> f64 {
        self.data[self.flat_index(idx)]
    }

    /// Element assignment by multi-index.
    pub fn set(&mut self, idx: &[usize], value: f64) {
        let flat = self.flat_index(idx);
        self.data[flat] = value;
    }

    /// Permute the axes according to `perm`; `perm[k]` is the old axis that
    /// becomes the new axis `k`.
    pub fn transpose(&self, perm: &[usize]) -> Result<Tensor> {
        let rank = self.rank();
        if perm.len() != rank {
            return Err(TensorError::ShapeMismatch {
                message: format!("permutation length {} != rank {}", perm.len(), rank),
            });
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank {
                return Err(TensorError::AxisOutOfBounds { axis: p, rank });
            }
            if seen[p] {
                return Err(TensorError::ShapeMismatch {
                    message: format!("duplicate axis {} in permutation", p),
                });
            }
            seen[p] = true;
        }
        if rank == 0 || perm.iter().enumerate().all(|(k, &p)| k == p) {
            return Ok(self.clone());
        }

        let old_strides = row_major_strides(&self.dims);
        let new_dims: Vec<usize> = perm.iter().map(|&p| self.dims[p]).collect();
        // Stride of each new axis in the old flat layout.
        let carried_strides: Vec<usize> = perm.iter().map(|&p| old_strides[p]).collect();

        let mut out = vec![0.0; self.data.len()];
        let mut idx = vec![0usize; rank];
        let mut old_flat = 0usize;
        for slot in out.iter_mut() {
            *slot = self.data[old_flat];
            // Odometer increment over the new index, tracking the old offset.
            for ax in (0..rank).rev() {
                idx[ax] += 1;
                old_flat += carried_strides[ax];
                if idx[ax] < new_dims[ax] {
                    break;
                }
                old_flat -= carried_strides[ax] * new_dims[ax];
                idx[ax] = 0;
            }
        }
        Ok(Tensor {
            dims: new_dims,
            div: self.div,
            data: out,
        })
    }

    /// Hermitian conjugate. For real elements the data is unchanged and
    /// only the divergence flips sign.
    pub fn dag(&self) -> Tensor {
        Tensor {
            dims: self.dims.clone(),
            div: -self.div,
            data: self.data.clone(),
        }
    }

    /// The 2-norm over all elements.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Scale to unit norm, returning the previous norm. A zero tensor is
    /// left untouched and `0.0` is returned.
    pub fn normalize(&mut self) -> f64 {
        let norm = self.norm();
        if norm > 0.0 {
            let inv = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv;
            }
        }
        norm
    }

    /// Full-axis inner product `⟨other|self⟩` of two equally shaped
    /// tensors. For real elements this is the plain element-wise dot
    /// product.
    pub fn scalar_product(&self, other: &Tensor) -> Result<f64> {
        if self.dims != other.dims {
            return Err(TensorError::ShapeMismatch {
                message: format!(
                    "scalar product of shapes {:?} and {:?}",
                    self.dims, other.dims
                ),
            });
        }
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum())
    }
}

/// Row-major strides for a shape.
pub(crate) fn row_major_strides(dims: &[usize]) -> Vec<usize> {
    let rank = dims.len();
    let mut strides = vec![1usize; rank];
    for i in (0..rank.saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

/// Compute `out = beta * out + Σ coefs[i] * tensors[i]` in place.
///
/// All tensors must share the shape of `out`.
pub fn linear_combine(
    coefs: &[f64],
    tensors: &[&Tensor],
    beta: f64,
    out: &mut Tensor,
) -> Result<()> {
    if coefs.len() != tensors.len() {
        return Err(TensorError::ShapeMismatch {
            message: format!(
                "{} coefficients for {} tensors",
                coefs.len(),
                tensors.len()
            ),
        });
    }
    for t in tensors {
        if t.dims() != out.dims() {
            return Err(TensorError::ShapeMismatch {
                message: format!(
                    "linear combination of shape {:?} into shape {:?}",
                    t.dims(),
                    out.dims()
                ),
            });
        }
    }
    if beta == 0.0 {
        out.data.fill(0.0);
    } else if beta != 1.0 {
        for x in &mut out.data {
            *x *= beta;
        }
    }
    for (&c, t) in coefs.iter().zip(tensors.iter()) {
        for (o, &x) in out.data.iter_mut().zip(t.data.iter()) {
            *o += c * x;
        }
    }
    Ok(())
}
