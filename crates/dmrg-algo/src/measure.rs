//! Diagnostics derived from the singular spectrum.

use dmrg_tensor::Tensor;

/// Von Neumann entanglement entropy `−Σ sᵢ² ln sᵢ²` of a diagonal
/// singular-value tensor. Zero singular values contribute nothing.
pub fn entanglement_entropy(s: &Tensor) -> f64 {
    let d = s.dim(0);
    let mut ee = 0.0;
    for i in 0..d {
        let sv = s.get(&[i, i]);
        let p = sv * sv;
        if p > 0.0 {
            ee -= p * p.ln();
        }
    }
    ee
}
