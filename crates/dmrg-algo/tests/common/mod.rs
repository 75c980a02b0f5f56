//! Shared test support: spin-½ operators, matrix-represented MPOs for
//! standard chains, initial-state preparation, and dense references.
#![allow(dead_code)]

use dmrg_mps::{FiniteMps, MatReprMpo, SparseOpMat};
use dmrg_tensor::Tensor;
use std::path::Path;

pub fn op2(m: [[f64; 2]; 2]) -> Tensor {
    Tensor::from_data(vec![2, 2], 0, vec![m[0][0], m[0][1], m[1][0], m[1][1]]).unwrap()
}

pub fn eye2() -> Tensor {
    op2([[1.0, 0.0], [0.0, 1.0]])
}

pub fn pauli_x() -> Tensor {
    op2([[0.0, 1.0], [1.0, 0.0]])
}

pub fn pauli_z() -> Tensor {
    op2([[1.0, 0.0], [0.0, -1.0]])
}

pub fn s_plus() -> Tensor {
    op2([[0.0, 1.0], [0.0, 0.0]])
}

pub fn s_minus() -> Tensor {
    op2([[0.0, 0.0], [1.0, 0.0]])
}

pub fn s_z() -> Tensor {
    op2([[0.5, 0.0], [0.0, -0.5]])
}

fn scaled(t: &Tensor, c: f64) -> Tensor {
    let data = t.data().iter().map(|x| c * x).collect();
    Tensor::from_data(t.dims().to_vec(), t.div(), data).unwrap()
}

/// MPO whose single entry per site is the numerically zero operator:
/// `H = 0`.
pub fn zero_hamiltonian_mpo(n: usize) -> MatReprMpo {
    let sites = (0..n)
        .map(|_| {
            let mut w = SparseOpMat::new(1, 1);
            w.set(0, 0, Tensor::new(vec![2, 2], 0));
            w
        })
        .collect();
    MatReprMpo::new(sites).unwrap()
}

/// MPO of the identity operator: `H = 1`.
pub fn identity_mpo(n: usize) -> MatReprMpo {
    let sites = (0..n)
        .map(|_| {
            let mut w = SparseOpMat::new(1, 1);
            w.set(0, 0, eye2());
            w
        })
        .collect();
    MatReprMpo::new(sites).unwrap()
}

/// Open-chain transverse-field Ising model,
/// `H = −J Σ σˣᵢ σˣᵢ₊₁ − h Σ σᶻᵢ`.
pub fn tfi_mpo(n: usize, j: f64, h: f64) -> MatReprMpo {
    assert!(n >= 2);
    let mut sites = Vec::with_capacity(n);

    let mut w0 = SparseOpMat::new(1, 3);
    w0.set(0, 0, scaled(&pauli_z(), -h));
    w0.set(0, 1, scaled(&pauli_x(), -j));
    w0.set(0, 2, eye2());
    sites.push(w0);

    for _ in 1..n - 1 {
        let mut w = SparseOpMat::new(3, 3);
        w.set(0, 0, eye2());
        w.set(1, 0, pauli_x());
        w.set(2, 0, scaled(&pauli_z(), -h));
        w.set(2, 1, scaled(&pauli_x(), -j));
        w.set(2, 2, eye2());
        sites.push(w);
    }

    let mut wn = SparseOpMat::new(3, 1);
    wn.set(0, 0, eye2());
    wn.set(1, 0, pauli_x());
    wn.set(2, 0, scaled(&pauli_z(), -h));
    sites.push(wn);

    MatReprMpo::new(sites).unwrap()
}

/// Ground-state energy of the critical open TFI chain (`J = h = 1`) from
/// the Jordan–Wigner solution.
pub fn tfi_critical_exact_energy(n: usize) -> f64 {
    let arg = std::f64::consts::PI / (2.0 * (2.0 * n as f64 + 1.0));
    1.0 - 1.0 / arg.sin()
}

/// Open-chain spin-½ Heisenberg model,
/// `H = J Σ [Sᶻᵢ Sᶻᵢ₊₁ + ½(S⁺ᵢ S⁻ᵢ₊₁ + S⁻ᵢ S⁺ᵢ₊₁)]`.
pub fn heisenberg_mpo(n: usize, j: f64) -> MatReprMpo {
    assert!(n >= 2);
    let mut sites = Vec::with_capacity(n);

    let mut w0 = SparseOpMat::new(1, 5);
    w0.set(0, 1, scaled(&s_plus(), 0.5 * j));
    w0.set(0, 2, scaled(&s_minus(), 0.5 * j));
    w0.set(0, 3, scaled(&s_z(), j));
    w0.set(0, 4, eye2());
    sites.push(w0);

    for _ in 1..n - 1 {
        let mut w = SparseOpMat::new(5, 5);
        w.set(0, 0, eye2());
        w.set(1, 0, s_minus());
        w.set(2, 0, s_plus());
        w.set(3, 0, s_z());
        w.set(4, 1, scaled(&s_plus(), 0.5 * j));
        w.set(4, 2, scaled(&s_minus(), 0.5 * j));
        w.set(4, 3, scaled(&s_z(), j));
        w.set(4, 4, eye2());
        sites.push(w);
    }

    let mut wn = SparseOpMat::new(5, 1);
    wn.set(0, 0, eye2());
    wn.set(1, 0, s_minus());
    wn.set(2, 0, s_plus());
    wn.set(3, 0, s_z());
    sites.push(wn);

    MatReprMpo::new(sites).unwrap()
}

/// Write a reproducible random MPS to `mps_path`, right-canonicalized
/// with the center (normalized) at the left boundary.
pub fn prepare_random_mps(site_dims: &[usize], dmax: usize, seed: u64, mps_path: &Path) {
    let mut mps = FiniteMps::random(site_dims, dmax, seed);
    mps.centralize(0).unwrap();
    mps.ten_mut(0).unwrap().normalize();
    mps.dump(mps_path, true).unwrap();
}

/// Dense open-chain Heisenberg Hamiltonian on `n` spins (bit `i` of the
/// basis index is site `i`, `0` = up).
pub fn dense_heisenberg(n: usize, j: f64) -> faer::Mat<f64> {
    let dim = 1usize << n;
    let mut h = faer::Mat::<f64>::zeros(dim, dim);
    for b in 0..dim {
        for i in 0..n - 1 {
            let si = (b >> i) & 1;
            let sj = (b >> (i + 1)) & 1;
            let sz = if si == sj { 0.25 } else { -0.25 };
            h[(b, b)] += j * sz;
            if si != sj {
                let flipped = b ^ (1 << i) ^ (1 << (i + 1));
                h[(flipped, b)] += 0.5 * j;
            }
        }
    }
    h
}

/// Dense open-chain transverse-field Ising Hamiltonian.
pub fn dense_tfi(n: usize, j: f64, hfield: f64) -> faer::Mat<f64> {
    let dim = 1usize << n;
    let mut h = faer::Mat::<f64>::zeros(dim, dim);
    for b in 0..dim {
        for i in 0..n {
            let si = (b >> i) & 1;
            h[(b, b)] += -hfield * if si == 0 { 1.0 } else { -1.0 };
        }
        for i in 0..n - 1 {
            let flipped = b ^ (1 << i) ^ (1 << (i + 1));
            h[(flipped, b)] += -j;
        }
    }
    h
}

/// Smallest eigenvalue of a dense symmetric matrix.
pub fn dense_ground_energy(h: &faer::Mat<f64>) -> f64 {
    let evd = h.as_ref().self_adjoint_eigen(faer::Side::Lower).unwrap();
    let s = evd.S().column_vector();
    (0..h.nrows()).map(|i| s[i]).fold(f64::INFINITY, f64::min)
}
