//! End-to-end two-site DMRG runs on small chains.

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use dmrg_algo::{DmrgExecutor, ExecutorStatus, LanczosParams, SweepParams};
use dmrg_mps::{CanoType, FiniteMps};
use dmrg_tensor::contract;
use tempfile::TempDir;

fn params_in(dir: &TempDir, sweeps: usize, dmax: usize) -> SweepParams {
    SweepParams::new(sweeps, 1, dmax, 1e-9, LanczosParams::new(1e-10, 100))
        .with_mps_path(dir.path().join("mps"))
        .with_temp_path(dir.path().join(".temp"))
}

#[test]
fn test_zero_hamiltonian_two_sites() {
    let dir = TempDir::new().unwrap();
    let params = params_in(&dir, 1, 8);
    prepare_random_mps(&[2, 2], 8, 1, &params.mps_path);

    let mut executor = DmrgExecutor::new(zero_hamiltonian_mpo(2), params).unwrap();
    let e0 = executor.execute().unwrap();
    assert_abs_diff_eq!(e0, 0.0, epsilon = 1e-12);
    assert_eq!(executor.status(), ExecutorStatus::Finished);
}

#[test]
fn test_identity_hamiltonian_two_sites() {
    // Three sweeps over the single bond: the degenerate chain is swept
    // repeatedly, rereading the boundary groups and the dumped center
    // tensor each time, and the energy must hold steady at 1.
    let dir = TempDir::new().unwrap();
    let params = params_in(&dir, 3, 8);
    prepare_random_mps(&[2, 2], 8, 2, &params.mps_path);

    let mut executor = DmrgExecutor::new(identity_mpo(2), params).unwrap();
    let e0 = executor.execute().unwrap();
    assert_abs_diff_eq!(e0, 1.0, epsilon = 1e-10);
    let energies = executor.sweep_energies();
    assert_eq!(energies.len(), 3);
    for &e in energies {
        assert_abs_diff_eq!(e, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn test_tfi_small_chain_vs_dense() {
    let n = 6;
    let dir = TempDir::new().unwrap();
    let params = params_in(&dir, 3, 16);
    prepare_random_mps(&vec![2; n], 16, 3, &params.mps_path);

    let e0 = dmrg_algo::finite_dmrg(tfi_mpo(n, 1.0, 1.0), params).unwrap();
    let reference = dense_ground_energy(&dense_tfi(n, 1.0, 1.0));
    assert_abs_diff_eq!(e0, reference, epsilon = 1e-8);
}

#[test]
fn test_tfi_critical_chain_matches_jordan_wigner() {
    let n = 10;
    let dir = TempDir::new().unwrap();
    let params = SweepParams::new(4, 1, 64, 1e-9, LanczosParams::new(1e-10, 100))
        .with_mps_path(dir.path().join("mps"))
        .with_temp_path(dir.path().join(".temp"));
    prepare_random_mps(&vec![2; n], 64, 4, &params.mps_path);

    let e0 = dmrg_algo::finite_dmrg(tfi_mpo(n, 1.0, 1.0), params).unwrap();
    assert_abs_diff_eq!(e0, tfi_critical_exact_energy(n), epsilon = 1e-6);
}

#[test]
fn test_sweep_energies_do_not_increase() {
    let n = 8;
    let dir = TempDir::new().unwrap();
    let params = params_in(&dir, 4, 16);
    prepare_random_mps(&vec![2; n], 16, 5, &params.mps_path);

    let mut executor = DmrgExecutor::new(tfi_mpo(n, 1.0, 0.5), params).unwrap();
    executor.execute().unwrap();
    let energies = executor.sweep_energies();
    assert_eq!(energies.len(), 4);
    let tol = 40.0 * executor.sweep_params.lancz_params.error;
    for pair in energies.windows(2) {
        assert!(
            pair[1] <= pair[0] + tol,
            "energy increased across sweeps: {} -> {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_final_state_is_canonical_and_normalized() {
    let n = 6;
    let dir = TempDir::new().unwrap();
    let params = params_in(&dir, 2, 16);
    prepare_random_mps(&vec![2; n], 16, 6, &params.mps_path);

    let mut executor = DmrgExecutor::new(tfi_mpo(n, 1.0, 1.0), params).unwrap();
    executor.execute().unwrap();

    // After a full sweep the center sits one site in from the left
    // boundary; everything is on disk.
    let mut mps = FiniteMps::new(&vec![2; n]);
    mps.load(&executor.sweep_params.mps_path).unwrap();

    // Site 0 is left-isometric, sites right of the center are
    // right-isometric.
    let t0 = mps.ten(0).unwrap();
    let gram = contract(t0, t0, &[0, 1], &[0, 1]).unwrap();
    for i in 0..gram.dim(0) {
        for j in 0..gram.dim(1) {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(gram.get(&[i, j]), expected, epsilon = 1e-9);
        }
    }
    for site in 2..n {
        let t = mps.ten(site).unwrap();
        let gram = contract(t, t, &[1, 2], &[1, 2]).unwrap();
        for i in 0..gram.dim(0) {
            for j in 0..gram.dim(1) {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(gram.get(&[i, j]), expected, epsilon = 1e-9);
            }
        }
    }

    // Norm is stable to within N * trunc_err.
    let norm = mps.norm().unwrap();
    assert_abs_diff_eq!(norm, 1.0, epsilon = n as f64 * 1e-9 + 1e-10);
}

#[test]
fn test_restart_matches_single_run() {
    let n = 6;
    let mpo = tfi_mpo(n, 1.0, 1.0);

    // Single 4-sweep run.
    let dir_a = TempDir::new().unwrap();
    let params_a = params_in(&dir_a, 4, 16);
    prepare_random_mps(&vec![2; n], 16, 7, &params_a.mps_path);
    let e_single = dmrg_algo::finite_dmrg(mpo.clone(), params_a).unwrap();

    // 2 sweeps, tear down, then 2 more from the on-disk state.
    let dir_b = TempDir::new().unwrap();
    let params_b = params_in(&dir_b, 2, 16);
    prepare_random_mps(&vec![2; n], 16, 7, &params_b.mps_path);
    {
        let mut first = DmrgExecutor::new(mpo.clone(), params_b.clone()).unwrap();
        first.execute().unwrap();
    }
    let e_restart = {
        let mut second = DmrgExecutor::new(mpo, params_b).unwrap();
        second.execute().unwrap()
    };

    assert_abs_diff_eq!(e_restart, e_single, epsilon = 1e-9);
}

#[test]
fn test_cano_flags_after_two_site_updates() {
    // Drive a short run and inspect the in-memory flags through the
    // executor's MPS accessor: after execute the center is at site 1.
    let n = 4;
    let dir = TempDir::new().unwrap();
    let params = params_in(&dir, 1, 8);
    prepare_random_mps(&vec![2; n], 8, 8, &params.mps_path);

    let mut executor = DmrgExecutor::new(heisenberg_mpo(n, 1.0), params).unwrap();
    executor.execute().unwrap();
    assert_eq!(executor.mps().center(), Some(1));
    assert_eq!(executor.mps().cano_type(0), CanoType::Left);
    for site in 2..n {
        assert_eq!(executor.mps().cano_type(site), CanoType::Right);
    }
}
