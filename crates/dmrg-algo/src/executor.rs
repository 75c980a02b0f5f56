//! The two-site DMRG sweep executor.

use crate::grow::{update_left_block_ops, update_right_block_ops};
use crate::lanczos::lanczos_solver;
use crate::measure::entanglement_entropy;
use crate::params::SweepParams;
use crate::terms::{assemble_eff_ham_terms, eff_ham_terms_mul_two_site_state};
use anyhow::{ensure, Context, Result};
use dmrg_mps::{
    gen_mps_ten_name, read_and_remove_operator_group, read_operator_group,
    trivial_operator_group, write_operator_group, BlockSide, CanoType, FiniteMps, MatReprMpo,
    OperatorGroup,
};
use dmrg_tensor::{contract, truncated_svd};
use std::time::Instant;

/// Lifecycle state of a [`DmrgExecutor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorStatus {
    /// Constructed, not yet run.
    Inited,
    /// Currently sweeping.
    Executing,
    /// Finished; the final energy is available.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Right,
    Left,
}

/// Finite-size two-site DMRG executor.
///
/// The MPS is expected on disk under `sweep_params.mps_path`,
/// right-canonicalized with the center at the left boundary. Environments
/// and finalized site tensors are paged through
/// `sweep_params.temp_path` / `mps_path` so that only the active window
/// is resident.
pub struct DmrgExecutor {
    /// Sweep configuration.
    pub sweep_params: SweepParams,
    n: usize,
    mps: FiniteMps,
    mat_repr_mpo: MatReprMpo,
    e0: f64,
    sweep_energies: Vec<f64>,
    lopg: Vec<OperatorGroup>,
    ropg: Vec<OperatorGroup>,
    left_boundary: usize,
    right_boundary: usize,
    dir: Direction,
    l_site: usize,
    r_site: usize,
    status: ExecutorStatus,
}

impl DmrgExecutor {
    /// Create an executor for the given matrix-represented MPO.
    pub fn new(mat_repr_mpo: MatReprMpo, sweep_params: SweepParams) -> Result<Self> {
        let n = mat_repr_mpo.len();
        ensure!(n >= 2, "DMRG needs at least 2 sites, got {n}");
        let mps = FiniteMps::new(mat_repr_mpo.site_dims());
        Ok(Self {
            sweep_params,
            n,
            mps,
            mat_repr_mpo,
            e0: 0.0,
            sweep_energies: Vec::new(),
            lopg: vec![OperatorGroup::new(); n],
            ropg: vec![OperatorGroup::new(); n],
            left_boundary: 0,
            right_boundary: n - 1,
            dir: Direction::Right,
            l_site: 0,
            r_site: 1,
            status: ExecutorStatus::Inited,
        })
    }

    /// The latest ground-state energy estimate.
    pub fn energy(&self) -> f64 {
        self.e0
    }

    /// Energy reported at the end of each completed sweep.
    pub fn sweep_energies(&self) -> &[f64] {
        &self.sweep_energies
    }

    /// Lifecycle state.
    pub fn status(&self) -> ExecutorStatus {
        self.status
    }

    /// The underlying MPS (tensors resident only within the active
    /// window).
    pub fn mps(&self) -> &FiniteMps {
        &self.mps
    }

    /// Run all sweeps and return the final ground-state energy.
    pub fn execute(&mut self) -> Result<f64> {
        self.status = ExecutorStatus::Executing;
        ensure!(
            self.mps.len() == self.mat_repr_mpo.len(),
            "MPS length {} does not match MPO length {}",
            self.mps.len(),
            self.mat_repr_mpo.len()
        );
        self.dmrg_init()
            .context("DMRG initialization failed (is the initial MPS dumped to mps_path?)")?;

        let head = self.left_boundary + 1;
        let mps_path = self.sweep_params.mps_path.clone();
        self.mps
            .load_ten(head, &gen_mps_ten_name(&mps_path, head))?;
        for sweep in 1..=self.sweep_params.sweeps {
            println!("sweep {sweep}");
            let sweep_timer = Instant::now();
            self.e0 = self.dmrg_sweep()?;
            self.sweep_energies.push(self.e0);
            println!(
                "sweep {sweep} finished in {:.3} s",
                sweep_timer.elapsed().as_secs_f64()
            );
        }
        self.mps
            .dump_ten(head, &gen_mps_ten_name(&mps_path, head), true)?;
        self.status = ExecutorStatus::Finished;
        Ok(self.e0)
    }

    /// Build and persist the right environments by walking the MPO from
    /// the right end, releasing each site tensor after use. Also persists
    /// the trivial boundary groups.
    fn dmrg_init(&mut self) -> Result<()> {
        let mps_path = self.sweep_params.mps_path.clone();
        let temp_path = self.sweep_params.temp_path.clone();
        std::fs::create_dir_all(&temp_path)?;

        write_operator_group(&temp_path, BlockSide::Left, 0, &trivial_operator_group())?;
        write_operator_group(&temp_path, BlockSide::Right, 0, &trivial_operator_group())?;

        let mut grp = trivial_operator_group();
        for site in (self.left_boundary + 2..self.n).rev() {
            self.mps
                .load_ten(site, &gen_mps_ten_name(&mps_path, site))
                .with_context(|| format!("loading MPS tensor {site}"))?;
            grp = update_right_block_ops(&grp, self.mps.ten(site)?, self.mat_repr_mpo.site(site))?;
            write_operator_group(&temp_path, BlockSide::Right, self.n - site, &grp)?;
            self.mps.release_ten(site)?;
        }
        Ok(())
    }

    /// One full rightward-then-leftward pass over the chain.
    fn dmrg_sweep(&mut self) -> Result<f64> {
        if self.n == 2 {
            return self.single_bond_sweep();
        }

        self.dir = Direction::Right;
        for i in self.left_boundary..self.right_boundary - 1 {
            self.l_site = i;
            self.r_site = i + 1;
            self.load_related_tens()?;
            self.e0 = self.two_site_update()?;
            self.dump_related_tens()?;
        }

        self.dir = Direction::Left;
        for i in (self.left_boundary + 2..=self.right_boundary).rev() {
            self.l_site = i - 1;
            self.r_site = i;
            self.load_related_tens()?;
            self.e0 = self.two_site_update()?;
            self.dump_related_tens()?;
        }
        Ok(self.e0)
    }

    /// Degenerate two-site chain: the single bond is optimized once in
    /// each direction with the trivial boundary environments.
    fn single_bond_sweep(&mut self) -> Result<f64> {
        let mps_path = self.sweep_params.mps_path.clone();
        let temp_path = self.sweep_params.temp_path.clone();
        self.l_site = self.left_boundary;
        self.r_site = self.right_boundary;

        self.dir = Direction::Right;
        self.mps
            .load_ten(self.l_site, &gen_mps_ten_name(&mps_path, self.l_site))?;
        self.lopg[0] = read_operator_group(&temp_path, BlockSide::Left, 0)?;
        self.ropg[0] = read_operator_group(&temp_path, BlockSide::Right, 0)?;
        self.e0 = self.two_site_update()?;

        self.dir = Direction::Left;
        self.e0 = self.two_site_update()?;

        self.lopg[1].clear();
        self.ropg[1].clear();
        self.mps
            .dump_ten(self.l_site, &gen_mps_ten_name(&mps_path, self.l_site), false)?;
        Ok(self.e0)
    }

    /// Bring the tensors and block groups adjacent to the active bond
    /// into memory, removing leading-side group files as they are
    /// consumed.
    fn load_related_tens(&mut self) -> Result<()> {
        let mps_path = self.sweep_params.mps_path.clone();
        let temp_path = self.sweep_params.temp_path.clone();
        let (l, r) = (self.l_site, self.r_site);
        match self.dir {
            Direction::Right => {
                let rblock = self.n - 1 - r;
                if l == self.left_boundary {
                    self.mps.load_ten(l, &gen_mps_ten_name(&mps_path, l))?;
                    self.lopg[l] = read_operator_group(&temp_path, BlockSide::Left, l)?;
                    self.ropg[rblock] =
                        read_and_remove_operator_group(&temp_path, BlockSide::Right, rblock)?;
                } else {
                    self.mps.load_ten(r, &gen_mps_ten_name(&mps_path, r))?;
                    self.ropg[rblock] =
                        read_and_remove_operator_group(&temp_path, BlockSide::Right, rblock)?;
                }
            }
            Direction::Left => {
                let rblock = self.n - 1 - r;
                if r == self.right_boundary {
                    self.mps.load_ten(r, &gen_mps_ten_name(&mps_path, r))?;
                    self.ropg[rblock] =
                        read_operator_group(&temp_path, BlockSide::Right, rblock)?;
                    self.lopg[l] =
                        read_and_remove_operator_group(&temp_path, BlockSide::Left, l)?;
                } else {
                    self.mps.load_ten(l, &gen_mps_ten_name(&mps_path, l))?;
                    self.lopg[l] =
                        read_and_remove_operator_group(&temp_path, BlockSide::Left, l)?;
                }
            }
        }
        Ok(())
    }

    /// Evict the stale groups, dump the finalized site tensor, and
    /// persist the freshly grown group.
    fn dump_related_tens(&mut self) -> Result<()> {
        let mps_path = self.sweep_params.mps_path.clone();
        let temp_path = self.sweep_params.temp_path.clone();
        let (l, r) = (self.l_site, self.r_site);
        self.lopg[l].clear();
        self.ropg[self.n - 1 - r].clear();
        match self.dir {
            Direction::Right => {
                self.mps
                    .dump_ten(l, &gen_mps_ten_name(&mps_path, l), true)?;
                write_operator_group(&temp_path, BlockSide::Left, r, &self.lopg[r])?;
            }
            Direction::Left => {
                self.mps
                    .dump_ten(r, &gen_mps_ten_name(&mps_path, r), true)?;
                write_operator_group(
                    &temp_path,
                    BlockSide::Right,
                    self.n - 1 - l,
                    &self.ropg[self.n - 1 - l],
                )?;
            }
        }
        Ok(())
    }

    /// Optimize the active bond: contract the two site tensors, solve for
    /// the lowest eigenpair of the effective Hamiltonian, split by
    /// truncated SVD, reassign the site tensors according to the sweep
    /// direction, and grow the trailing environment.
    fn two_site_update(&mut self) -> Result<f64> {
        let update_timer = Instant::now();
        let (l, r) = (self.l_site, self.r_site);
        let l_block_len = l;
        let r_block_len = self.n - 1 - r;

        let init_state = contract(self.mps.ten(l)?, self.mps.ten(r)?, &[2], &[0])?;

        let lancz_timer = Instant::now();
        let terms = assemble_eff_ham_terms(
            &self.lopg[l_block_len],
            self.mat_repr_mpo.site(l),
            self.mat_repr_mpo.site(r),
            &self.ropg[r_block_len],
        );
        let lancz_res = lanczos_solver(
            |state| Ok(eff_ham_terms_mul_two_site_state(&terms, state)?),
            init_state,
            &self.sweep_params.lancz_params,
        )?;
        let lancz_elapsed = lancz_timer.elapsed();

        let ldiv = self.mps.ten(l)?.div();
        let svd_res = truncated_svd(
            &lancz_res.gs_vec,
            2,
            ldiv,
            self.sweep_params.trunc_err,
            self.sweep_params.dmin,
            self.sweep_params.dmax,
        )?;
        let ee = entanglement_entropy(&svd_res.s);

        match self.dir {
            Direction::Right => {
                let sv = contract(&svd_res.s, &svd_res.vt, &[1], &[0])?;
                self.mps.set_canonical_ten(l, svd_res.u, CanoType::Left)?;
                self.mps.set_canonical_ten(r, sv, CanoType::None)?;
                self.mps.mark_center(r)?;
                self.lopg[l_block_len + 1] = update_left_block_ops(
                    &self.lopg[l_block_len],
                    self.mps.ten(l)?,
                    self.mat_repr_mpo.site(l),
                )?;
            }
            Direction::Left => {
                let us = contract(&svd_res.u, &svd_res.s, &[2], &[0])?;
                self.mps.set_canonical_ten(l, us, CanoType::None)?;
                self.mps
                    .set_canonical_ten(r, svd_res.vt, CanoType::Right)?;
                self.mps.mark_center(l)?;
                self.ropg[r_block_len + 1] = update_right_block_ops(
                    &self.ropg[r_block_len],
                    self.mps.ten(r)?,
                    self.mat_repr_mpo.site(r),
                )?;
            }
        }

        println!(
            "Site ({:4},{:4}) E0 = {:16.12} TruncErr = {:.2e} D = {:5} Iter = {:3} LanczT = {:8.3} TotT = {:8.3} S = {:.7}",
            l,
            r,
            lancz_res.gs_eng,
            svd_res.trunc_err,
            svd_res.d,
            lancz_res.iters,
            lancz_elapsed.as_secs_f64(),
            update_timer.elapsed().as_secs_f64(),
            ee
        );
        Ok(lancz_res.gs_eng)
    }
}

/// Run finite-size DMRG to completion and return the ground-state energy.
pub fn finite_dmrg(mat_repr_mpo: MatReprMpo, sweep_params: SweepParams) -> Result<f64> {
    let mut executor = DmrgExecutor::new(mat_repr_mpo, sweep_params)?;
    executor.execute()
}
