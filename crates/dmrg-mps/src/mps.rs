//! The finite matrix product state container.

use crate::error::{MpsError, Result};
use dmrg_tensor::{contract, svd, Tensor};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

/// Base name of per-site MPS tensor files.
pub const MPS_TEN_BASE_NAME: &str = "mps_ten";
/// File suffix shared by all tensor files.
pub const TEN_FILE_SUFFIX: &str = "dmrgten";

/// File name of the MPS tensor at `idx` under `mps_path`.
pub fn gen_mps_ten_name(mps_path: &Path, idx: usize) -> PathBuf {
    mps_path.join(format!("{MPS_TEN_BASE_NAME}{idx}.{TEN_FILE_SUFFIX}"))
}

/// Canonical role of one MPS site tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanoType {
    /// Not canonical.
    None,
    /// Left-isometric.
    Left,
    /// Right-isometric.
    Right,
}

/// A finite matrix product state.
///
/// Site tensors are uniformly rank 3 `(left bond, physical, right bond)`
/// with trivial size-1 bonds at the chain ends. Each slot may be paged out
/// to disk (`None`). The container tracks the canonical center
/// (`None` = uncentralized) and a per-site canonical flag; any mutating
/// tensor access resets both.
#[derive(Debug, Clone)]
pub struct FiniteMps {
    tens: Vec<Option<Tensor>>,
    cano: Vec<CanoType>,
    center: Option<usize>,
    site_dims: Vec<usize>,
}

impl FiniteMps {
    /// Create an empty (all paged-out) MPS over the given physical
    /// dimensions.
    pub fn new(site_dims: &[usize]) -> Self {
        let n = site_dims.len();
        Self {
            tens: vec![None; n],
            cano: vec![CanoType::None; n],
            center: None,
            site_dims: site_dims.to_vec(),
        }
    }

    /// Create a random MPS with reproducible entries.
    ///
    /// Bond dimensions are capped by `dmax` and by the exact entanglement
    /// bound from either chain end. The state is uncentralized; callers
    /// typically follow with [`FiniteMps::centralize`].
    pub fn random(site_dims: &[usize], dmax: usize, seed: u64) -> Self {
        let n = site_dims.len();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        // bonds[i] sits between sites i-1 and i; bonds[0] = bonds[n] = 1.
        let mut bonds = vec![1usize; n + 1];
        let mut left = 1usize;
        for i in 0..n {
            left = (left * site_dims[i]).min(dmax);
            bonds[i + 1] = left;
        }
        let mut right = 1usize;
        for i in (0..n).rev() {
            right = (right * site_dims[i]).min(dmax);
            bonds[i] = bonds[i].min(right);
        }
        bonds[0] = 1;
        bonds[n] = 1;

        let mut mps = Self::new(site_dims);
        for i in 0..n {
            let mut t = Tensor::new(vec![bonds[i], site_dims[i], bonds[i + 1]], 0);
            for x in t.data_mut() {
                *x = rng.random_range(-1.0..1.0);
            }
            mps.tens[i] = Some(t);
        }
        mps
    }

    /// Chain length.
    pub fn len(&self) -> usize {
        self.tens.len()
    }

    /// Whether the chain has no sites.
    pub fn is_empty(&self) -> bool {
        self.tens.is_empty()
    }

    /// Physical dimensions of the chain.
    pub fn site_dims(&self) -> &[usize] {
        &self.site_dims
    }

    /// Current canonical center, `None` when uncentralized.
    pub fn center(&self) -> Option<usize> {
        self.center
    }

    /// Canonical role of the site tensor at `i`.
    pub fn cano_type(&self, i: usize) -> CanoType {
        self.cano[i]
    }

    /// Whether the tensor at `i` is resident in memory.
    pub fn is_resident(&self, i: usize) -> bool {
        self.tens.get(i).is_some_and(|t| t.is_some())
    }

    fn check_site(&self, i: usize) -> Result<()> {
        if i >= self.len() {
            return Err(MpsError::SiteOutOfBounds {
                site: i,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Read-only borrow of the site tensor at `i`. Never mutates canonical
    /// metadata.
    pub fn ten(&self, i: usize) -> Result<&Tensor> {
        self.check_site(i)?;
        self.tens[i]
            .as_ref()
            .ok_or(MpsError::NotResident { site: i })
    }

    /// Mutable borrow of the site tensor at `i`. Resets the site's
    /// canonical flag and the tracked center.
    pub fn ten_mut(&mut self, i: usize) -> Result<&mut Tensor> {
        self.check_site(i)?;
        self.cano[i] = CanoType::None;
        self.center = None;
        self.tens[i]
            .as_mut()
            .ok_or(MpsError::NotResident { site: i })
    }

    /// Replace the site tensor at `i`. Resets the site's canonical flag
    /// and the tracked center.
    pub fn set_ten(&mut self, i: usize, t: Tensor) -> Result<()> {
        self.check_site(i)?;
        self.tens[i] = Some(t);
        self.cano[i] = CanoType::None;
        self.center = None;
        Ok(())
    }

    /// Install a tensor together with its known canonical role.
    ///
    /// The caller asserts the role; the tracked center is left untouched
    /// (see [`FiniteMps::mark_center`]).
    pub fn set_canonical_ten(&mut self, i: usize, t: Tensor, cano: CanoType) -> Result<()> {
        self.check_site(i)?;
        self.tens[i] = Some(t);
        self.cano[i] = cano;
        Ok(())
    }

    /// Declare site `c` the canonical center. The caller asserts that all
    /// sites left of `c` are left-isometric and all sites right of it are
    /// right-isometric.
    pub fn mark_center(&mut self, c: usize) -> Result<()> {
        self.check_site(c)?;
        self.center = Some(c);
        self.cano[c] = CanoType::None;
        Ok(())
    }

    /// Drop the in-memory tensor at `i` without writing it out.
    pub fn release_ten(&mut self, i: usize) -> Result<()> {
        self.check_site(i)?;
        self.tens[i] = None;
        Ok(())
    }

    /// Canonicalize the chain to `target`.
    ///
    /// Runs a left-canonicalization pass from the leftmost
    /// non-left-canonical site up to `target - 1`, then a
    /// right-canonicalization pass from the rightmost non-right-canonical
    /// site down to `target + 1`. Idempotent when already centered.
    pub fn centralize(&mut self, target: usize) -> Result<()> {
        self.check_site(target)?;
        let tail = self.len() - 1;
        if target != 0 {
            self.left_canonicalize_to(target - 1)?;
        }
        if target != tail {
            self.right_canonicalize_to(target + 1)?;
        }
        self.center = Some(target);
        Ok(())
    }

    fn left_canonicalize_to(&mut self, stop: usize) -> Result<()> {
        let mut start = None;
        for i in 0..=stop {
            if self.cano[i] != CanoType::Left {
                start = Some(i);
                break;
            }
        }
        let Some(start) = start else {
            return Ok(());
        };
        for i in start..=stop {
            self.left_canonicalize_ten(i)?;
        }
        Ok(())
    }

    fn right_canonicalize_to(&mut self, stop: usize) -> Result<()> {
        let tail = self.len() - 1;
        let mut start = None;
        for i in (stop..=tail).rev() {
            if self.cano[i] != CanoType::Right {
                start = Some(i);
                break;
            }
        }
        let Some(start) = start else {
            return Ok(());
        };
        for i in (stop..=start).rev() {
            self.right_canonicalize_ten(i)?;
        }
        Ok(())
    }

    /// SVD-split site `i` into a left isometry, absorbing `S·Vᵀ` into site
    /// `i + 1`. Leaves the chain uncentralized.
    pub fn left_canonicalize_ten(&mut self, i: usize) -> Result<()> {
        if i + 1 >= self.len() {
            return Err(MpsError::InvalidOperation {
                message: format!("cannot left-canonicalize the last site {i}"),
            });
        }
        let ldiv = self.ten(i)?.div();
        let (u, s, vt) = svd(self.ten(i)?, 2, ldiv)?;
        let sv = contract(&s, &vt, &[1], &[0])?;
        let next = contract(&sv, self.ten(i + 1)?, &[1], &[0])?;
        self.tens[i] = Some(u);
        self.tens[i + 1] = Some(next);
        self.cano[i] = CanoType::Left;
        self.cano[i + 1] = CanoType::None;
        self.center = None;
        Ok(())
    }

    /// SVD-split site `i` into a right isometry, absorbing `U·S` into site
    /// `i - 1`. Leaves the chain uncentralized.
    pub fn right_canonicalize_ten(&mut self, i: usize) -> Result<()> {
        if i == 0 {
            return Err(MpsError::InvalidOperation {
                message: "cannot right-canonicalize the first site".to_string(),
            });
        }
        let (u, s, vt) = svd(self.ten(i)?, 1, 0)?;
        let us = contract(&u, &s, &[1], &[0])?;
        let prev = contract(self.ten(i - 1)?, &us, &[2], &[0])?;
        self.tens[i] = Some(vt);
        self.tens[i - 1] = Some(prev);
        self.cano[i] = CanoType::Right;
        self.cano[i - 1] = CanoType::None;
        self.center = None;
        Ok(())
    }

    /// Load the site tensor at `i` from `path`.
    pub fn load_ten(&mut self, i: usize, path: &Path) -> Result<()> {
        self.check_site(i)?;
        self.tens[i] = Some(Tensor::load(path)?);
        Ok(())
    }

    /// Dump the site tensor at `i` to `path`, optionally releasing the
    /// in-memory copy.
    pub fn dump_ten(&mut self, i: usize, path: &Path, release: bool) -> Result<()> {
        self.check_site(i)?;
        let t = self.tens[i]
            .as_ref()
            .ok_or(MpsError::NotResident { site: i })?;
        t.dump(path)?;
        if release {
            self.tens[i] = None;
        }
        Ok(())
    }

    /// Dump every site tensor under `mps_path` (created on demand).
    pub fn dump(&mut self, mps_path: &Path, release: bool) -> Result<()> {
        std::fs::create_dir_all(mps_path)?;
        for i in 0..self.len() {
            self.dump_ten(i, &gen_mps_ten_name(mps_path, i), release)?;
        }
        Ok(())
    }

    /// Load every site tensor from `mps_path`.
    pub fn load(&mut self, mps_path: &Path) -> Result<()> {
        for i in 0..self.len() {
            self.load_ten(i, &gen_mps_ten_name(mps_path, i))?;
        }
        Ok(())
    }

    /// The state norm, by transfer-matrix contraction over all resident
    /// site tensors.
    pub fn norm(&self) -> Result<f64> {
        if self.is_empty() {
            return Ok(0.0);
        }
        let mut transfer = Tensor::from_data(vec![1, 1], 0, vec![1.0])?;
        for i in 0..self.len() {
            let a = self.ten(i)?;
            let t = contract(&transfer, a, &[0], &[0])?;
            transfer = contract(&t, a, &[0, 1], &[0, 1])?;
        }
        Ok(transfer.get(&[0, 0]).max(0.0).sqrt())
    }
}
