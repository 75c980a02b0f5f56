//! Sweep and solver configuration.

use std::path::PathBuf;

/// Parameters of the Lanczos eigensolver.
#[derive(Debug, Clone, Copy)]
pub struct LanczosParams {
    /// Energy tolerance: the iteration stops once the Rayleigh–Ritz
    /// estimate improves by less than this amount.
    pub error: f64,
    /// Cap on the Krylov dimension.
    pub max_iterations: usize,
}

impl LanczosParams {
    /// Create solver parameters.
    pub fn new(error: f64, max_iterations: usize) -> Self {
        Self {
            error,
            max_iterations,
        }
    }
}

impl Default for LanczosParams {
    fn default() -> Self {
        Self {
            error: 1e-9,
            max_iterations: 200,
        }
    }
}

/// Parameters of a DMRG sweep run.
#[derive(Debug, Clone)]
pub struct SweepParams {
    /// Number of outer (rightward + leftward) sweeps.
    pub sweeps: usize,
    /// Lower bound on the kept bond dimension.
    pub dmin: usize,
    /// Upper bound on the kept bond dimension.
    pub dmax: usize,
    /// Target per-bond truncation error.
    pub trunc_err: f64,
    /// Lanczos solver parameters.
    pub lancz_params: LanczosParams,
    /// Directory holding the per-site MPS tensor files.
    pub mps_path: PathBuf,
    /// Directory holding the block-operator group files.
    pub temp_path: PathBuf,
}

impl SweepParams {
    /// Create sweep parameters with the default filesystem roots
    /// (`mps` and `.temp`).
    pub fn new(
        sweeps: usize,
        dmin: usize,
        dmax: usize,
        trunc_err: f64,
        lancz_params: LanczosParams,
    ) -> Self {
        Self {
            sweeps,
            dmin,
            dmax,
            trunc_err,
            lancz_params,
            mps_path: PathBuf::from("mps"),
            temp_path: PathBuf::from(".temp"),
        }
    }

    /// Set the MPS directory.
    pub fn with_mps_path(mut self, mps_path: impl Into<PathBuf>) -> Self {
        self.mps_path = mps_path.into();
        self
    }

    /// Set the temp directory for block-operator files.
    pub fn with_temp_path(mut self, temp_path: impl Into<PathBuf>) -> Self {
        self.temp_path = temp_path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_paths() {
        let params = SweepParams::new(4, 1, 64, 1e-9, LanczosParams::default())
            .with_mps_path("/tmp/my_mps")
            .with_temp_path("/tmp/my_temp");
        assert_eq!(params.mps_path, PathBuf::from("/tmp/my_mps"));
        assert_eq!(params.temp_path, PathBuf::from("/tmp/my_temp"));
        assert_eq!(params.sweeps, 4);
        assert_eq!(params.dmax, 64);
    }
}
