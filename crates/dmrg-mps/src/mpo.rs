//! Matrix-represented MPO: a sparse grid of on-site operators per site.

use crate::error::{MpsError, Result};
use dmrg_tensor::Tensor;

/// Sparse `rows × cols` grid of rank-2 on-site operators for one site.
///
/// Rows index the incoming MPO virtual bond, columns the outgoing one.
/// Absent entries are structural zeros, distinct from numerically zero
/// operators. Operators follow the convention `w[[a, b]] = ⟨a|O|b⟩`.
#[derive(Debug, Clone)]
pub struct SparseOpMat {
    rows: usize,
    cols: usize,
    data: Vec<Option<Tensor>>,
}

impl SparseOpMat {
    /// Create an all-null grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![None; rows * cols],
        }
    }

    /// Number of incoming MPO virtual bond values.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of outgoing MPO virtual bond values.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Install the operator at `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, op: Tensor) {
        assert!(i < self.rows && j < self.cols, "operator index out of grid");
        self.data[i * self.cols + j] = Some(op);
    }

    /// Whether `(i, j)` is a structural zero.
    pub fn is_null(&self, i: usize, j: usize) -> bool {
        self.data[i * self.cols + j].is_none()
    }

    /// The operator at `(i, j)`, if present.
    pub fn get(&self, i: usize, j: usize) -> Option<&Tensor> {
        self.data[i * self.cols + j].as_ref()
    }

    /// Iterate over non-null entries as `(row, col, operator)`, row-major.
    pub fn iter_non_null(&self) -> impl Iterator<Item = (usize, usize, &Tensor)> {
        self.data.iter().enumerate().filter_map(|(flat, op)| {
            op.as_ref()
                .map(|t| (flat / self.cols, flat % self.cols, t))
        })
    }
}

/// Matrix-represented MPO over a chain of sites. Immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct MatReprMpo {
    sites: Vec<SparseOpMat>,
    site_dims: Vec<usize>,
}

impl MatReprMpo {
    /// Validate and wrap a chain of per-site operator grids.
    ///
    /// Requires matching virtual bond dimensions between neighbours,
    /// trivial outer bonds, at least one operator per site, and square
    /// rank-2 operators of a consistent physical dimension per site.
    pub fn new(sites: Vec<SparseOpMat>) -> Result<Self> {
        if sites.is_empty() {
            return Err(MpsError::InvalidOperation {
                message: "MPO has no sites".to_string(),
            });
        }
        if sites[0].rows() != 1 || sites[sites.len() - 1].cols() != 1 {
            return Err(MpsError::InvalidOperation {
                message: "MPO outer virtual bonds must have dimension 1".to_string(),
            });
        }
        for s in 0..sites.len() - 1 {
            if sites[s].cols() != sites[s + 1].rows() {
                return Err(MpsError::InvalidOperation {
                    message: format!(
                        "MPO virtual bond mismatch between sites {} and {}: {} vs {}",
                        s,
                        s + 1,
                        sites[s].cols(),
                        sites[s + 1].rows()
                    ),
                });
            }
        }

        let mut site_dims = Vec::with_capacity(sites.len());
        for (s, grid) in sites.iter().enumerate() {
            let mut dim = None;
            for (i, j, op) in grid.iter_non_null() {
                if op.rank() != 2 || op.dim(0) != op.dim(1) {
                    return Err(MpsError::InvalidOperation {
                        message: format!(
                            "operator ({i}, {j}) at site {s} is not a square rank-2 tensor"
                        ),
                    });
                }
                match dim {
                    None => dim = Some(op.dim(0)),
                    Some(d) if d != op.dim(0) => {
                        return Err(MpsError::InvalidOperation {
                            message: format!(
                                "inconsistent physical dimensions {} and {} at site {s}",
                                d,
                                op.dim(0)
                            ),
                        });
                    }
                    _ => {}
                }
            }
            let Some(dim) = dim else {
                return Err(MpsError::InvalidOperation {
                    message: format!("site {s} has no operators"),
                });
            };
            site_dims.push(dim);
        }

        Ok(Self { sites, site_dims })
    }

    /// Chain length.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the chain has no sites.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// The operator grid at site `s`.
    pub fn site(&self, s: usize) -> &SparseOpMat {
        &self.sites[s]
    }

    /// Physical dimensions of the chain.
    pub fn site_dims(&self) -> &[usize] {
        &self.site_dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye(d: usize) -> Tensor {
        let mut t = Tensor::new(vec![d, d], 0);
        for i in 0..d {
            t.set(&[i, i], 1.0);
        }
        t
    }

    #[test]
    fn test_sparse_grid_basics() {
        let mut grid = SparseOpMat::new(2, 3);
        assert!(grid.is_null(0, 0));
        grid.set(1, 2, eye(2));
        assert!(!grid.is_null(1, 2));
        assert_eq!(grid.get(1, 2).unwrap().dims(), &[2, 2]);
        assert!(grid.get(0, 1).is_none());

        let entries: Vec<(usize, usize)> =
            grid.iter_non_null().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(entries, vec![(1, 2)]);
    }

    #[test]
    fn test_mpo_validation() {
        // Good 2-site MPO: 1x2 then 2x1.
        let mut w0 = SparseOpMat::new(1, 2);
        w0.set(0, 0, eye(2));
        w0.set(0, 1, eye(2));
        let mut w1 = SparseOpMat::new(2, 1);
        w1.set(0, 0, eye(2));
        w1.set(1, 0, eye(2));
        let mpo = MatReprMpo::new(vec![w0.clone(), w1.clone()]).unwrap();
        assert_eq!(mpo.len(), 2);
        assert_eq!(mpo.site_dims(), &[2, 2]);

        // Bond mismatch.
        let mut w1_bad = SparseOpMat::new(3, 1);
        w1_bad.set(0, 0, eye(2));
        assert!(MatReprMpo::new(vec![w0.clone(), w1_bad]).is_err());

        // Empty site.
        let w1_empty = SparseOpMat::new(2, 1);
        assert!(MatReprMpo::new(vec![w0.clone(), w1_empty]).is_err());

        // Non-trivial outer bond.
        let mut w0_bad = SparseOpMat::new(2, 2);
        w0_bad.set(0, 0, eye(2));
        assert!(MatReprMpo::new(vec![w0_bad, w1]).is_err());
    }

    #[test]
    fn test_mpo_rejects_non_square_operator() {
        let mut w0 = SparseOpMat::new(1, 1);
        w0.set(0, 0, Tensor::new(vec![2, 3], 0));
        assert!(MatReprMpo::new(vec![w0]).is_err());
    }
}
