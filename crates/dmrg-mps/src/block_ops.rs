//! Persistence of environment block-operator groups.
//!
//! A block-operator group holds one environment tensor per MPO virtual
//! bond value: the rank-2 `(mps-bond, mps-bond-dagger)` slice of the
//! block operator along its mpo-bond axis. Groups are serialized to a
//! temp area between sweep steps, named `l<p>` / `r<p>` by the block
//! length `p`.

use crate::error::Result;
use crate::mps::TEN_FILE_SUFFIX;
use dmrg_tensor::Tensor;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// One environment tensor per MPO virtual bond value.
pub type OperatorGroup = Vec<Tensor>;

/// Which side of the chain a block-operator group summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSide {
    /// Everything to the left of the active region.
    Left,
    /// Everything to the right of the active region.
    Right,
}

impl BlockSide {
    fn prefix(self) -> &'static str {
        match self {
            BlockSide::Left => "l",
            BlockSide::Right => "r",
        }
    }
}

/// File name of the group for a block of length `p` under `temp_path`.
pub fn gen_block_op_file_name(temp_path: &Path, side: BlockSide, p: usize) -> PathBuf {
    temp_path.join(format!("{}{p}.{TEN_FILE_SUFFIX}", side.prefix()))
}

/// The identity environment of a trivial (length-0) block: a single
/// `1 × 1` one.
pub fn trivial_operator_group() -> OperatorGroup {
    let mut t = Tensor::new(vec![1, 1], 0);
    t.set(&[0, 0], 1.0);
    vec![t]
}

/// Serialize a group, overwriting any previous file. The temp area is
/// created on demand.
pub fn write_operator_group(
    temp_path: &Path,
    side: BlockSide,
    p: usize,
    grp: &OperatorGroup,
) -> Result<()> {
    std::fs::create_dir_all(temp_path)?;
    let writer = BufWriter::new(File::create(gen_block_op_file_name(temp_path, side, p))?);
    serde_json::to_writer(writer, grp)?;
    Ok(())
}

/// Load a group, leaving the file in place.
pub fn read_operator_group(temp_path: &Path, side: BlockSide, p: usize) -> Result<OperatorGroup> {
    let reader = BufReader::new(File::open(gen_block_op_file_name(temp_path, side, p))?);
    Ok(serde_json::from_reader(reader)?)
}

/// Load a group, then unlink its file.
pub fn read_and_remove_operator_group(
    temp_path: &Path,
    side: BlockSide,
    p: usize,
) -> Result<OperatorGroup> {
    let grp = read_operator_group(temp_path, side, p)?;
    std::fs::remove_file(gen_block_op_file_name(temp_path, side, p))?;
    Ok(grp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let grp: OperatorGroup = (0..3)
            .map(|i| {
                Tensor::from_data(vec![2, 2], 0, vec![i as f64, 1.0, -1.0, 0.5]).unwrap()
            })
            .collect();
        write_operator_group(dir.path(), BlockSide::Left, 4, &grp).unwrap();
        let loaded = read_operator_group(dir.path(), BlockSide::Left, 4).unwrap();
        assert_eq!(loaded, grp);
        // File survives a plain read.
        assert!(gen_block_op_file_name(dir.path(), BlockSide::Left, 4).exists());
    }

    #[test]
    fn test_read_and_remove_unlinks() {
        let dir = tempfile::tempdir().unwrap();
        let grp = trivial_operator_group();
        write_operator_group(dir.path(), BlockSide::Right, 0, &grp).unwrap();
        let loaded = read_and_remove_operator_group(dir.path(), BlockSide::Right, 0).unwrap();
        assert_eq!(loaded, grp);
        assert!(!gen_block_op_file_name(dir.path(), BlockSide::Right, 0).exists());
        assert!(read_operator_group(dir.path(), BlockSide::Right, 0).is_err());
    }

    #[test]
    fn test_overwrite_is_permitted() {
        let dir = tempfile::tempdir().unwrap();
        write_operator_group(dir.path(), BlockSide::Left, 1, &trivial_operator_group()).unwrap();
        let grp: OperatorGroup = vec![Tensor::new(vec![3, 3], 0)];
        write_operator_group(dir.path(), BlockSide::Left, 1, &grp).unwrap();
        let loaded = read_operator_group(dir.path(), BlockSide::Left, 1).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].dims(), &[3, 3]);
    }

    #[test]
    fn test_left_right_files_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        assert_ne!(
            gen_block_op_file_name(dir.path(), BlockSide::Left, 2),
            gen_block_op_file_name(dir.path(), BlockSide::Right, 2)
        );
    }
}
