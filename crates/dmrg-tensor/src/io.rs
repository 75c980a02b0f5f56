//! One-tensor-per-file disk persistence.

use crate::error::Result;
use crate::tensor::Tensor;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

impl Tensor {
    /// Serialize this tensor to `path`, overwriting any existing file.
    pub fn dump(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Deserialize a tensor from `path`.
    pub fn load(path: &Path) -> Result<Tensor> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
