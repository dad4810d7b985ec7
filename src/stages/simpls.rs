use std::io::Read;

use crate::error::{PymaError, Result};
use crate::wire::{ByteReader, Matrix};

use super::Algorithm;

/// SIMPLS projection onto `k` latent components.
///
/// Holds the weight matrix `W` of shape `(d, k)` and maps a `d`-vector `x`
/// to `x · W`.
#[derive(Debug, Clone, PartialEq)]
pub struct Simpls {
    loadings: Matrix,
}

impl Simpls {
    pub fn new(loadings: Matrix) -> Self {
        Self { loadings }
    }

    pub fn read_from<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
        let loadings = reader.read_matrix()?;
        log::debug!(
            "decoded SIMPLS with {}x{} loadings",
            loadings.rows(),
            loadings.cols()
        );
        Ok(Self::new(loadings))
    }

    pub fn loadings(&self) -> &Matrix {
        &self.loadings
    }

    /// Expected input length `d`.
    pub fn input_len(&self) -> usize {
        self.loadings.rows()
    }

    /// Number of components `k`.
    pub fn components(&self) -> usize {
        self.loadings.cols()
    }
}

impl Algorithm for Simpls {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        if data.len() != self.input_len() {
            return Err(PymaError::ShapeMismatch {
                context: "SIMPLS input",
                expected: self.input_len(),
                got: data.len(),
            });
        }
        let mut result = vec![0.0; self.components()];
        for (j, out) in result.iter_mut().enumerate() {
            for (x, row) in data.iter().zip(self.loadings.row_iter()) {
                *out += x * row[j];
            }
        }
        Ok(result)
    }
}
