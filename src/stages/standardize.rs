use std::io::Read;

use crate::error::{PymaError, Result};
use crate::wire::ByteReader;

use super::{Algorithm, InvertibleAlgorithm};

/// Per-column standardization: `(x - mean) / stddev`.
///
/// A zero standard deviation is not special-cased; the division yields
/// IEEE infinities or NaN exactly as the producer would.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardize {
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

impl Standardize {
    pub fn new(means: Vec<f64>, std_devs: Vec<f64>) -> Result<Self> {
        if means.len() != std_devs.len() {
            return Err(PymaError::ShapeMismatch {
                context: "Standardize state (standard deviations vs means)",
                expected: means.len(),
                got: std_devs.len(),
            });
        }
        Ok(Self { means, std_devs })
    }

    /// Decode two one-dimensional matrices: means, then standard deviations.
    pub fn read_from<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
        let means = reader.read_vector()?;
        let std_devs = reader.read_vector()?;
        let stage = Self::new(means, std_devs)?;
        log::debug!("decoded Standardize over {} columns", stage.len());
        Ok(stage)
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    /// Number of columns the state covers.
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    fn ensure_len(&self, data: &[f64]) -> Result<()> {
        if data.len() != self.means.len() {
            return Err(PymaError::ShapeMismatch {
                context: "Standardize input",
                expected: self.means.len(),
                got: data.len(),
            });
        }
        Ok(())
    }
}

impl Algorithm for Standardize {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        self.ensure_len(data)?;
        Ok(data
            .iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .map(|(x, (mean, sd))| (x - mean) / sd)
            .collect())
    }
}

impl InvertibleAlgorithm for Standardize {
    fn apply_inverse(&self, data: &[f64]) -> Result<Vec<f64>> {
        self.ensure_len(data)?;
        Ok(data
            .iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .map(|(x, (mean, sd))| x * sd + mean)
            .collect())
    }
}
