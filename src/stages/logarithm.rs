use std::io::Read;

use crate::error::{PymaError, Result};
use crate::wire::ByteReader;

use super::Algorithm;

/// Offset logarithm in an arbitrary base.
///
/// State on the wire is three doubles: base, base conversion factor
/// (`1 / ln(base)`) and offset. The stored factor is used as-is and the
/// natural log is fdlibm's (`libm::log`), so results match the producer bit
/// for bit on every platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    base: f64,
    base_conversion_factor: f64,
    offset: f64,
}

impl Log {
    /// Build from a base and offset, deriving the conversion factor.
    pub fn new(base: f64, offset: f64) -> Self {
        Self {
            base,
            base_conversion_factor: 1.0 / libm::log(base),
            offset,
        }
    }

    pub fn read_from<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
        let state = reader.read_doubles(3)?;
        let stage = Self {
            base: state[0],
            base_conversion_factor: state[1],
            offset: state[2],
        };
        log::debug!(
            "decoded Log (base={}, offset={})",
            stage.base,
            stage.offset
        );
        Ok(stage)
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn base_conversion_factor(&self) -> f64 {
        self.base_conversion_factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl Algorithm for Log {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        data.iter()
            .enumerate()
            .map(|(index, &x)| {
                let shifted = x + self.offset;
                if shifted <= 0.0 {
                    return Err(PymaError::DomainError {
                        stage: "Log",
                        index,
                        value: shifted,
                    });
                }
                Ok(libm::log(shifted) * self.base_conversion_factor)
            })
            .collect()
    }
}
