//! Test-only encoder for the PyMA state format.
//!
//! The library is read-only; these helpers build byte streams the way the
//! Python side lays them out so tests can exercise the decoder end to end.
#![allow(dead_code)]

#[derive(Default)]
pub struct StateWriter {
    buf: Vec<u8>,
}

impl StateWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn int(mut self, v: i32) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn doubles(mut self, values: &[f64]) -> Self {
        for v in values {
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    pub fn string(self, s: &str) -> Self {
        let mut w = self.int(s.len() as i32);
        w.buf.extend_from_slice(s.as_bytes());
        w
    }

    pub fn matrix(self, rows: i32, cols: i32, values: &[f64]) -> Self {
        self.int(rows).int(cols).doubles(values)
    }

    pub fn row(self, values: &[f64]) -> Self {
        self.matrix(1, values.len() as i32, values)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    // ---- stages ----

    pub fn log(self, base: f64, offset: f64) -> Self {
        self.string("Log")
            .doubles(&[base, 1.0 / libm::log(base), offset])
    }

    pub fn standardize(self, means: &[f64], std_devs: &[f64]) -> Self {
        self.string("Standardize").row(means).row(std_devs)
    }

    pub fn savitzky_golay(self, coefficients: &[f64]) -> Self {
        self.string("SavitzkyGolay").row(coefficients)
    }

    pub fn simpls(self, rows: i32, cols: i32, loadings: &[f64]) -> Self {
        self.string("SIMPLS").matrix(rows, cols, loadings)
    }

    /// Header of a nested pipeline stage; follow with `count` stages.
    pub fn nested(self, count: i32) -> Self {
        self.string("PreprocessingStages").int(count)
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
