use std::io::Read;

use crate::error::{PymaError, Result};
use crate::wire::ByteReader;

use super::Algorithm;

/// Savitzky-Golay filter applied as a "valid" sliding-window convolution
/// with precomputed coefficients.
///
/// For a window of width `w` and input of length `n` the output has
/// `n - w + 1` values. An input exactly one shorter than the window gives an
/// empty output; anything shorter is a [`PymaError::ShapeError`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavitzkyGolay {
    coefficients: Vec<f64>,
}

impl SavitzkyGolay {
    pub fn new(coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(PymaError::ShapeError(
                "Savitzky-Golay coefficient window is empty".to_string(),
            ));
        }
        Ok(Self { coefficients })
    }

    /// Decode a coefficient matrix, which must have exactly one row.
    pub fn read_from<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
        let matrix = reader.read_matrix()?;
        if matrix.rows() != 1 {
            return Err(PymaError::ShapeError(format!(
                "Savitzky-Golay coefficients must be a single row, got {}x{}",
                matrix.rows(),
                matrix.cols()
            )));
        }
        let stage = Self::new(matrix.into_vec())?;
        log::debug!("decoded SavitzkyGolay with window {}", stage.window());
        Ok(stage)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Width of the coefficient window.
    pub fn window(&self) -> usize {
        self.coefficients.len()
    }

    /// Output length for an input of `input_len` values.
    pub fn output_len(&self, input_len: usize) -> Result<usize> {
        (input_len + 1).checked_sub(self.window()).ok_or_else(|| {
            PymaError::ShapeError(format!(
                "input of {input_len} values is too short for a window of {}",
                self.window()
            ))
        })
    }
}

impl Algorithm for SavitzkyGolay {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        let out_len = self.output_len(data.len())?;
        Ok(data
            .windows(self.window())
            .take(out_len)
            .map(|window| {
                self.coefficients
                    .iter()
                    .zip(window)
                    .fold(0.0, |acc, (c, x)| acc + c * x)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn matrix_bytes(rows: i32, cols: i32, values: &[f64]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&rows.to_le_bytes());
        out.extend_from_slice(&cols.to_le_bytes());
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    #[test]
    fn decodes_single_row() {
        let mut reader = ByteReader::new(Cursor::new(matrix_bytes(1, 3, &[-0.5, 0.0, 0.5])));
        let sg = SavitzkyGolay::read_from(&mut reader).unwrap();
        assert_eq!(sg.coefficients(), &[-0.5, 0.0, 0.5]);
        assert_eq!(sg.window(), 3);
    }

    #[test]
    fn multi_row_coefficients_are_rejected() {
        let mut reader = ByteReader::new(Cursor::new(matrix_bytes(2, 2, &[1.0, 2.0, 3.0, 4.0])));
        assert!(matches!(
            SavitzkyGolay::read_from(&mut reader),
            Err(PymaError::ShapeError(_))
        ));
    }

    #[test]
    fn zero_rows_are_rejected() {
        let mut reader = ByteReader::new(Cursor::new(matrix_bytes(0, 5, &[])));
        assert!(SavitzkyGolay::read_from(&mut reader).is_err());
    }

    #[test]
    fn empty_window_is_rejected() {
        assert!(matches!(
            SavitzkyGolay::new(Vec::new()),
            Err(PymaError::ShapeError(_))
        ));
    }

    #[test]
    fn sliding_dot_product() {
        let sg = SavitzkyGolay::new(vec![1.0, 2.0, 3.0]).unwrap();
        let out = sg.apply(&[1.0, 0.0, 0.0, 1.0, 2.0]).unwrap();
        // [1*1 + 2*0 + 3*0, 1*0 + 2*0 + 3*1, 1*0 + 2*1 + 3*2]
        assert_eq!(out, vec![1.0, 3.0, 8.0]);
    }

    #[test]
    fn output_length_is_n_minus_w_plus_one() {
        let sg = SavitzkyGolay::new(vec![0.25; 4]).unwrap();
        for n in 4..20 {
            let data = vec![1.0; n];
            assert_eq!(sg.apply(&data).unwrap().len(), n - 4 + 1);
        }
    }

    #[test]
    fn one_short_of_window_is_empty() {
        let sg = SavitzkyGolay::new(vec![1.0; 5]).unwrap();
        assert!(sg.apply(&[1.0; 4]).unwrap().is_empty());
    }

    #[test]
    fn much_shorter_than_window_is_shape_error() {
        let sg = SavitzkyGolay::new(vec![1.0; 5]).unwrap();
        assert!(matches!(sg.apply(&[1.0; 3]), Err(PymaError::ShapeError(_))));
        assert!(sg.apply(&[]).is_err());
    }
}
