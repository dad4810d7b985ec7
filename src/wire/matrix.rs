use std::io::Read;

use crate::error::{PymaError, Result};

use super::reader::ByteReader;

// ---------------------------------------------------------------------------
// Matrix – a dense row-major block of doubles
// ---------------------------------------------------------------------------

/// Dense `rows × cols` matrix of `f64`, stored row-major exactly as the
/// stream delivers it.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from row-major data; the length must equal `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let expected = element_count(rows, cols)?;
        if data.len() != expected {
            return Err(PymaError::ShapeMismatch {
                context: "matrix data",
                expected,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Borrow one row, or `None` when out of bounds.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index < self.rows {
            Some(&self.data[index * self.cols..(index + 1) * self.cols])
        } else {
            None
        }
    }

    /// Iterate over rows in order.
    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).filter_map(move |r| self.row(r))
    }

    /// Flattened row-major view.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Whether the matrix is a 1-D vector on the wire (single row, single
    /// column, or no elements at all).
    pub fn is_vector(&self) -> bool {
        self.rows <= 1 || self.cols <= 1
    }
}

fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or_else(|| PymaError::ShapeError(format!("{rows}x{cols} matrix is too large")))
}

// ---------------------------------------------------------------------------
// Framing: matrices and vectors on top of ByteReader
// ---------------------------------------------------------------------------

impl<R: Read> ByteReader<R> {
    /// Read a matrix: `i32` rows, `i32` cols, then `rows * cols` doubles.
    pub fn read_matrix(&mut self) -> Result<Matrix> {
        let rows = self.read_count("matrix row count")?;
        let cols = self.read_count("matrix column count")?;
        let data = self.read_doubles(element_count(rows, cols)?)?;
        log::trace!("read {rows}x{cols} matrix");
        Ok(Matrix { rows, cols, data })
    }

    /// Read a matrix that must be a single row or a single column and
    /// return its values.
    pub fn read_vector(&mut self) -> Result<Vec<f64>> {
        let matrix = self.read_matrix()?;
        if !matrix.is_vector() {
            return Err(PymaError::ShapeError(format!(
                "expected a one-dimensional matrix, got {}x{}",
                matrix.rows, matrix.cols
            )));
        }
        Ok(matrix.into_vec())
    }
}
