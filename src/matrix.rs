//! Dense row-major matrix used for activations and weights.
//!
//! Values are stored flat in a single `Vec<f64>`, row after row, the same layout
//! the GEMM routines expect. The shape is fixed at construction: callers may
//! rewrite values through [`Matrix::as_mut_slice`] but can never resize.

use crate::error::LayerError;
use std::fmt;

/// Two-dimensional `f64` matrix in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap a row-major buffer as a `rows × cols` matrix.
    ///
    /// Fails with [`LayerError::DimensionMismatch`] when the buffer length is not
    /// exactly `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, LayerError> {
        if data.len() != rows * cols {
            return Err(LayerError::DimensionMismatch {
                expected: (rows, cols),
                actual: (data.len(), 1),
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

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major view of the values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major view of the values. The shape cannot change through it.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64, LayerError> {
        self.index_of(row, col).map(|index| self.data[index])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), LayerError> {
        let index = self.index_of(row, col)?;
        self.data[index] = value;
        Ok(())
    }

    fn index_of(&self, row: usize, col: usize) -> Result<usize, LayerError> {
        if row >= self.rows || col >= self.cols {
            return Err(LayerError::IndexOutOfBounds {
                row,
                col,
                shape: self.shape(),
            });
        }
        Ok(row * self.cols + col)
    }

    /// Borrow one row, or `None` when `row` is out of range.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Iterate over the values of one column, top to bottom.
    ///
    /// Yields nothing when `col` is out of range.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.data
            .chunks_exact(self.cols.max(1))
            .filter_map(move |row| row.get(col).copied())
    }

    /// Overwrite every value of one column. Out-of-range columns are ignored.
    pub fn fill_column(&mut self, col: usize, value: f64) {
        if col >= self.cols {
            return;
        }
        for row in self.data.chunks_exact_mut(self.cols) {
            row[col] = value;
        }
    }

    /// Return a copy with a constant column prepended, `rows × (cols + 1)`.
    pub fn with_leading_column(&self, value: f64) -> Matrix {
        let cols = self.cols + 1;
        let mut data = Vec::with_capacity(self.rows * cols);
        for row in 0..self.rows {
            data.push(value);
            let start = row * self.cols;
            data.extend_from_slice(&self.data[start..start + self.cols]);
        }
        Matrix {
            rows: self.rows,
            cols,
            data,
        }
    }

    /// Apply `f` to every element, producing a matrix of the same shape.
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&value| f(value)).collect(),
        }
    }

    /// Standard matrix product `self · other`.
    ///
    /// `(m, k) × (k, n) → (m, n)`. Fails with [`LayerError::DimensionMismatch`]
    /// when the inner dimensions disagree; no broadcasting is attempted.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix, LayerError> {
        if self.cols != other.rows {
            return Err(LayerError::DimensionMismatch {
                expected: (self.cols, other.cols),
                actual: other.shape(),
            });
        }

        let mut out = Matrix::zeros(self.rows, other.cols);
        if self.rows == 0 || self.cols == 0 || other.cols == 0 {
            return Ok(out);
        }
        gemm(self, other, &mut out);
        Ok(out)
    }
}

// c = a · b, with `c` zeroed and every dimension non-zero.
#[cfg(not(feature = "blas"))]
fn gemm(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let a_rows = a.data.chunks_exact(a.cols);
    let c_rows = c.data.chunks_exact_mut(b.cols);
    for (a_row, c_row) in a_rows.zip(c_rows) {
        for (&a_ik, b_row) in a_row.iter().zip(b.data.chunks_exact(b.cols)) {
            for (c_ij, &b_kj) in c_row.iter_mut().zip(b_row) {
                *c_ij += a_ik * b_kj;
            }
        }
    }
}

#[cfg(feature = "blas")]
fn gemm(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    use cblas::{dgemm, Layout, Transpose};

    let (m, k) = a.shape();
    let n = b.cols;
    unsafe {
        dgemm(
            Layout::RowMajor,
            Transpose::None,
            Transpose::None,
            m as i32,
            n as i32,
            k as i32,
            1.0,
            &a.data,
            k as i32,
            &b.data,
            n as i32,
            0.0,
            &mut c.data,
            n as i32,
        );
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows == 0 {
            return write!(f, "[]");
        }
        write!(f, "[")?;
        for row in 0..self.rows {
            if row > 0 {
                write!(f, "\n ")?;
            }
            write!(f, "[")?;
            let start = row * self.cols;
            for (i, value) in self.data[start..start + self.cols].iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:.4}", value)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
