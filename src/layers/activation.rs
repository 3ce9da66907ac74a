//! Activation storage with bias-column augmentation
//!
//! An [`ActivationStore`] holds the per-example values of one layer as an
//! `(m, units)` matrix, where `units = size + 1` for biased layers. The leading
//! column of a biased store is the constant bias unit and is always exactly 1.

use crate::error::LayerError;
use crate::matrix::Matrix;

/// Current activation matrix of a layer.
///
/// The matrix is replaced wholesale on every assignment and never partially
/// mutated, so the column-count and bias-column invariants hold at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationStore {
    size: usize,
    has_bias: bool,
    matrix: Matrix,
}

impl ActivationStore {
    /// Create a store holding a single all-zero example (plus the bias unit).
    pub fn new(size: usize, has_bias: bool) -> Self {
        let zeros = Matrix::zeros(1, size);
        let matrix = if has_bias {
            zeros.with_leading_column(1.0)
        } else {
            zeros
        };
        Self {
            size,
            has_bias,
            matrix,
        }
    }

    /// Replace the activation with `data`, read as row-major `(m, size)` values.
    ///
    /// `m = data.len() / size`; the division must be exact. For biased layers a
    /// column of ones is prepended, giving `(m, size + 1)`. Returns `m`.
    ///
    /// # Errors
    ///
    /// [`LayerError::Shape`] when `data.len()` is not a multiple of `size`, or
    /// when `size` is zero.
    pub fn assign(&mut self, data: &[f64]) -> Result<usize, LayerError> {
        if self.size == 0 || data.len() % self.size != 0 {
            return Err(LayerError::Shape {
                len: data.len(),
                size: self.size,
            });
        }

        let examples = data.len() / self.size;
        let raw = Matrix::from_vec(examples, self.size, data.to_vec())?;
        self.matrix = self.augment(raw);
        Ok(examples)
    }

    fn augment(&self, raw: Matrix) -> Matrix {
        if self.has_bias {
            raw.with_leading_column(1.0)
        } else {
            raw
        }
    }

    /// The augmented activation matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Column count of the stored matrix: `size`, plus one for the bias unit.
    pub fn units(&self) -> usize {
        self.size + usize::from(self.has_bias)
    }

    /// Number of examples currently loaded.
    pub fn examples(&self) -> usize {
        self.matrix.rows()
    }
}
