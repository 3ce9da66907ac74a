//! Weight matrix state and initialization
//!
//! A layer's weights are either not yet created or a fixed-shape
//! `(units, next_size)` matrix. The shape never changes once initialized; an
//! external optimizer rewrites the values in place.

use crate::error::LayerError;
use crate::matrix::Matrix;
use crate::utils::SimpleRng;
use std::{iter, slice};

/// Tagged weight state of a layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Weights {
    #[default]
    Uninitialized,
    Initialized { matrix: Matrix, next_size: usize },
}

impl Weights {
    /// Allocate a `(rows, next_size)` matrix with entries drawn uniformly from
    /// `[0, initial_weight)`.
    ///
    /// # Errors
    ///
    /// * [`LayerError::InvalidDimension`] if `rows` or `next_size` is zero
    /// * [`LayerError::InvalidInitialWeight`] if `initial_weight` is not a
    ///   finite positive number
    pub fn initialize(
        rows: usize,
        next_size: usize,
        initial_weight: f64,
        rng: &mut SimpleRng,
    ) -> Result<Self, LayerError> {
        if rows == 0 {
            return Err(LayerError::InvalidDimension {
                name: "rows",
                value: rows,
            });
        }
        if next_size == 0 {
            return Err(LayerError::InvalidDimension {
                name: "next_size",
                value: next_size,
            });
        }
        if !initial_weight.is_finite() || initial_weight <= 0.0 {
            return Err(LayerError::InvalidInitialWeight(initial_weight));
        }

        let data = (0..rows * next_size)
            .map(|_| rng.gen_range_f64(0.0, initial_weight))
            .collect();
        let matrix = Matrix::from_vec(rows, next_size, data)?;
        Ok(Weights::Initialized { matrix, next_size })
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self, Weights::Initialized { .. })
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        match self {
            Weights::Initialized { matrix, .. } => Some(matrix),
            Weights::Uninitialized => None,
        }
    }

    pub fn matrix_mut(&mut self) -> Option<&mut Matrix> {
        match self {
            Weights::Initialized { matrix, .. } => Some(matrix),
            Weights::Uninitialized => None,
        }
    }

    pub fn next_size(&self) -> Option<usize> {
        match self {
            Weights::Initialized { next_size, .. } => Some(*next_size),
            Weights::Uninitialized => None,
        }
    }

    /// Copy of the weights with column 0 zeroed when `has_bias` is set.
    ///
    /// The stored matrix is never touched. `None` when uninitialized.
    pub fn regularization_view(&self, has_bias: bool) -> Option<Matrix> {
        let mut view = self.matrix()?.clone();
        if has_bias {
            view.fill_column(0, 0.0);
        }
        Some(view)
    }

    /// Row-major walk over every weight, or a single `None` when uninitialized.
    pub fn iter(&self) -> WeightIter<'_> {
        match self.matrix() {
            Some(matrix) => WeightIter::Values(matrix.as_slice().iter()),
            None => WeightIter::Sentinel(iter::once(None)),
        }
    }
}

/// Finite iterator over a layer's weights.
///
/// Yields `Some(w)` for each weight in row-major order. A layer without weights
/// yields exactly one `None`.
#[derive(Debug, Clone)]
pub enum WeightIter<'a> {
    Values(slice::Iter<'a, f64>),
    Sentinel(iter::Once<Option<f64>>),
}

impl Iterator for WeightIter<'_> {
    type Item = Option<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            WeightIter::Values(values) => values.next().map(|&w| Some(w)),
            WeightIter::Sentinel(once) => once.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            WeightIter::Values(values) => values.size_hint(),
            WeightIter::Sentinel(once) => once.size_hint(),
        }
    }
}

impl ExactSizeIterator for WeightIter<'_> {}
