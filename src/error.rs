//! Error types for layer operations.

use thiserror::Error;

/// Errors raised by [`Layer`](crate::layers::Layer) and [`Matrix`](crate::matrix::Matrix)
/// operations.
///
/// All of them are raised at the point of violation and returned to the caller;
/// nothing in this crate retries or recovers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    #[error("cannot reshape {len} activation values into rows of {size}")]
    Shape { len: usize, size: usize },

    #[error("invalid dimension: {name} must be positive, got {value}")]
    InvalidDimension { name: &'static str, value: usize },

    #[error("initial weight must be finite and positive, got {0}")]
    InvalidInitialWeight(f64),

    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("layer {layer_number} has no weight matrix")]
    MissingWeights { layer_number: usize },

    #[error("layer {layer_number} is an output layer and cannot own a weight matrix")]
    TerminalLayer { layer_number: usize },

    #[error("index ({row}, {col}) out of bounds for {shape:?} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        shape: (usize, usize),
    },
}
