//! Sigmoid activation and its derivative-via-output shortcut
//!
//! Scalar forms operate on single values; the matrix forms apply them
//! elementwise and return a new matrix of the same shape.

use crate::matrix::Matrix;

// Largest f64 strictly below 1.0 and smallest positive normal f64. Saturated
// results are pinned to these so the output stays inside the open interval.
const SIGMOID_CEIL: f64 = 1.0 - f64::EPSILON / 2.0;
const SIGMOID_FLOOR: f64 = f64::MIN_POSITIVE;

/// Sigmoid activation function.
///
/// Returns `1 / (1 + exp(-x))`, strictly inside (0, 1) for every finite input.
/// Negative inputs go through `exp(x) / (1 + exp(x))` so `exp` never overflows.
pub fn sigmoid(x: f64) -> f64 {
    let value = if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    };
    value.clamp(SIGMOID_FLOOR, SIGMOID_CEIL)
}

/// Sigmoid derivative assuming x = sigmoid(z).
///
/// Returns the derivative: x * (1 - x)
pub fn sigmoid_derivative(x: f64) -> f64 {
    x * (1.0 - x)
}

/// Elementwise [`sigmoid`].
pub fn sigmoid_matrix(z: &Matrix) -> Matrix {
    z.map(sigmoid)
}

/// Elementwise [`sigmoid_derivative`]; `a` must already hold sigmoid outputs.
pub fn sigmoid_derivative_matrix(a: &Matrix) -> Matrix {
    a.map(sigmoid_derivative)
}
