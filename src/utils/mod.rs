//! Shared utilities for the layer implementation
//!
//! This module provides the seedable random source used for weight
//! initialization and the sigmoid activation helpers.

pub mod activations;
pub mod rng;

pub use activations::{sigmoid, sigmoid_derivative, sigmoid_derivative_matrix, sigmoid_matrix};
pub use rng::SimpleRng;
