//! Feed-forward Layer Library
//!
//! This library models a single stage of a feed-forward neural network: it stores
//! per-example activations (with an optional bias unit), owns the weight matrix
//! into the next stage, and computes the sigmoid forward transformation.
//!
//! # Modules
//!
//! - `layers`: Layer type, activation store and weight state
//! - `matrix`: Row-major matrix used for activations and weights
//! - `utils`: Seedable RNG and sigmoid activation functions
//! - `config`: JSON network description loading
//! - `error`: Error types

#[cfg(feature = "blas")]
extern crate blas_src;

pub mod config;
pub mod error;
pub mod layers;
pub mod matrix;
pub mod utils;

pub use error::LayerError;
pub use layers::{Layer, LayerKind};
pub use matrix::Matrix;
