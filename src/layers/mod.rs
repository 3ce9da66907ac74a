//! Layer abstraction for feed-forward networks
//!
//! This module provides the [`Layer`] type and the pieces it is built from:
//! the bias-augmenting activation store and the weight matrix state.

pub mod activation;
mod layer;
pub mod weights;

pub use activation::ActivationStore;
pub use layer::{Layer, LayerKind};
pub use weights::{WeightIter, Weights};
