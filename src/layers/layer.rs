//! Single feed-forward layer
//!
//! A [`Layer`] owns the activations of one network stage and, for non-terminal
//! stages, the weight matrix into the next stage. Forward propagation computes
//! `sigmoid(activation · weights)`, the raw input for the next layer's store.

use super::activation::ActivationStore;
use super::weights::{WeightIter, Weights};
use crate::error::LayerError;
use crate::matrix::Matrix;
use crate::utils::{sigmoid_derivative_matrix, sigmoid_matrix, SimpleRng};
use std::fmt;
use tracing::{debug, trace, warn};

/// Role of a layer in the network, fixed at construction.
///
/// Only hidden layers may own weights. An output layer's stored activation is
/// the final network output and propagates unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerKind {
    #[default]
    Hidden,
    Output,
}

/// One stage of a feed-forward network.
///
/// # Fields
///
/// * `layer_number` - Ordinal position, informational only
/// * `size` - Number of non-bias units
/// * `has_bias` - Whether a constant-1 bias column is prepended to activations
/// * `initial_weight` - Upper bound of the uniform weight initialization range
/// * `kind` - Hidden or output role
///
/// # Example
///
/// ```
/// use feedforward_layer::layers::Layer;
/// use feedforward_layer::utils::SimpleRng;
///
/// let mut rng = SimpleRng::new(42);
/// let mut layer = Layer::new(1, 2, 0.5, false);
/// layer.initialize_weights(2, &mut rng).unwrap();
/// layer.set_activation(&[1.0, 2.0]).unwrap();
///
/// let next = layer.propagate().unwrap();
/// assert_eq!(next.shape(), (1, 2));
/// ```
#[derive(Debug, Clone)]
pub struct Layer {
    layer_number: usize,
    size: usize,
    has_bias: bool,
    initial_weight: f64,
    kind: LayerKind,
    activation: ActivationStore,
    weights: Weights,
}

impl Layer {
    /// Create a hidden layer. Its weights must be initialized before it can
    /// transform activations.
    pub fn new(layer_number: usize, size: usize, initial_weight: f64, has_bias: bool) -> Self {
        Self::with_kind(layer_number, size, initial_weight, has_bias, LayerKind::Hidden)
    }

    /// Create an output layer, which never owns weights.
    pub fn output(layer_number: usize, size: usize, initial_weight: f64, has_bias: bool) -> Self {
        Self::with_kind(layer_number, size, initial_weight, has_bias, LayerKind::Output)
    }

    pub fn with_kind(
        layer_number: usize,
        size: usize,
        initial_weight: f64,
        has_bias: bool,
        kind: LayerKind,
    ) -> Self {
        Self {
            layer_number,
            size,
            has_bias,
            initial_weight,
            kind,
            activation: ActivationStore::new(size, has_bias),
            weights: Weights::Uninitialized,
        }
    }

    pub fn layer_number(&self) -> usize {
        self.layer_number
    }

    /// Number of non-bias units.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn has_bias(&self) -> bool {
        self.has_bias
    }

    pub fn initial_weight(&self) -> f64 {
        self.initial_weight
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == LayerKind::Output
    }

    pub fn has_weights(&self) -> bool {
        self.weights.is_initialized()
    }

    /// Activation column count: `size`, plus one for the bias unit.
    pub fn units(&self) -> usize {
        self.activation.units()
    }

    /// Number of examples currently loaded.
    pub fn examples(&self) -> usize {
        self.activation.examples()
    }

    /// Size of the next layer, recorded by [`Layer::initialize_weights`].
    pub fn next_size(&self) -> Option<usize> {
        self.weights.next_size()
    }

    /// Create the `(units, next_size)` weight matrix with entries uniform in
    /// `[0, initial_weight)`, drawn from `rng`.
    ///
    /// Meant to be called once per hidden layer. A second call reallocates and
    /// discards the previous values.
    ///
    /// # Errors
    ///
    /// * [`LayerError::TerminalLayer`] on an output layer
    /// * [`LayerError::InvalidDimension`] if `size` or `next_size` is zero
    /// * [`LayerError::InvalidInitialWeight`] if `initial_weight` is not a
    ///   finite positive number
    pub fn initialize_weights(
        &mut self,
        next_size: usize,
        rng: &mut SimpleRng,
    ) -> Result<(), LayerError> {
        if self.is_terminal() {
            return Err(LayerError::TerminalLayer {
                layer_number: self.layer_number,
            });
        }
        if self.size == 0 {
            return Err(LayerError::InvalidDimension {
                name: "size",
                value: self.size,
            });
        }
        if self.weights.is_initialized() {
            warn!(
                layer = self.layer_number,
                "reinitializing weights, previous values are discarded"
            );
        }

        self.weights = Weights::initialize(self.units(), next_size, self.initial_weight, rng)?;
        debug!(
            layer = self.layer_number,
            rows = self.units(),
            next_size,
            scale = self.initial_weight,
            "initialized weight matrix"
        );
        Ok(())
    }

    /// Replace the stored activation with `data`, read row-major as
    /// `(data.len() / size, size)` and bias-augmented when `has_bias` is set.
    ///
    /// # Errors
    ///
    /// [`LayerError::Shape`] if `data.len()` is not a multiple of `size`. The
    /// previous activation is kept in that case.
    pub fn set_activation(&mut self, data: &[f64]) -> Result<(), LayerError> {
        let examples = self.activation.assign(data)?;
        debug!(layer = self.layer_number, examples, "assigned activation");
        Ok(())
    }

    /// The current (bias-augmented) activation matrix.
    pub fn activation(&self) -> &Matrix {
        self.activation.matrix()
    }

    /// Compute the next layer's input, `sigmoid(activation · weights)`.
    ///
    /// Without weights the stored activation is returned unchanged: that is the
    /// final output for an output layer. A hidden layer in that state logs a
    /// warning, since its caller most likely skipped initialization.
    ///
    /// # Errors
    ///
    /// [`LayerError::DimensionMismatch`] if the activation column count does not
    /// match the weight row count.
    pub fn propagate(&self) -> Result<Matrix, LayerError> {
        let activation = self.activation.matrix();
        let Some(weights) = self.weights.matrix() else {
            if !self.is_terminal() {
                warn!(
                    layer = self.layer_number,
                    "hidden layer has no weights, passing activation through"
                );
            }
            return Ok(activation.clone());
        };

        let raw = activation.matmul(weights)?;
        let output = sigmoid_matrix(&raw);
        trace!(
            layer = self.layer_number,
            input = ?activation.shape(),
            output = ?output.shape(),
            "propagated"
        );
        Ok(output)
    }

    /// Copy of the weights for a regularization penalty, with column 0 zeroed
    /// when the layer has a bias unit. The weights themselves are untouched.
    ///
    /// # Errors
    ///
    /// [`LayerError::MissingWeights`] before initialization.
    pub fn regularization_view(&self) -> Result<Matrix, LayerError> {
        self.weights
            .regularization_view(self.has_bias)
            .ok_or(LayerError::MissingWeights {
                layer_number: self.layer_number,
            })
    }

    /// Fresh row-major iterator over the weights; a single `None` without them.
    pub fn iterate_weights(&self) -> WeightIter<'_> {
        self.weights.iter()
    }

    /// `a * (1 - a)` over the stored activation, valid when the activation holds
    /// sigmoid outputs.
    pub fn activation_gradient(&self) -> Matrix {
        sigmoid_derivative_matrix(self.activation.matrix())
    }

    pub fn weights(&self) -> Option<&Matrix> {
        self.weights.matrix()
    }

    /// In-place access for an optimizer. Values may change, the shape may not.
    pub fn weights_mut(&mut self) -> Option<&mut Matrix> {
        self.weights.matrix_mut()
    }

    pub fn weight_at(&self, row: usize, col: usize) -> Result<f64, LayerError> {
        self.weights
            .matrix()
            .ok_or(LayerError::MissingWeights {
                layer_number: self.layer_number,
            })?
            .get(row, col)
    }

    pub fn set_weight_at(&mut self, row: usize, col: usize, value: f64) -> Result<(), LayerError> {
        let layer_number = self.layer_number;
        self.weights
            .matrix_mut()
            .ok_or(LayerError::MissingWeights { layer_number })?
            .set(row, col, value)
    }

    /// Number of trainable weights, zero before initialization.
    pub fn parameter_count(&self) -> usize {
        self.weights.matrix().map_or(0, Matrix::len)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Layer {}:", self.layer_number)?;
        writeln!(f, "Activations: ")?;
        writeln!(f, "{}", self.activation.matrix())?;
        if let Some(weights) = self.weights.matrix() {
            writeln!(f, "Theta:")?;
            writeln!(f, "{}", weights)?;
        }
        write!(f, "{}", "=".repeat(20))
    }
}
