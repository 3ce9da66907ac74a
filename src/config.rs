//! Network description loading
//!
//! This module parses a JSON description of a stack of layers and turns it into
//! constructed [`Layer`]s with initialized weights.

use crate::error::LayerError;
use crate::layers::Layer;
use crate::utils::SimpleRng;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or applying a network description.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// Configuration for a single layer.
///
/// `has_bias` defaults to `true` when omitted.
///
/// # Example
///
/// ```json
/// { "size": 4, "initial_weight": 0.5, "has_bias": true }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerConfig {
    /// Number of non-bias units
    pub size: usize,

    /// Upper bound of the uniform weight initialization range
    pub initial_weight: f64,

    /// Whether a bias unit is prepended to the activations
    #[serde(default = "default_has_bias")]
    pub has_bias: bool,
}

fn default_has_bias() -> bool {
    true
}

/// Configuration for a whole stack of layers, input first.
///
/// # Example
///
/// ```json
/// {
///   "seed": 42,
///   "layers": [
///     { "size": 2, "initial_weight": 0.5 },
///     { "size": 4, "initial_weight": 0.5 },
///     { "size": 1, "initial_weight": 0.5 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkConfig {
    /// Seed for weight initialization; time-seeded when absent
    pub seed: Option<u64>,

    /// Layer configurations, in forward order
    pub layers: Vec<LayerConfig>,
}

impl NetworkConfig {
    /// RNG for weight initialization, seeded from `seed` or from the clock.
    pub fn seed_rng(&self) -> SimpleRng {
        match self.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_time(),
        }
    }

    /// Construct every layer, numbered by position.
    ///
    /// Every layer but the last is a hidden layer whose weights are initialized
    /// towards the next layer's size; the last one is an output layer.
    pub fn build_layers(&self, rng: &mut SimpleRng) -> Result<Vec<Layer>, ConfigError> {
        validate_config(self)?;

        let last = self.layers.len() - 1;
        let mut layers = Vec::with_capacity(self.layers.len());
        for (number, cfg) in self.layers.iter().enumerate() {
            let layer = if number == last {
                Layer::output(number, cfg.size, cfg.initial_weight, cfg.has_bias)
            } else {
                let mut layer = Layer::new(number, cfg.size, cfg.initial_weight, cfg.has_bias);
                layer.initialize_weights(self.layers[number + 1].size, rng)?;
                layer
            };
            layers.push(layer);
        }

        info!(layers = layers.len(), "built layer stack");
        Ok(layers)
    }
}

/// Loads a network configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into a [`NetworkConfig`] and
/// validates it.
///
/// # Examples
///
/// ```no_run
/// use feedforward_layer::config::load_config;
///
/// let cfg = load_config("config/xor_network.json").unwrap();
/// assert_eq!(cfg.layers.len(), 3);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<NetworkConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses and validates a network configuration from a JSON string.
pub fn parse_config(contents: &str) -> Result<NetworkConfig, ConfigError> {
    let config: NetworkConfig = serde_json::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &NetworkConfig) -> Result<(), ConfigError> {
    if config.layers.is_empty() {
        return Err(ConfigError::Invalid(
            "at least one layer is required".to_string(),
        ));
    }

    for (number, layer) in config.layers.iter().enumerate() {
        if layer.size == 0 {
            return Err(ConfigError::Invalid(format!(
                "layer {} size must be positive",
                number
            )));
        }
        if !layer.initial_weight.is_finite() || layer.initial_weight <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "layer {} initial_weight must be finite and positive, got {}",
                number, layer.initial_weight
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_bias_defaults_to_true() {
        let cfg = parse_config(r#"{ "layers": [ { "size": 3, "initial_weight": 0.1 } ] }"#)
            .unwrap();
        assert!(cfg.layers[0].has_bias);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_empty_layers_rejected() {
        let result = parse_config(r#"{ "layers": [] }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_single_layer_is_output() {
        let cfg = parse_config(r#"{ "seed": 1, "layers": [ { "size": 3, "initial_weight": 0.1 } ] }"#)
            .unwrap();
        let mut rng = cfg.seed_rng();
        let layers = cfg.build_layers(&mut rng).unwrap();

        assert_eq!(layers.len(), 1);
        assert!(layers[0].is_terminal());
        assert!(!layers[0].has_weights());
    }
}
