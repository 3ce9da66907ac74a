//! Tests for the Layer public API
//!
//! This file covers:
//! - Activation assignment: reshape, bias augmentation, shape errors
//! - Weight initialization: shape, range, determinism, invalid dimensions
//! - Forward propagation: known values, identity fallback, batches
//! - Regularization view and weight iteration

use approx::assert_relative_eq;
use feedforward_layer::utils::{sigmoid, SimpleRng};
use feedforward_layer::{Layer, LayerError, LayerKind, Matrix};

// ============================================================================
// Activation Store Tests
// ============================================================================

mod activation_tests {
    use super::*;

    #[test]
    fn test_bias_round_trip() {
        let mut layer = Layer::new(0, 3, 0.1, true);
        layer.set_activation(&[0.1, 0.2, 0.3]).unwrap();

        let a = layer.activation();
        assert_eq!(a.shape(), (1, 4));
        assert_eq!(a.as_slice(), &[1.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_indivisible_buffer_is_shape_error() {
        let mut layer = Layer::new(0, 3, 0.1, true);
        assert_eq!(
            layer.set_activation(&[0.1, 0.2, 0.3, 0.4]),
            Err(LayerError::Shape { len: 4, size: 3 })
        );
    }

    #[test]
    fn test_bias_column_all_ones_for_batches() {
        let mut layer = Layer::new(0, 2, 0.1, true);
        let data: Vec<f64> = (0..20).map(|i| i as f64 * -0.37).collect();
        layer.set_activation(&data).unwrap();

        assert_eq!(layer.examples(), 10);
        assert_eq!(layer.activation().cols(), layer.size() + 1);
        assert!(layer.activation().column(0).all(|v| v == 1.0));
    }

    #[test]
    fn test_no_bias_keeps_columns() {
        let mut layer = Layer::new(0, 2, 0.1, false);
        layer.set_activation(&[5.0, 6.0, 7.0, 8.0]).unwrap();

        assert_eq!(layer.activation().shape(), (2, 2));
        assert_eq!(layer.activation().as_slice(), &[5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_reassignment_replaces_wholesale() {
        let mut layer = Layer::new(0, 1, 0.1, true);
        layer.set_activation(&[1.0, 2.0, 3.0]).unwrap();
        layer.set_activation(&[9.0]).unwrap();

        assert_eq!(layer.activation().as_slice(), &[1.0, 9.0]);
    }
}

// ============================================================================
// Weight Initialization Tests
// ============================================================================

mod initialization_tests {
    use super::*;

    #[test]
    fn test_shape_with_bias() {
        let mut rng = SimpleRng::new(42);
        let mut layer = Layer::new(0, 4, 0.3, true);
        layer.initialize_weights(6, &mut rng).unwrap();

        assert_eq!(layer.weights().unwrap().shape(), (5, 6));
        assert_eq!(layer.next_size(), Some(6));
        assert_eq!(layer.parameter_count(), 30);
    }

    #[test]
    fn test_entries_in_range() {
        let mut rng = SimpleRng::new(7);
        let mut layer = Layer::new(0, 30, 0.12, true);
        layer.initialize_weights(20, &mut rng).unwrap();

        for &w in layer.weights().unwrap().as_slice() {
            assert!((0.0..0.12).contains(&w), "Weight {} outside [0, 0.12)", w);
        }
    }

    #[test]
    fn test_same_seed_same_weights() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);
        let mut layer1 = Layer::new(0, 5, 1.0, true);
        let mut layer2 = Layer::new(0, 5, 1.0, true);
        layer1.initialize_weights(3, &mut rng1).unwrap();
        layer2.initialize_weights(3, &mut rng2).unwrap();

        assert_eq!(layer1.weights(), layer2.weights());
    }

    #[test]
    fn test_zero_next_size() {
        let mut rng = SimpleRng::new(1);
        let mut layer = Layer::new(0, 3, 1.0, true);

        assert_eq!(
            layer.initialize_weights(0, &mut rng),
            Err(LayerError::InvalidDimension {
                name: "next_size",
                value: 0,
            })
        );
        assert!(!layer.has_weights());
    }

    #[test]
    fn test_output_layer_kind() {
        let mut rng = SimpleRng::new(1);
        let mut layer = Layer::output(4, 3, 1.0, true);

        assert_eq!(layer.kind(), LayerKind::Output);
        assert!(layer.is_terminal());
        assert_eq!(
            layer.initialize_weights(2, &mut rng),
            Err(LayerError::TerminalLayer { layer_number: 4 })
        );
    }
}

// ============================================================================
// Forward Propagation Tests
// ============================================================================

mod propagation_tests {
    use super::*;

    #[test]
    fn test_scenario_no_bias_two_by_two() {
        let mut rng = SimpleRng::new(42);
        let mut layer = Layer::new(0, 2, 0.5, false);
        layer.initialize_weights(2, &mut rng).unwrap();

        let w = layer.weights().unwrap().clone();
        assert_eq!(w.shape(), (2, 2));
        assert!(w.as_slice().iter().all(|&v| (0.0..0.5).contains(&v)));

        layer.set_activation(&[1.0, 2.0]).unwrap();
        let out = layer.propagate().unwrap();

        assert_eq!(out.shape(), (1, 2));
        for j in 0..2 {
            let z = w.get(0, j).unwrap() + 2.0 * w.get(1, j).unwrap();
            let value = out.get(0, j).unwrap();
            assert_relative_eq!(value, sigmoid(z), epsilon = 1e-12);
            assert!(value > 0.0 && value < 1.0);
        }
    }

    #[test]
    fn test_known_weights_with_bias() {
        let mut rng = SimpleRng::new(1);
        let mut layer = Layer::new(0, 1, 1.0, true);
        layer.initialize_weights(1, &mut rng).unwrap();
        layer.set_weight_at(0, 0, -1.0).unwrap();
        layer.set_weight_at(1, 0, 2.0).unwrap();

        layer.set_activation(&[0.5, 1.5]).unwrap();
        let out = layer.propagate().unwrap();

        // z = -1 + 2x: 0.0 and 2.0
        assert_relative_eq!(out.get(0, 0).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.get(1, 0).unwrap(), sigmoid(2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_identity_without_weights() {
        let mut layer = Layer::new(0, 3, 0.1, true);
        layer.set_activation(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();

        assert_eq!(&layer.propagate().unwrap(), layer.activation());
    }

    #[test]
    fn test_identity_for_output_layer() {
        let mut layer = Layer::output(2, 2, 0.1, false);
        layer.set_activation(&[0.9, 0.1]).unwrap();

        assert_eq!(layer.propagate().unwrap().as_slice(), &[0.9, 0.1]);
    }

    #[test]
    fn test_batch_output_shape_and_range() {
        let mut rng = SimpleRng::new(99);
        let mut layer = Layer::new(0, 3, 2.0, true);
        layer.initialize_weights(5, &mut rng).unwrap();

        let data: Vec<f64> = (0..24).map(|i| (i as f64 - 12.0) * 3.0).collect();
        layer.set_activation(&data).unwrap();
        let out = layer.propagate().unwrap();

        assert_eq!(out.shape(), (8, 5));
        assert!(out.as_slice().iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_chained_layers() {
        let mut rng = SimpleRng::new(3);
        let mut first = Layer::new(0, 2, 0.5, true);
        let mut second = Layer::new(1, 3, 0.5, true);
        first.initialize_weights(3, &mut rng).unwrap();

        first.set_activation(&[0.0, 1.0, 1.0, 0.0]).unwrap();
        let hidden = first.propagate().unwrap();
        second.set_activation(hidden.as_slice()).unwrap();

        assert_eq!(second.activation().shape(), (2, 4));
        assert!(second.activation().column(0).all(|v| v == 1.0));
    }

    #[test]
    fn test_mismatched_product_is_reported() {
        let a = Matrix::zeros(1, 4);
        let w = Matrix::zeros(3, 2);
        assert!(matches!(
            a.matmul(&w),
            Err(LayerError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_activation_gradient() {
        let mut layer = Layer::output(0, 2, 0.1, false);
        layer.set_activation(&[0.5, 0.25]).unwrap();
        let grad = layer.activation_gradient();

        assert_relative_eq!(grad.get(0, 0).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(grad.get(0, 1).unwrap(), 0.1875, epsilon = 1e-12);
    }
}

// ============================================================================
// Regularization and Iteration Tests
// ============================================================================

mod regularization_tests {
    use super::*;

    #[test]
    fn test_bias_column_zeroed() {
        let mut rng = SimpleRng::new(5);
        let mut layer = Layer::new(0, 3, 1.0, true);
        layer.initialize_weights(4, &mut rng).unwrap();

        let view = layer.regularization_view().unwrap();
        let weights = layer.weights().unwrap();

        assert_eq!(view.shape(), weights.shape());
        assert!(view.column(0).all(|v| v == 0.0));
        for col in 1..weights.cols() {
            assert!(view.column(col).eq(weights.column(col)));
        }
        assert_ne!(view, *weights);
    }

    #[test]
    fn test_no_bias_copy_unmodified() {
        let mut rng = SimpleRng::new(5);
        let mut layer = Layer::new(0, 3, 1.0, false);
        layer.initialize_weights(2, &mut rng).unwrap();

        assert_eq!(&layer.regularization_view().unwrap(), layer.weights().unwrap());
    }

    #[test]
    fn test_missing_weights() {
        let layer = Layer::new(8, 3, 1.0, true);
        assert_eq!(
            layer.regularization_view(),
            Err(LayerError::MissingWeights { layer_number: 8 })
        );
    }

    #[test]
    fn test_view_does_not_alias() {
        let mut rng = SimpleRng::new(5);
        let mut layer = Layer::new(0, 1, 1.0, true);
        layer.initialize_weights(2, &mut rng).unwrap();

        let before = layer.weights().unwrap().clone();
        let _ = layer.regularization_view().unwrap();
        assert_eq!(layer.weights().unwrap(), &before);
    }

    #[test]
    fn test_iterate_weights_row_major_and_restartable() {
        let mut rng = SimpleRng::new(11);
        let mut layer = Layer::new(0, 2, 1.0, true);
        layer.initialize_weights(2, &mut rng).unwrap();

        let expected: Vec<Option<f64>> = layer
            .weights()
            .unwrap()
            .as_slice()
            .iter()
            .map(|&w| Some(w))
            .collect();
        assert_eq!(layer.iterate_weights().count(), 6);
        assert_eq!(layer.iterate_weights().collect::<Vec<_>>(), expected);
        assert_eq!(layer.iterate_weights().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_iterate_without_weights_yields_sentinel() {
        let layer = Layer::new(0, 2, 1.0, true);
        assert_eq!(layer.iterate_weights().collect::<Vec<_>>(), vec![None]);
    }

    #[test]
    fn test_optimizer_mutates_in_place() {
        let mut rng = SimpleRng::new(11);
        let mut layer = Layer::new(0, 2, 1.0, false);
        layer.initialize_weights(3, &mut rng).unwrap();

        if let Some(weights) = layer.weights_mut() {
            for w in weights.as_mut_slice() {
                *w -= 0.5;
            }
        }
        assert_eq!(layer.weights().unwrap().shape(), (2, 3));
        assert!(layer.weights().unwrap().as_slice().iter().all(|&w| w < 0.5));
    }
}
