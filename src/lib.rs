//! # Feedforward Neural Network
//!
//! A small, dependency-light implementation of fully connected neural
//! networks trained with per-example stochastic gradient descent.
//!
//! ## Modules
//!
//! - `linalg` - Dense `Vector` and `Matrix` types with checked shapes
//! - `nn` - Activations, layers, backpropagation, training and model files
//! - `data` - CSV loading, one-hot encoding, normalization and splits
//! - `utils` - Configuration and logging setup
//!
//! ## Example
//!
//! ```
//! use feedforward_nn::{NeuralNetwork, Vector};
//!
//! let mut network = NeuralNetwork::new(2, &[3], 1).unwrap();
//! let input = Vector::from_vec(vec![0.0, 1.0]);
//! let target = Vector::from_vec(vec![1.0]);
//!
//! network.learn(&input, &target, 0.5).unwrap();
//! let output = network.predict(&input).unwrap();
//! assert_eq!(output.len(), 1);
//! ```

pub mod data;
pub mod error;
pub mod linalg;
pub mod nn;
pub mod utils;

pub use error::{Error, Result};
pub use linalg::{Matrix, Vector};
pub use nn::{
    ActivationType, DenseLayer, EpochStats, LogObserver, NetworkConfig, NeuralNetwork,
    TrainingConfig, TrainingObserver, TrainingReport,
};
pub use utils::{setup_logging, Config};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
