//! Neural Network Module
//!
//! Provides building blocks for feedforward neural networks:
//! - Activation functions (Sigmoid, Tanh, ReLU)
//! - Dense layers with forward and backward propagation
//! - Full network with training capabilities and a text model format

pub mod activation;
pub mod cost;
pub mod layer;
pub mod network;
pub mod persistence;
pub mod ranking;
pub mod training;

pub use activation::ActivationType;
pub use cost::{batch_cost, cost};
pub use layer::{DenseLayer, LayerGradient};
pub use network::{NetworkConfig, NeuralNetwork};
pub use persistence::{read_model, write_model};
pub use ranking::{rank_scores, RankedScore};
pub use training::{EpochStats, LogObserver, TrainingConfig, TrainingObserver, TrainingReport};
