//! Neural Network Implementation
//!
//! Feedforward network with per-example gradient descent training

use std::fmt::Write as _;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::activation::ActivationType;
use super::cost::{batch_cost, cost};
use super::layer::{DenseLayer, LayerGradient};
use super::training::{EpochStats, TrainingConfig, TrainingObserver, TrainingReport};
use crate::error::{Error, Result};
use crate::linalg::Vector;

/// Neural Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    pub layer_sizes: Vec<usize>,
    pub activations: Vec<ActivationType>,
}

impl NetworkConfig {
    pub fn new(input_size: usize) -> Self {
        Self {
            layer_sizes: vec![input_size],
            activations: vec![],
        }
    }

    /// Add a hidden layer
    pub fn add_layer(mut self, size: usize, activation: ActivationType) -> Self {
        self.layer_sizes.push(size);
        self.activations.push(activation);
        self
    }

    /// Set output layer
    pub fn output_layer(self, size: usize, activation: ActivationType) -> Self {
        self.add_layer(size, activation)
    }

    /// Every layer uses `activation`
    pub fn uniform(
        input_size: usize,
        hidden_sizes: &[usize],
        output_size: usize,
        activation: ActivationType,
    ) -> Self {
        hidden_sizes
            .iter()
            .fold(Self::new(input_size), |config, &size| {
                config.add_layer(size, activation)
            })
            .output_layer(output_size, activation)
    }

    /// Check the configuration describes at least one layer of non-zero width
    pub fn validate(&self) -> Result<()> {
        if self.activations.is_empty() {
            return Err(Error::Config("network needs at least one layer".to_string()));
        }
        if self.layer_sizes.len() != self.activations.len() + 1 {
            return Err(Error::Config(format!(
                "{} layer sizes for {} activations",
                self.layer_sizes.len(),
                self.activations.len()
            )));
        }
        if let Some(pos) = self.layer_sizes.iter().position(|&s| s == 0) {
            return Err(Error::Config(format!("layer size {} is zero", pos)));
        }
        Ok(())
    }
}

/// Feedforward Neural Network
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    layers: Vec<DenseLayer>,
}

impl NeuralNetwork {
    /// Create a randomly initialized all-sigmoid network
    pub fn new(input_size: usize, hidden_sizes: &[usize], output_size: usize) -> Result<Self> {
        Self::from_config(&NetworkConfig::uniform(
            input_size,
            hidden_sizes,
            output_size,
            ActivationType::Sigmoid,
        ))
    }

    /// Create network from configuration
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        Self::from_config_with_rng(config, &mut rand::thread_rng())
    }

    /// Create network from configuration with an explicit generator
    pub fn from_config_with_rng<R: Rng + ?Sized>(
        config: &NetworkConfig,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        let layers = config
            .layer_sizes
            .windows(2)
            .zip(config.activations.iter())
            .map(|(sizes, &activation)| DenseLayer::with_rng(sizes[0], sizes[1], activation, &mut *rng))
            .collect();
        Self::from_layers(layers)
    }

    /// Assemble a network from existing layers.
    ///
    /// Adjacent layers must chain: each layer's output size is the next
    /// layer's input size.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::Config("network needs at least one layer".to_string()));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                debug!(layer = i + 1, "layer chain broken");
                return Err(Error::shape_mismatch(
                    "layer chain",
                    pair[0].output_size(),
                    pair[1].input_size(),
                ));
            }
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    /// Input size followed by every layer's output size
    pub fn topology(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(DenseLayer::output_size))
            .collect()
    }

    /// Forward pass through the network.
    ///
    /// The input size is checked before any layer runs, so a rejected input
    /// leaves every layer cache untouched.
    pub fn forward(&mut self, input: &Vector) -> Result<Vector> {
        if input.len() != self.input_size() {
            return Err(Error::shape_mismatch(
                "network forward",
                self.input_size(),
                input.len(),
            ));
        }
        let mut output = input.clone();
        for layer in &mut self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Raw output scores for an input; only the per-layer caches change
    pub fn predict(&mut self, input: &Vector) -> Result<Vector> {
        self.forward(input)
    }

    fn check_target(&self, target: &Vector) -> Result<()> {
        if target.len() != self.output_size() {
            return Err(Error::shape_mismatch(
                "network target",
                self.output_size(),
                target.len(),
            ));
        }
        Ok(())
    }

    /// Backpropagation: gradients of the example's cost for every layer,
    /// ordered like the layers. Runs one forward pass; parameters are not
    /// modified.
    pub fn compute_gradients(
        &mut self,
        input: &Vector,
        target: &Vector,
    ) -> Result<Vec<LayerGradient>> {
        self.check_target(target)?;
        let output = self.forward(input)?;

        let last = self.layers.len() - 1;
        let mut delta = self.layers[last].delta(&output.sub(target)?)?;
        let mut gradients = Vec::with_capacity(self.layers.len());

        for i in (0..self.layers.len()).rev() {
            gradients.push(self.layers[i].gradients(&delta)?);
            if i > 0 {
                let propagated = self.layers[i].backpropagate(&delta)?;
                delta = self.layers[i - 1].delta(&propagated)?;
            }
        }

        gradients.reverse();
        Ok(gradients)
    }

    /// Apply one gradient per layer; all shapes are checked first so a bad
    /// gradient set leaves the network unchanged.
    pub fn apply_gradients(&mut self, gradients: &[LayerGradient], learning_rate: f64) -> Result<()> {
        if gradients.len() != self.layers.len() {
            return Err(Error::shape_mismatch(
                "gradient count",
                self.layers.len(),
                gradients.len(),
            ));
        }
        for (layer, grad) in self.layers.iter().zip(gradients.iter()) {
            let expected = layer.weights().shape();
            if grad.weights.shape() != expected || grad.biases.len() != layer.output_size() {
                return Err(Error::shape_mismatch(
                    "gradient shape",
                    format!("{}x{}", expected.0, expected.1),
                    format!("{}x{}", grad.weights.rows(), grad.weights.cols()),
                ));
            }
        }
        for (layer, grad) in self.layers.iter_mut().zip(gradients.iter()) {
            layer.apply_gradient(grad, learning_rate)?;
        }
        Ok(())
    }

    /// One stochastic gradient descent step on a single example
    pub fn learn(&mut self, input: &Vector, target: &Vector, learning_rate: f64) -> Result<()> {
        let gradients = self.compute_gradients(input, target)?;
        self.apply_gradients(&gradients, learning_rate)
    }

    fn check_dataset(&self, inputs: &[Vector], targets: &[Vector]) -> Result<()> {
        if inputs.len() != targets.len() {
            return Err(Error::shape_mismatch(
                "dataset",
                format!("{} targets", inputs.len()),
                format!("{} targets", targets.len()),
            ));
        }
        if let Some(bad) = inputs.iter().find(|x| x.len() != self.input_size()) {
            return Err(Error::shape_mismatch(
                "dataset input",
                self.input_size(),
                bad.len(),
            ));
        }
        if let Some(bad) = targets.iter().find(|y| y.len() != self.output_size()) {
            return Err(Error::shape_mismatch(
                "dataset target",
                self.output_size(),
                bad.len(),
            ));
        }
        Ok(())
    }

    /// Mean cost of the network's predictions over a dataset
    pub fn evaluate(&mut self, inputs: &[Vector], targets: &[Vector]) -> Result<f64> {
        self.check_dataset(inputs, targets)?;
        let outputs = inputs
            .iter()
            .map(|x| self.predict(x))
            .collect::<Result<Vec<_>>>()?;
        batch_cost(targets, &outputs)
    }

    /// Fraction of examples whose cost is below `threshold`.
    ///
    /// This is a coarse proxy, not label matching: the same convention is
    /// used for scalar and one-hot targets. Returns `0.0` for an empty set.
    pub fn accuracy(&mut self, inputs: &[Vector], targets: &[Vector], threshold: f64) -> Result<f64> {
        self.check_dataset(inputs, targets)?;
        if inputs.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for (x, y) in inputs.iter().zip(targets.iter()) {
            let output = self.predict(x)?;
            if cost(y, &output)? < threshold {
                correct += 1;
            }
        }
        Ok(correct as f64 / inputs.len() as f64)
    }

    /// Train the network.
    ///
    /// Each epoch calls [`learn`](Self::learn) once per example in the given
    /// order, then reports training cost and accuracy to `observer`. Runs for
    /// `config.epochs` epochs, or fewer when `config.early_stop_cost` is set
    /// and reached.
    pub fn train<O: TrainingObserver + ?Sized>(
        &mut self,
        inputs: &[Vector],
        targets: &[Vector],
        config: &TrainingConfig,
        observer: &mut O,
    ) -> Result<TrainingReport> {
        config.validate()?;
        self.check_dataset(inputs, targets)?;

        let mut report = TrainingReport {
            history: Vec::with_capacity(config.epochs),
            stopped_early: false,
        };

        for epoch in 0..config.epochs {
            for (x, y) in inputs.iter().zip(targets.iter()) {
                self.learn(x, y, config.learning_rate)?;
            }

            let stats = EpochStats {
                epoch,
                cost: self.evaluate(inputs, targets)?,
                accuracy: self.accuracy(inputs, targets, config.accuracy_threshold)?,
            };
            if !stats.cost.is_finite() {
                warn!(epoch, "training cost is not finite");
            }
            observer.on_epoch(&stats);
            report.history.push(stats);

            if let Some(target_cost) = config.early_stop_cost {
                if stats.cost < target_cost {
                    info!(
                        epoch,
                        cost = stats.cost,
                        "cost below early-stop threshold, stopping"
                    );
                    report.stopped_early = true;
                    break;
                }
            }
        }

        Ok(report)
    }

    /// Get total number of parameters
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(DenseLayer::num_parameters).sum()
    }

    /// Human-readable network summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Neural Network Summary");
        let _ = writeln!(out, "======================");
        let _ = writeln!(out, "Input size: {}", self.input_size());
        for (i, layer) in self.layers.iter().enumerate() {
            let _ = writeln!(
                out,
                "Layer {}: {} -> {} ({}), params: {}",
                i + 1,
                layer.input_size(),
                layer.output_size(),
                layer.activation(),
                layer.num_parameters()
            );
        }
        let _ = writeln!(out, "======================");
        let _ = write!(out, "Total parameters: {}", self.num_parameters());
        out
    }
}
