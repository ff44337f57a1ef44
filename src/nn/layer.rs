//! Dense (Fully Connected) Layer Implementation
//!
//! A dense layer performs: output = activation(weights · input + biases)

use rand::Rng;
use tracing::debug;

use super::activation::ActivationType;
use crate::error::{Error, Result};
use crate::linalg::{Matrix, Vector};

/// Gradient of the cost with respect to one layer's parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradient {
    /// Same shape as the layer weights (output_size x input_size)
    pub weights: Matrix,
    /// Same length as the layer biases
    pub biases: Vector,
}

/// Dense layer with weights, biases, and activation function
#[derive(Debug, Clone)]
pub struct DenseLayer {
    /// Weight matrix (output_size x input_size)
    weights: Matrix,
    /// Bias vector (output_size)
    biases: Vector,
    /// Activation function type
    activation: ActivationType,

    // Cached values of the most recent forward pass, zero before the first one
    last_input: Vector,
    last_z: Vector,
    last_output: Vector,
}

impl DenseLayer {
    /// Create a new dense layer with weights and biases uniform in [-1, 1]
    pub fn new(input_size: usize, output_size: usize, activation: ActivationType) -> Self {
        Self::with_rng(input_size, output_size, activation, &mut rand::thread_rng())
    }

    /// Create a randomly initialized layer from an explicit generator
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: ActivationType,
        rng: &mut R,
    ) -> Self {
        let weights = Matrix::random_with(output_size, input_size, rng);
        let biases = Vector::random_with(output_size, rng);
        debug!(input_size, output_size, %activation, "initialized dense layer");
        Self::assemble(weights, biases, activation)
    }

    /// Create a layer from explicit parameters.
    ///
    /// `biases` must have one entry per weight row.
    pub fn from_parts(weights: Matrix, biases: Vector, activation: ActivationType) -> Result<Self> {
        if biases.len() != weights.rows() {
            return Err(Error::shape_mismatch(
                "layer biases",
                weights.rows(),
                biases.len(),
            ));
        }
        Ok(Self::assemble(weights, biases, activation))
    }

    fn assemble(weights: Matrix, biases: Vector, activation: ActivationType) -> Self {
        let (output_size, input_size) = weights.shape();
        Self {
            weights,
            biases,
            activation,
            last_input: Vector::zeros(input_size),
            last_z: Vector::zeros(output_size),
            last_output: Vector::zeros(output_size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    /// Number of neurons
    pub fn output_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Vector {
        &self.biases
    }

    pub fn activation(&self) -> ActivationType {
        self.activation
    }

    /// Input seen by the most recent forward pass
    pub fn last_input(&self) -> &Vector {
        &self.last_input
    }

    /// Activated output of the most recent forward pass
    pub fn last_output(&self) -> &Vector {
        &self.last_output
    }

    /// Forward pass through the layer.
    ///
    /// Overwrites the cached input; a backward step must use the caches of the
    /// same example's forward pass.
    pub fn forward(&mut self, input: &Vector) -> Result<Vector> {
        if input.len() != self.input_size() {
            return Err(Error::shape_mismatch(
                "layer forward",
                self.input_size(),
                input.len(),
            ));
        }

        // Linear transformation: z = weights · input + biases
        let z = self.weights.mat_vec(input)?.add(&self.biases)?;
        let output = self.activation.forward(&z);

        self.last_input = input.clone();
        self.last_z = z;
        self.last_output = output.clone();
        Ok(output)
    }

    /// Activation derivative at the cached forward pass
    pub fn activation_derivative(&self) -> Vector {
        self.activation.backward(&self.last_output, &self.last_z)
    }

    /// Turn an upstream error (∂cost/∂output) into this layer's delta
    /// (∂cost/∂z) using the cached forward pass.
    pub fn delta(&self, upstream: &Vector) -> Result<Vector> {
        upstream.hadamard(&self.activation_derivative())
    }

    /// Parameter gradients for a delta of this layer
    pub fn gradients(&self, delta: &Vector) -> Result<LayerGradient> {
        if delta.len() != self.output_size() {
            return Err(Error::shape_mismatch(
                "layer gradient",
                self.output_size(),
                delta.len(),
            ));
        }
        Ok(LayerGradient {
            weights: Matrix::outer(delta, &self.last_input),
            biases: delta.clone(),
        })
    }

    /// Propagate a delta back to this layer's input: weightsᵀ · delta
    pub fn backpropagate(&self, delta: &Vector) -> Result<Vector> {
        self.weights.transpose().mat_vec(delta)
    }

    /// Gradient descent step: parameters -= rate * gradient.
    ///
    /// Both shapes are checked before anything is modified.
    pub fn apply_gradient(&mut self, gradient: &LayerGradient, rate: f64) -> Result<()> {
        if gradient.weights.shape() != self.weights.shape() {
            let (r, c) = gradient.weights.shape();
            return Err(Error::shape_mismatch(
                "apply gradient",
                format!("{}x{}", self.output_size(), self.input_size()),
                format!("{}x{}", r, c),
            ));
        }
        if gradient.biases.len() != self.biases.len() {
            return Err(Error::shape_mismatch(
                "apply gradient",
                self.biases.len(),
                gradient.biases.len(),
            ));
        }
        self.weights.sub_scaled_assign(&gradient.weights, rate)?;
        self.biases.sub_scaled_assign(&gradient.biases, rate)?;
        Ok(())
    }

    /// Get number of parameters
    pub fn num_parameters(&self) -> usize {
        self.weights.rows() * self.weights.cols() + self.biases.len()
    }
}
