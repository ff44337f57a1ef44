//! Activation Functions for Neural Networks
//!
//! Implements the supported activation functions and their derivatives
//! for use in backpropagation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::linalg::Vector;

/// Types of activation functions available
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivationType {
    /// Sigmoid: 1 / (1 + exp(-x))
    Sigmoid,
    /// Hyperbolic tangent
    Tanh,
    /// Rectified Linear Unit: max(0, x)
    ReLU,
}

impl ActivationType {
    /// Every supported activation, in persistence-name order
    pub const ALL: [ActivationType; 3] = [
        ActivationType::Sigmoid,
        ActivationType::Tanh,
        ActivationType::ReLU,
    ];

    /// Apply the activation to a single pre-activation value
    pub fn activate(self, x: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationType::Tanh => x.tanh(),
            ActivationType::ReLU => x.max(0.0),
        }
    }

    /// Derivative at a point, given both the activated value `y` and the raw
    /// pre-activation value `z` of the same unit.
    ///
    /// Sigmoid and tanh are expressed through `y`; ReLU reads the sign of `z`.
    pub fn derivative(self, activated: f64, pre_activation: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => activated * (1.0 - activated),
            ActivationType::Tanh => 1.0 - activated * activated,
            ActivationType::ReLU => {
                if pre_activation > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Apply the activation element-wise
    pub fn forward(self, z: &Vector) -> Vector {
        z.map(|v| self.activate(v))
    }

    /// Element-wise derivative for a cached forward pass
    pub fn backward(self, activated: &Vector, pre_activation: &Vector) -> Vector {
        Vector::from_vec(
            activated
                .iter()
                .zip(pre_activation.iter())
                .map(|(&y, &z)| self.derivative(y, z))
                .collect(),
        )
    }

    /// Name used in the model file format
    pub fn name(self) -> &'static str {
        match self {
            ActivationType::Sigmoid => "sigmoid",
            ActivationType::Tanh => "tanh",
            ActivationType::ReLU => "relu",
        }
    }
}

impl Default for ActivationType {
    fn default() -> Self {
        ActivationType::Sigmoid
    }
}

impl fmt::Display for ActivationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(ActivationType::Sigmoid),
            "tanh" => Ok(ActivationType::Tanh),
            "relu" => Ok(ActivationType::ReLU),
            _ => Err(Error::UnknownActivation(s.to_string())),
        }
    }
}
