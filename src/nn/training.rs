//! Training configuration and progress reporting
//!
//! The training loop reports once per epoch through a [`TrainingObserver`],
//! leaving presentation to the caller.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Hyperparameters and stopping policy for [`NeuralNetwork::train`]
///
/// [`NeuralNetwork::train`]: super::NeuralNetwork::train
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    /// Hard upper bound on the number of epochs
    pub epochs: usize,
    /// An example counts as correct when its cost is below this value
    pub accuracy_threshold: f64,
    /// Stop after the first epoch whose mean cost drops below this value
    pub early_stop_cost: Option<f64>,
    /// `LogObserver` logs every n-th epoch (the last epoch is always logged)
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            epochs: 100,
            accuracy_threshold: 0.05,
            early_stop_cost: None,
            log_every: 1,
        }
    }
}

impl TrainingConfig {
    pub fn new(learning_rate: f64, epochs: usize) -> Self {
        Self {
            learning_rate,
            epochs,
            ..Self::default()
        }
    }

    pub fn with_accuracy_threshold(mut self, threshold: f64) -> Self {
        self.accuracy_threshold = threshold;
        self
    }

    pub fn with_early_stop(mut self, cost: f64) -> Self {
        self.early_stop_cost = Some(cost);
        self
    }

    pub fn with_log_every(mut self, n: usize) -> Self {
        self.log_every = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.accuracy_threshold > 0.0) {
            return Err(Error::Config(format!(
                "accuracy_threshold must be positive, got {}",
                self.accuracy_threshold
            )));
        }
        if let Some(cost) = self.early_stop_cost {
            if !(cost > 0.0) {
                return Err(Error::Config(format!(
                    "early_stop_cost must be positive, got {}",
                    cost
                )));
            }
        }
        Ok(())
    }
}

/// Training-set metrics after one epoch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EpochStats {
    /// Zero-based epoch index
    pub epoch: usize,
    /// Mean half-SSE cost over the training set
    pub cost: f64,
    /// Fraction of examples below the accuracy threshold
    pub accuracy: f64,
}

/// Receives progress once per epoch
pub trait TrainingObserver {
    fn on_epoch(&mut self, stats: &EpochStats);
}

/// Silent observer
impl TrainingObserver for () {
    fn on_epoch(&mut self, _stats: &EpochStats) {}
}

impl<F: FnMut(&EpochStats)> TrainingObserver for F {
    fn on_epoch(&mut self, stats: &EpochStats) {
        self(stats)
    }
}

/// Observer that reports progress through `tracing`
#[derive(Debug, Clone)]
pub struct LogObserver {
    total_epochs: usize,
    every: usize,
}

impl LogObserver {
    pub fn new(total_epochs: usize, every: usize) -> Self {
        Self {
            total_epochs,
            every: every.max(1),
        }
    }

    pub fn for_config(config: &TrainingConfig) -> Self {
        Self::new(config.epochs, config.log_every)
    }
}

impl TrainingObserver for LogObserver {
    fn on_epoch(&mut self, stats: &EpochStats) {
        let n = stats.epoch + 1;
        if n % self.every == 0 || n == self.total_epochs {
            info!(
                "Epoch {}/{}: cost = {:.6}, accuracy = {:.2}%",
                n,
                self.total_epochs,
                stats.cost,
                stats.accuracy * 100.0
            );
        }
    }
}

/// Outcome of a training run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    pub history: Vec<EpochStats>,
    pub stopped_early: bool,
}

impl TrainingReport {
    pub fn epochs_run(&self) -> usize {
        self.history.len()
    }

    pub fn final_stats(&self) -> Option<&EpochStats> {
        self.history.last()
    }

    pub fn initial_cost(&self) -> Option<f64> {
        self.history.first().map(|s| s.cost)
    }

    pub fn final_cost(&self) -> Option<f64> {
        self.history.last().map(|s| s.cost)
    }
}
