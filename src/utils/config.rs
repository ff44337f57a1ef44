//! Configuration management
//!
//! This module handles loading and managing configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::nn::{ActivationType, NetworkConfig, TrainingConfig};

/// Network topology configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkSection {
    pub input_size: usize,
    pub hidden_sizes: Vec<usize>,
    pub output_size: usize,
    pub hidden_activation: String,
    pub output_activation: String,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            input_size: 4,
            hidden_sizes: vec![8],
            output_size: 1,
            hidden_activation: "sigmoid".to_string(),
            output_activation: "sigmoid".to_string(),
        }
    }
}

impl NetworkSection {
    /// Build the layer-by-layer network description
    pub fn to_network_config(&self) -> Result<NetworkConfig> {
        let hidden: ActivationType = self.hidden_activation.parse()?;
        let output: ActivationType = self.output_activation.parse()?;

        let config = self
            .hidden_sizes
            .iter()
            .fold(NetworkConfig::new(self.input_size), |cfg, &size| {
                cfg.add_layer(size, hidden)
            })
            .output_layer(self.output_size, output);
        config.validate()?;
        Ok(config)
    }
}

/// Feature scaling applied before training
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMethod {
    #[default]
    None,
    MinMax,
    Standard,
}

/// Data configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataSection {
    pub path: Option<PathBuf>,
    pub label_columns: Vec<usize>,
    pub one_hot_classes: Option<usize>,
    pub normalize: NormalizeMethod,
    pub train_fraction: f64,
    pub seed: Option<u64>,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            path: None,
            label_columns: Vec::new(),
            one_hot_classes: None,
            normalize: NormalizeMethod::None,
            train_fraction: 0.8,
            seed: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub network: NetworkSection,
    pub training: TrainingConfig,
    pub data: DataSection,
    pub logging: LoggingSection,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file or use default
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.network.to_network_config()?;
        self.training.validate()?;
        if !(0.0..=1.0).contains(&self.data.train_fraction) {
            return Err(Error::Config(format!(
                "train_fraction must be within [0, 1], got {}",
                self.data.train_fraction
            )));
        }
        if self.data.one_hot_classes == Some(0) {
            return Err(Error::Config("one_hot_classes must be positive".to_string()));
        }
        if let Some(classes) = self.data.one_hot_classes {
            if classes != self.network.output_size {
                return Err(Error::Config(format!(
                    "one_hot_classes ({}) must equal the network output size ({})",
                    classes, self.network.output_size
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        let net = config.network.to_network_config().unwrap();
        assert_eq!(net.layer_sizes, vec![4, 8, 1]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.training.epochs = 42;
        config.training.early_stop_cost = Some(0.01);
        config.data.normalize = NormalizeMethod::MinMax;
        config.data.seed = Some(7);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file() {
        let text = r#"
[network]
input_size = 2
hidden_sizes = [3]
hidden_activation = "relu"

[data]
normalize = "standard"
"#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.network.output_size, 1);
        assert_eq!(config.training, TrainingConfig::default());
        assert_eq!(config.data.normalize, NormalizeMethod::Standard);

        let net = config.network.to_network_config().unwrap();
        assert_eq!(net.activations, vec![ActivationType::ReLU, ActivationType::Sigmoid]);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.network.hidden_activation = "softsign".to_string();
        assert!(matches!(config.validate(), Err(Error::UnknownActivation(_))));

        let mut config = Config::default();
        config.data.train_fraction = 2.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.data.one_hot_classes = Some(3);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_shipped_default_config() {
        let config: Config = toml::from_str(include_str!("../../config/default.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.data.label_columns, vec![4]);
        assert_eq!(config.training.early_stop_cost, Some(0.005));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config, Config::default());
    }
}
