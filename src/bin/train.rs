//! Train a feedforward network on a CSV dataset
//!
//! Usage: cargo run --bin train -- --config config/default.toml --data banknotes.csv --output model.txt

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use feedforward_nn::data::{
    load_csv, CsvOptions, Dataset, MinMaxNormalizer, Normalizer, StandardNormalizer,
};
use feedforward_nn::utils::NormalizeMethod;
use feedforward_nn::{setup_logging, Config, LogObserver, NeuralNetwork};

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train a feedforward neural network with SGD")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Path to training data CSV (overrides config)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Number of epochs (overrides config)
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Learning rate (overrides config)
    #[arg(long)]
    lr: Option<f64>,

    /// Path to save the trained model
    #[arg(short, long, default_value = "model.txt")]
    output: PathBuf,

    /// Write per-epoch cost and accuracy as JSON
    #[arg(long)]
    history: Option<PathBuf>,
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("Failed to load config {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

/// Fit on the training inputs, then scale both splits with the same parameters
fn normalize(method: NormalizeMethod, train: &mut Dataset, test: &mut Dataset) -> Result<()> {
    let mut normalizer: Box<dyn Normalizer> = match method {
        NormalizeMethod::None => return Ok(()),
        NormalizeMethod::MinMax => Box::new(MinMaxNormalizer::new()),
        NormalizeMethod::Standard => Box::new(StandardNormalizer::new()),
    };
    train.inputs = normalizer.fit_transform(&train.inputs)?;
    test.inputs = normalizer.transform(&test.inputs)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    setup_logging(&config.logging.level);
    if !args.config.exists() {
        warn!("Config {} not found, using defaults", args.config.display());
    }

    if let Some(epochs) = args.epochs {
        config.training.epochs = epochs;
    }
    if let Some(lr) = args.lr {
        config.training.learning_rate = lr;
    }
    config.validate().context("Invalid configuration")?;

    let data_path = match args.data.or_else(|| config.data.path.clone()) {
        Some(path) => path,
        None => bail!("No data file given; pass --data or set data.path in the config"),
    };

    info!("Loading data from {}", data_path.display());
    let options = CsvOptions::new(config.data.label_columns.clone());
    let mut dataset = load_csv(&data_path, &options)
        .with_context(|| format!("Failed to load {}", data_path.display()))?;
    if let Some(classes) = config.data.one_hot_classes {
        dataset.one_hot_targets(classes)?;
    }
    info!("Loaded {} examples", dataset.len());

    let mut rng = match config.data.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (mut train, mut test) = dataset.split(config.data.train_fraction, &mut rng)?;
    normalize(config.data.normalize, &mut train, &mut test)?;
    info!("Train: {} examples, test: {} examples", train.len(), test.len());

    let network_config = config.network.to_network_config()?;
    let mut network = NeuralNetwork::from_config_with_rng(&network_config, &mut rng)?;
    if train.input_size() != Some(network.input_size()) {
        bail!(
            "Data has {:?} input columns but the network expects {}",
            train.input_size(),
            network.input_size()
        );
    }
    if train.target_size() != Some(network.output_size()) {
        bail!(
            "Data has {:?} target values but the network produces {}",
            train.target_size(),
            network.output_size()
        );
    }
    println!("{}", network.summary());

    let mut observer = LogObserver::for_config(&config.training);
    let report = network.train(&train.inputs, &train.targets, &config.training, &mut observer)?;
    if report.stopped_early {
        info!("Stopped early after {} epochs", report.epochs_run());
    }

    if !test.is_empty() {
        let cost = network.evaluate(&test.inputs, &test.targets)?;
        let accuracy =
            network.accuracy(&test.inputs, &test.targets, config.training.accuracy_threshold)?;
        info!(
            "Test cost = {:.6}, test accuracy = {:.2}%",
            cost,
            accuracy * 100.0
        );
    }

    network
        .save(&args.output)
        .with_context(|| format!("Failed to save model to {}", args.output.display()))?;
    info!("Model saved to {}", args.output.display());

    if let Some(path) = &args.history {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report.history)?;
        info!("Training history written to {}", path.display());
    }

    Ok(())
}
