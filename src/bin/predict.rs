//! Make predictions with a trained model
//!
//! Usage: cargo run --bin predict -- --model model.txt --values 3.6,8.6,-2.8,-0.4

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use feedforward_nn::data::{load_csv, CsvOptions};
use feedforward_nn::nn::rank_scores;
use feedforward_nn::{setup_logging, NeuralNetwork, Vector};

#[derive(Parser)]
#[command(name = "predict")]
#[command(about = "Make predictions with a trained model")]
struct Args {
    /// Path to trained model
    #[arg(short, long)]
    model: PathBuf,

    /// Comma-separated input values
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    values: Option<Vec<f64>>,

    /// CSV file of inputs (header row, one example per line)
    #[arg(short, long, conflicts_with = "values")]
    input: Option<PathBuf>,

    /// Columns of the CSV to ignore (e.g. known labels)
    #[arg(long, value_delimiter = ',')]
    skip_columns: Vec<usize>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn print_prediction(example: usize, output: &Vector) {
    println!("Example {}:", example);
    for ranked in rank_scores(output) {
        println!(
            "  output {:>3}: {:>10.6}  ({:>6.2}%)",
            ranked.index,
            ranked.score,
            ranked.share * 100.0
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let mut network = NeuralNetwork::load(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;

    let inputs = match (args.values, args.input) {
        (Some(values), _) => vec![Vector::from_vec(values)],
        (None, Some(path)) => {
            let options = CsvOptions::new(args.skip_columns);
            load_csv(&path, &options)
                .with_context(|| format!("Failed to load {}", path.display()))?
                .inputs
        }
        (None, None) => bail!("Pass either --values or --input"),
    };

    for (i, input) in inputs.iter().enumerate() {
        let output = network
            .predict(input)
            .with_context(|| format!("Example {} does not fit the model", i))?;
        print_prediction(i, &output);
    }

    Ok(())
}
