//! Data Module
//!
//! Provides data loading and preprocessing capabilities:
//! - Datasets of input/target vector pairs with shuffled splits
//! - CSV loading and one-hot label encoding
//! - Data normalization utilities

mod dataset;
mod loader;
mod normalize;

pub use dataset::{one_hot, Dataset};
pub use loader::{load_csv, read_csv, CsvOptions};
pub use normalize::{MinMaxNormalizer, Normalizer, StandardNormalizer};
