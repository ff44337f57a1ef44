//! CSV data loading
//!
//! The first row is a header. Selected columns become the target vector and
//! the remaining columns the input vector, both in file order.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dataset::Dataset;
use crate::error::{Error, Result};
use crate::linalg::Vector;

/// How to turn CSV columns into inputs and targets
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CsvOptions {
    /// Zero-based indices of the target columns
    pub label_columns: Vec<usize>,
    /// Numeric values for non-numeric cells (e.g. class names)
    #[serde(default)]
    pub label_map: HashMap<String, f64>,
}

impl CsvOptions {
    pub fn new(label_columns: Vec<usize>) -> Self {
        Self {
            label_columns,
            label_map: HashMap::new(),
        }
    }

    pub fn with_label(mut self, name: impl Into<String>, value: f64) -> Self {
        self.label_map.insert(name.into(), value);
        self
    }

    fn cell_value(&self, cell: &str, row: usize, col: usize) -> Result<f64> {
        let cell = cell.trim();
        cell.parse::<f64>()
            .ok()
            .or_else(|| self.label_map.get(cell).copied())
            .ok_or_else(|| {
                Error::Data(format!(
                    "row {}, column {}: cannot interpret {:?} as a number",
                    row, col, cell
                ))
            })
    }
}

/// Load a dataset from a CSV file
pub fn load_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Dataset> {
    let file = File::open(path.as_ref())?;
    let data = read_csv(file, options)?;
    debug!(
        path = %path.as_ref().display(),
        examples = data.len(),
        "loaded CSV dataset"
    );
    Ok(data)
}

/// Read a dataset from any CSV source
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let width = reader.headers()?.len();
    if let Some(&bad) = options.label_columns.iter().find(|&&c| c >= width) {
        return Err(Error::Data(format!(
            "label column {} out of range for {} columns",
            bad, width
        )));
    }

    let mut inputs = Vec::new();
    let mut targets = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let mut features = Vec::with_capacity(width);
        let mut labels = Vec::with_capacity(options.label_columns.len());
        for (col, cell) in record.iter().enumerate() {
            let value = options.cell_value(cell, row + 1, col)?;
            if options.label_columns.contains(&col) {
                labels.push(value);
            } else {
                features.push(value);
            }
        }
        inputs.push(Vector::from_vec(features));
        targets.push(Vector::from_vec(labels));
    }

    Dataset::new(inputs, targets)
}
