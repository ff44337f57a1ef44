//! Error types for the feedforward network library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Operand dimensions are incompatible for the requested operation
    #[error("Shape mismatch in {operation}: expected {expected}, got {got}")]
    ShapeMismatch {
        operation: &'static str,
        expected: String,
        got: String,
    },

    /// Out-of-range element access on a vector or matrix
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Activation name that does not map to a known activation function
    #[error("Unknown activation function: {0:?}")]
    UnknownActivation(String),

    /// Malformed persisted model
    #[error("Corrupt model file at line {line}: {reason}")]
    CorruptModelFile { line: usize, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset construction or preprocessing error
    #[error("Data error: {0}")]
    Data(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Shorthand for a [`Error::ShapeMismatch`] built from anything printable
    pub fn shape_mismatch(
        operation: &'static str,
        expected: impl ToString,
        got: impl ToString,
    ) -> Self {
        Error::ShapeMismatch {
            operation,
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    /// Shorthand for a [`Error::CorruptModelFile`]
    pub fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        Error::CorruptModelFile {
            line,
            reason: reason.into(),
        }
    }

    /// Whether the error came from malformed or mismatched dimensions
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Error::ShapeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = Error::shape_mismatch("dot", 3, 4);
        assert_eq!(err.to_string(), "Shape mismatch in dot: expected 3, got 4");
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_corrupt_message() {
        let err = Error::corrupt(7, "expected 3 weights, found 2");
        assert_eq!(
            err.to_string(),
            "Corrupt model file at line 7: expected 3 weights, found 2"
        );
        assert!(!err.is_shape_error());
    }
}
