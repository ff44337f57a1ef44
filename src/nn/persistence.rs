//! Text model format
//!
//! ```text
//! <layer count>
//! <size_0> <size_1> ... <size_n>
//! per layer:
//!     <output_size lines of input_size weights>
//!     <one line of output_size biases>
//!     <activation name>
//! ```
//!
//! Loading always builds a fresh network, so a malformed file never leaves a
//! half-updated network behind.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::activation::ActivationType;
use super::layer::DenseLayer;
use super::network::NeuralNetwork;
use crate::error::{Error, Result};
use crate::linalg::{Matrix, Vector};

/// Write a network in the text model format
pub fn write_model<W: Write>(network: &NeuralNetwork, mut writer: W) -> Result<()> {
    write!(writer, "{}", network)?;
    writer.flush()?;
    Ok(())
}

/// The text model format
impl fmt::Display for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.layers().len())?;
        let sizes: Vec<String> = self.topology().iter().map(ToString::to_string).collect();
        writeln!(f, "{}", sizes.join(" "))?;

        for layer in self.layers() {
            for row in layer.weights().iter_rows() {
                writeln!(f, "{}", row)?;
            }
            writeln!(f, "{}", layer.biases())?;
            writeln!(f, "{}", layer.activation())?;
        }
        Ok(())
    }
}

/// Line reader that tracks 1-based line numbers for error messages
struct Lines<R> {
    inner: std::io::Lines<R>,
    line: usize,
}

/// Non-text bytes are corrupt content rather than an I/O failure
fn read_error(line: usize, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::InvalidData {
        Error::corrupt(line, "line is not valid text")
    } else {
        Error::Io(err)
    }
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self, what: &str) -> Result<String> {
        self.line += 1;
        match self.inner.next() {
            Some(line) => line.map_err(|e| read_error(self.line, e)),
            None => Err(Error::corrupt(
                self.line,
                format!("unexpected end of file, expected {}", what),
            )),
        }
    }

    fn tokens<T: FromStr>(&mut self, what: &str, expected: Option<usize>) -> Result<Vec<T>> {
        let text = self.next_line(what)?;
        let line = self.line;
        let values = text
            .split_whitespace()
            .map(|tok| {
                tok.parse::<T>()
                    .map_err(|_| Error::corrupt(line, format!("invalid {} value {:?}", what, tok)))
            })
            .collect::<Result<Vec<T>>>()?;
        if let Some(n) = expected {
            if values.len() != n {
                return Err(Error::corrupt(
                    line,
                    format!("expected {} {} values, found {}", n, what, values.len()),
                ));
            }
        }
        Ok(values)
    }

    fn remaining_is_blank(&mut self) -> Result<()> {
        for text in self.inner.by_ref() {
            self.line += 1;
            let text = text.map_err(|e| read_error(self.line, e))?;
            if !text.trim().is_empty() {
                return Err(Error::corrupt(self.line, "unexpected trailing content"));
            }
        }
        Ok(())
    }
}

/// Parse a network from the text model format
pub fn read_model<R: BufRead>(reader: R) -> Result<NeuralNetwork> {
    let mut lines = Lines::new(reader);

    let layer_count = lines.tokens::<usize>("layer count", Some(1))?[0];
    if layer_count == 0 {
        return Err(Error::corrupt(1, "layer count must be at least 1"));
    }
    let size_count = layer_count
        .checked_add(1)
        .ok_or_else(|| Error::corrupt(1, "layer count too large"))?;
    let sizes = lines.tokens::<usize>("layer size", Some(size_count))?;
    if sizes.contains(&0) {
        return Err(Error::corrupt(lines.line, "layer sizes must be non-zero"));
    }

    let mut layers = Vec::with_capacity(layer_count);
    for (index, pair) in sizes.windows(2).enumerate() {
        let (input_size, output_size) = (pair[0], pair[1]);

        let rows = (0..output_size)
            .map(|_| lines.tokens::<f64>("weight", Some(input_size)).map(Vector::from_vec))
            .collect::<Result<Vec<_>>>()?;
        let biases = Vector::from_vec(lines.tokens::<f64>("bias", Some(output_size))?);

        let name = lines.next_line("activation name")?;
        let activation = ActivationType::from_str(&name).map_err(|_| {
            Error::corrupt(lines.line, format!("unknown activation {:?}", name.trim()))
        })?;

        let weights = Matrix::from_rows(input_size, rows)?;
        let layer = DenseLayer::from_parts(weights, biases, activation)?;
        debug!(layer = index, input_size, output_size, %activation, "parsed layer");
        layers.push(layer);
    }
    lines.remaining_is_blank()?;

    NeuralNetwork::from_layers(layers)
}

impl NeuralNetwork {
    /// Save model to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        write_model(self, BufWriter::new(file))?;
        debug!(path = %path.as_ref().display(), "saved model");
        Ok(())
    }

    /// Load model from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let network = read_model(BufReader::new(file))?;
        debug!(path = %path.as_ref().display(), topology = ?network.topology(), "loaded model");
        Ok(network)
    }

    /// Replace this network's layers with a saved model.
    ///
    /// On any error the current layers are kept.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Serialize to the text model format
    pub fn to_model_string(&self) -> String {
        self.to_string()
    }

    /// Parse the text model format
    pub fn from_model_str(text: &str) -> Result<Self> {
        read_model(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::NetworkConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TINY: &str = "1\n2 1\n0.5 -0.25\n0.1\nsigmoid\n";

    #[test]
    fn test_write_format() {
        let network = NeuralNetwork::from_model_str(TINY).unwrap();
        assert_eq!(network.to_model_string(), TINY);
    }

    #[test]
    fn test_round_trip_exact() {
        let config = NetworkConfig::new(3)
            .add_layer(4, ActivationType::ReLU)
            .add_layer(2, ActivationType::Tanh)
            .output_layer(2, ActivationType::Sigmoid);
        let mut rng = StdRng::seed_from_u64(9);
        let mut network = NeuralNetwork::from_config_with_rng(&config, &mut rng).unwrap();

        let mut restored = NeuralNetwork::from_model_str(&network.to_model_string()).unwrap();
        assert_eq!(restored.topology(), network.topology());

        let input = Vector::from_vec(vec![0.2, -0.4, 0.9]);
        assert_eq!(
            network.predict(&input).unwrap(),
            restored.predict(&input).unwrap()
        );
        for (a, b) in network.layers().iter().zip(restored.layers()) {
            assert_eq!(a.weights(), b.weights());
            assert_eq!(a.biases(), b.biases());
            assert_eq!(a.activation(), b.activation());
        }
    }

    fn corrupt_line(text: &str) -> usize {
        match NeuralNetwork::from_model_str(text) {
            Err(Error::CorruptModelFile { line, .. }) => line,
            other => panic!("expected CorruptModelFile, got {:?}", other.map(|n| n.topology())),
        }
    }

    #[test]
    fn test_short_weight_line() {
        assert_eq!(corrupt_line("1\n2 1\n0.5\n0.1\nsigmoid\n"), 3);
    }

    #[test]
    fn test_bad_number() {
        assert_eq!(corrupt_line("1\n2 1\n0.5 abc\n0.1\nsigmoid\n"), 3);
    }

    #[test]
    fn test_unknown_activation() {
        assert_eq!(corrupt_line("1\n2 1\n0.5 -0.25\n0.1\nswish\n"), 5);
    }

    #[test]
    fn test_missing_lines() {
        assert_eq!(corrupt_line(""), 1);
        assert_eq!(corrupt_line("1\n2 1\n0.5 -0.25\n"), 4);
        assert_eq!(corrupt_line("1\n2 1\n0.5 -0.25\n0.1\n"), 5);
    }

    #[test]
    fn test_bad_header() {
        assert_eq!(corrupt_line("0\n2\n"), 1);
        assert_eq!(corrupt_line("x\n"), 1);
        assert_eq!(corrupt_line("2\n2 1\n"), 2);
        assert_eq!(corrupt_line("1\n2 0\n"), 2);
    }

    #[test]
    fn test_huge_layer_count() {
        assert_eq!(corrupt_line(&format!("{}\n2 1\n", usize::MAX)), 1);
    }

    #[test]
    fn test_non_text_bytes() {
        let bytes: &[u8] = b"1\n2 1\n0.5 \xff\n0.1\nsigmoid\n";
        match read_model(bytes) {
            Err(Error::CorruptModelFile { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected CorruptModelFile, got {:?}", other.map(|n| n.topology())),
        }

        let trailing: &[u8] = b"1\n2 1\n0.5 -0.25\n0.1\nsigmoid\n\xfe\n";
        assert!(matches!(
            read_model(trailing),
            Err(Error::CorruptModelFile { line: 6, .. })
        ));
    }

    #[test]
    fn test_write_model_matches_display() {
        let network = NeuralNetwork::from_model_str(TINY).unwrap();
        let mut buf = Vec::new();
        write_model(&network, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), network.to_string());
    }

    #[test]
    fn test_trailing_content() {
        let with_blank = format!("{}\n\n", TINY);
        assert!(NeuralNetwork::from_model_str(&with_blank).is_ok());
        assert_eq!(corrupt_line(&format!("{}1 2 3\n", TINY)), 6);
    }

    #[test]
    fn test_reload_keeps_network_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "1\n2 1\n0.5\n").unwrap();

        let mut network = NeuralNetwork::from_model_str(TINY).unwrap();
        assert!(network.reload(&path).is_err());
        assert_eq!(network.to_model_string(), TINY);
    }
}
