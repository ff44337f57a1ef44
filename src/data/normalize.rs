//! Data Normalization Utilities
//!
//! Provides per-feature normalization methods for neural network input

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::linalg::Vector;

/// Normalizer trait
pub trait Normalizer {
    /// Fit the normalizer to training data
    fn fit(&mut self, data: &[Vector]) -> Result<()>;

    /// Transform data using fitted parameters
    fn transform(&self, data: &[Vector]) -> Result<Vec<Vector>>;

    /// Fit and transform in one step
    fn fit_transform(&mut self, data: &[Vector]) -> Result<Vec<Vector>> {
        self.fit(data)?;
        self.transform(data)
    }

    /// Inverse transform to original scale
    fn inverse_transform(&self, data: &[Vector]) -> Result<Vec<Vector>>;
}

fn not_fitted() -> Error {
    Error::Data("normalizer not fitted".to_string())
}

fn feature_width(data: &[Vector]) -> Result<usize> {
    let width = data
        .first()
        .map(Vector::len)
        .ok_or_else(|| Error::Data("cannot fit a normalizer on an empty dataset".to_string()))?;
    if data.iter().any(|v| v.len() != width) {
        return Err(Error::Data("rows have different widths".to_string()));
    }
    Ok(width)
}

/// Apply `f(value, feature_index)` to every element, checking widths
fn map_features(data: &[Vector], width: usize, f: impl Fn(f64, usize) -> f64) -> Result<Vec<Vector>> {
    data.iter()
        .map(|row| {
            if row.len() != width {
                return Err(Error::shape_mismatch("normalize", width, row.len()));
            }
            Ok(Vector::from_vec(
                row.iter().enumerate().map(|(j, &v)| f(v, j)).collect(),
            ))
        })
        .collect()
}

/// Min-Max normalization to [0, 1] range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxNormalizer {
    pub min: Option<Vec<f64>>,
    pub range: Option<Vec<f64>>,
    #[serde(default)]
    fixed: bool,
}

impl MinMaxNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer for data with a known range shared by every feature,
    /// e.g. pixel intensities in `[0, 255]`. `fit` is a no-op for it.
    pub fn with_bounds(min: f64, max: f64, width: usize) -> Self {
        let range = if (max - min).abs() < 1e-10 { 1.0 } else { max - min };
        Self {
            min: Some(vec![min; width]),
            range: Some(vec![range; width]),
            fixed: true,
        }
    }

    fn params(&self) -> Result<(&[f64], &[f64])> {
        match (&self.min, &self.range) {
            (Some(min), Some(range)) => Ok((min, range)),
            _ => Err(not_fitted()),
        }
    }
}

impl Normalizer for MinMaxNormalizer {
    fn fit(&mut self, data: &[Vector]) -> Result<()> {
        if self.fixed {
            return Ok(());
        }
        let width = feature_width(data)?;

        let mut min = vec![f64::INFINITY; width];
        let mut max = vec![f64::NEG_INFINITY; width];
        for row in data {
            for (j, &v) in row.iter().enumerate() {
                min[j] = min[j].min(v);
                max[j] = max[j].max(v);
            }
        }
        // Avoid division by zero
        let range = min
            .iter()
            .zip(max.iter())
            .map(|(lo, hi)| if (hi - lo).abs() < 1e-10 { 1.0 } else { hi - lo })
            .collect();

        self.min = Some(min);
        self.range = Some(range);
        Ok(())
    }

    fn transform(&self, data: &[Vector]) -> Result<Vec<Vector>> {
        let (min, range) = self.params()?;
        map_features(data, min.len(), |v, j| (v - min[j]) / range[j])
    }

    fn inverse_transform(&self, data: &[Vector]) -> Result<Vec<Vector>> {
        let (min, range) = self.params()?;
        map_features(data, min.len(), |v, j| v * range[j] + min[j])
    }
}

/// Standard (Z-score) normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardNormalizer {
    pub mean: Option<Vec<f64>>,
    pub std: Option<Vec<f64>>,
}

impl StandardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn params(&self) -> Result<(&[f64], &[f64])> {
        match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => Ok((mean, std)),
            _ => Err(not_fitted()),
        }
    }
}

impl Normalizer for StandardNormalizer {
    fn fit(&mut self, data: &[Vector]) -> Result<()> {
        let width = feature_width(data)?;
        let n = data.len() as f64;

        let mut mean = vec![0.0; width];
        for row in data {
            for (j, &v) in row.iter().enumerate() {
                mean[j] += v / n;
            }
        }

        let mut std = vec![0.0; width];
        for row in data {
            for (j, &v) in row.iter().enumerate() {
                std[j] += (v - mean[j]).powi(2) / n;
            }
        }
        // Avoid division by zero
        let std = std
            .into_iter()
            .map(|var| {
                let s = var.sqrt();
                if s < 1e-10 {
                    1.0
                } else {
                    s
                }
            })
            .collect();

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    fn transform(&self, data: &[Vector]) -> Result<Vec<Vector>> {
        let (mean, std) = self.params()?;
        map_features(data, mean.len(), |v, j| (v - mean[j]) / std[j])
    }

    fn inverse_transform(&self, data: &[Vector]) -> Result<Vec<Vector>> {
        let (mean, std) = self.params()?;
        map_features(data, mean.len(), |v, j| v * std[j] + mean[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rows(values: &[[f64; 2]]) -> Vec<Vector> {
        values.iter().map(|r| Vector::from_vec(r.to_vec())).collect()
    }

    #[test]
    fn test_minmax_normalizer() {
        let mut normalizer = MinMaxNormalizer::new();
        let data = rows(&[[0.0, 10.0], [5.0, 20.0], [10.0, 30.0], [15.0, 40.0]]);

        let normalized = normalizer.fit_transform(&data).unwrap();

        // Check range [0, 1]
        assert!(normalized.iter().flat_map(|r| r.iter()).all(|&v| (0.0..=1.0).contains(&v)));
        assert_relative_eq!(normalized[1].get(0).unwrap(), 1.0 / 3.0, epsilon = 1e-12);

        // Check inverse
        let reconstructed = normalizer.inverse_transform(&normalized).unwrap();
        for (a, b) in data.iter().zip(reconstructed.iter()) {
            for (x, y) in a.iter().zip(b.iter()) {
                assert_relative_eq!(x, y, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_minmax_fixed_bounds() {
        let mut normalizer = MinMaxNormalizer::with_bounds(0.0, 255.0, 2);
        let data = rows(&[[0.0, 255.0], [51.0, 102.0]]);
        let normalized = normalizer.fit_transform(&data).unwrap();
        assert_relative_eq!(normalized[0].get(1).unwrap(), 1.0);
        assert_relative_eq!(normalized[1].get(0).unwrap(), 0.2);

        // A width mismatch is reported by transform
        assert!(normalizer.transform(&[Vector::zeros(3)]).is_err());
    }

    #[test]
    fn test_standard_normalizer() {
        let mut normalizer = StandardNormalizer::new();
        let data = rows(&[[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]]);

        let normalized = normalizer.fit_transform(&data).unwrap();

        // Check mean is approximately 0
        for j in 0..2 {
            let mean: f64 = normalized.iter().map(|r| r.get(j).unwrap()).sum::<f64>() / 4.0;
            assert!(mean.abs() < 1e-10);
        }

        // Check inverse
        let reconstructed = normalizer.inverse_transform(&normalized).unwrap();
        for (a, b) in data.iter().zip(reconstructed.iter()) {
            for (x, y) in a.iter().zip(b.iter()) {
                assert_relative_eq!(x, y, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_constant_feature() {
        let mut normalizer = StandardNormalizer::new();
        let data = rows(&[[3.0, 1.0], [3.0, 2.0]]);
        let normalized = normalizer.fit_transform(&data).unwrap();
        assert_eq!(normalized[0].get(0).unwrap(), 0.0);
    }

    #[test]
    fn test_unfitted_and_empty() {
        let normalizer = StandardNormalizer::new();
        assert!(matches!(
            normalizer.transform(&rows(&[[1.0, 2.0]])),
            Err(Error::Data(_))
        ));
        assert!(MinMaxNormalizer::new().fit(&[]).is_err());
    }
}
