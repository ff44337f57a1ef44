//! Dense vector of `f64` values
//!
//! The length of a vector is fixed at creation. Every binary operation checks
//! sizes and reports [`Error::ShapeMismatch`] instead of truncating or
//! broadcasting.

use std::fmt;
use std::ops::{Mul, Neg};

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::{Error, Result};

/// Fixed-length ordered sequence of real numbers
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    values: Vec<f64>,
}

impl Vector {
    /// Create a zero-filled vector
    pub fn zeros(size: usize) -> Self {
        Self {
            values: vec![0.0; size],
        }
    }

    /// Create a vector with every element drawn uniformly from [-1, 1].
    ///
    /// Uses the thread-local generator, so the result is not reproducible.
    /// Use [`Vector::random_with`] to pass a seeded generator.
    pub fn random(size: usize) -> Self {
        Self::random_with(size, &mut rand::thread_rng())
    }

    /// Create a random vector from an explicit generator
    pub fn random_with<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let dist = Uniform::new_inclusive(-1.0, 1.0);
        Self {
            values: (0..size).map(|_| dist.sample(rng)).collect(),
        }
    }

    /// Wrap explicit values
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bounds-checked read
    pub fn get(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                index,
                len: self.values.len(),
            })
    }

    /// Bounds-checked write
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    fn check_same_len(&self, other: &Vector, operation: &'static str) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::shape_mismatch(operation, self.len(), other.len()));
        }
        Ok(())
    }

    fn zip_with(&self, other: &Vector, f: impl Fn(f64, f64) -> f64) -> Vector {
        Vector {
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Element-wise sum
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector add")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    /// Element-wise difference `self - other`
    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector sub")?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    /// Element-wise (Hadamard) product
    pub fn hadamard(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector hadamard")?;
        Ok(self.zip_with(other, |a, b| a * b))
    }

    /// Dot product
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_same_len(other, "vector dot")?;
        Ok(self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Multiply every element by `k`
    pub fn scale(&self, k: f64) -> Vector {
        self.map(|v| v * k)
    }

    /// Divide every element by `k`
    pub fn div_scalar(&self, k: f64) -> Vector {
        self.scale(1.0 / k)
    }

    /// Apply `f` to every element
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Vector {
        Vector {
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// In-place `self -= rate * other`
    pub fn sub_scaled_assign(&mut self, other: &Vector, rate: f64) -> Result<()> {
        self.check_same_len(other, "vector update")?;
        for (v, g) in self.values.iter_mut().zip(other.values.iter()) {
            *v -= rate * g;
        }
        Ok(())
    }

    /// Sum of all elements
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Index of the largest element (first one on ties), `None` when empty
    pub fn argmax(&self) -> Option<usize> {
        self.values
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

impl From<&[f64]> for Vector {
    fn from(values: &[f64]) -> Self {
        Self::from_vec(values.to_vec())
    }
}

impl Mul<f64> for &Vector {
    type Output = Vector;

    fn mul(self, k: f64) -> Vector {
        self.scale(k)
    }
}

impl Mul<&Vector> for f64 {
    type Output = Vector;

    fn mul(self, v: &Vector) -> Vector {
        v.scale(self)
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.scale(-1.0)
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Space-separated values using round-trip float formatting
impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}
