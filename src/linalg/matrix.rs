//! Dense row-major matrix built from [`Vector`] rows

use std::fmt;

use rand::Rng;

use super::vector::Vector;
use crate::error::{Error, Result};

/// Rectangular 2D array of real numbers
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vector>,
}

fn shape_str(rows: usize, cols: usize) -> String {
    format!("{}x{}", rows, cols)
}

impl Matrix {
    /// Create a zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: (0..rows).map(|_| Vector::zeros(cols)).collect(),
        }
    }

    /// Create a matrix with elements drawn uniformly from [-1, 1].
    ///
    /// Not reproducible; see [`Matrix::random_with`].
    pub fn random(rows: usize, cols: usize) -> Self {
        Self::random_with(rows, cols, &mut rand::thread_rng())
    }

    /// Create a random matrix from an explicit generator
    pub fn random_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self {
            rows,
            cols,
            data: (0..rows).map(|_| Vector::random_with(cols, rng)).collect(),
        }
    }

    /// Build from explicit rows; every row must have the same length.
    ///
    /// `cols` must be given so that a matrix with zero rows still has a shape.
    pub fn from_rows(cols: usize, rows: Vec<Vector>) -> Result<Self> {
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(Error::shape_mismatch("matrix rows", cols, bad.len()));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows,
        })
    }

    /// Outer product `a ⊗ b`: `m[i][j] = a[i] * b[j]`
    pub fn outer(a: &Vector, b: &Vector) -> Self {
        Self {
            rows: a.len(),
            cols: b.len(),
            data: a.iter().map(|&ai| b.scale(ai)).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Bounds-checked row access
    pub fn row(&self, i: usize) -> Result<&Vector> {
        self.data.get(i).ok_or(Error::IndexOutOfBounds {
            index: i,
            len: self.rows,
        })
    }

    /// Bounds-checked element read
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.row(i)?.get(j)
    }

    /// Bounds-checked element write
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        let rows = self.rows;
        self.data
            .get_mut(i)
            .ok_or(Error::IndexOutOfBounds { index: i, len: rows })?
            .set(j, value)
    }

    pub fn iter_rows(&self) -> std::slice::Iter<'_, Vector> {
        self.data.iter()
    }

    fn check_same_shape(&self, other: &Matrix, operation: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::shape_mismatch(
                operation,
                shape_str(self.rows, self.cols),
                shape_str(other.rows, other.cols),
            ));
        }
        Ok(())
    }

    /// Element-wise sum
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix add")?;
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a.add(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { data, ..*self })
    }

    /// Element-wise difference `self - other`
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix sub")?;
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a.sub(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { data, ..*self })
    }

    /// Multiply every element by `k`
    pub fn scale(&self, k: f64) -> Matrix {
        Self {
            data: self.data.iter().map(|r| r.scale(k)).collect(),
            ..*self
        }
    }

    /// Divide every element by `k`
    pub fn div_scalar(&self, k: f64) -> Matrix {
        self.scale(1.0 / k)
    }

    /// Matrix-vector product; `v` must have `cols` elements
    pub fn mat_vec(&self, v: &Vector) -> Result<Vector> {
        if v.len() != self.cols {
            return Err(Error::shape_mismatch("matrix-vector product", self.cols, v.len()));
        }
        let values = self
            .data
            .iter()
            .map(|row| row.dot(v))
            .collect::<Result<Vec<_>>>()?;
        Ok(Vector::from_vec(values))
    }

    /// New matrix with rows and columns swapped
    pub fn transpose(&self) -> Matrix {
        let data = (0..self.cols)
            .map(|j| {
                Vector::from_vec(self.data.iter().map(|row| row.as_slice()[j]).collect())
            })
            .collect();
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// In-place `self -= rate * other`
    pub fn sub_scaled_assign(&mut self, other: &Matrix, rate: f64) -> Result<()> {
        self.check_same_shape(other, "matrix update")?;
        for (row, grad) in self.data.iter_mut().zip(other.data.iter()) {
            row.sub_scaled_assign(grad, rate)?;
        }
        Ok(())
    }
}

/// One row per line, values space-separated
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(
            3,
            vec![
                Vector::from_vec(vec![1.0, 2.0, 3.0]),
                Vector::from_vec(vec![4.0, 5.0, 6.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![Vector::zeros(3), Vector::zeros(2)];
        assert!(matches!(
            Matrix::from_rows(3, rows),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_mat_vec() {
        let m = sample();
        let v = Vector::from_vec(vec![1.0, 0.0, -1.0]);
        assert_eq!(m.mat_vec(&v).unwrap().as_slice(), &[-2.0, -2.0]);

        let bad = Vector::zeros(2);
        assert!(matches!(m.mat_vec(&bad), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(0, 1).unwrap(), 4.0);
        assert_eq!(t.get(2, 0).unwrap(), 3.0);
        assert_eq!(t.transpose(), sample());
    }

    #[test]
    fn test_add_sub_scale() {
        let m = sample();
        let doubled = m.add(&m).unwrap();
        assert_eq!(doubled, m.scale(2.0));
        assert_eq!(doubled.sub(&m).unwrap(), m);
        assert_eq!(doubled.div_scalar(2.0), m);
        assert!(matches!(
            m.add(&m.transpose()),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_outer() {
        let a = Vector::from_vec(vec![1.0, 2.0]);
        let b = Vector::from_vec(vec![3.0, 4.0, 5.0]);
        let m = Matrix::outer(&a, &b);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 2).unwrap(), 10.0);
    }

    #[test]
    fn test_bounds_checked_access() {
        let mut m = Matrix::zeros(2, 2);
        m.set(1, 1, 3.0).unwrap();
        assert_eq!(m.get(1, 1).unwrap(), 3.0);
        assert!(matches!(m.get(2, 0), Err(Error::IndexOutOfBounds { .. })));
        assert!(matches!(m.set(0, 2, 1.0), Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "1 2 3\n4 5 6");
    }
}
