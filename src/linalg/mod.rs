//! Linear Algebra Module
//!
//! Minimal vector and matrix primitives used by the network:
//! - `Vector`: fixed-length sequence of `f64`
//! - `Matrix`: rectangular matrix stored as rows of `Vector`

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
