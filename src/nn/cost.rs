//! Cost functions
//!
//! The network is trained on the half sum of squared errors, whose gradient
//! with respect to the output is simply `output - target`.

use crate::error::{Error, Result};
use crate::linalg::Vector;

/// Half sum of squared errors: `0.5 * Σ (target_i - output_i)²`
pub fn cost(target: &Vector, output: &Vector) -> Result<f64> {
    let error = target.sub(output)?;
    Ok(0.5 * error.dot(&error)?)
}

/// Mean of the per-example [`cost`] over a batch; `0.0` for an empty batch
pub fn batch_cost(targets: &[Vector], outputs: &[Vector]) -> Result<f64> {
    if targets.len() != outputs.len() {
        return Err(Error::shape_mismatch(
            "batch cost",
            targets.len(),
            outputs.len(),
        ));
    }
    if targets.is_empty() {
        return Ok(0.0);
    }
    let total = targets
        .iter()
        .zip(outputs.iter())
        .map(|(t, o)| cost(t, o))
        .sum::<Result<f64>>()?;
    Ok(total / targets.len() as f64)
}
