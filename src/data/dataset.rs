//! In-memory dataset of input/target vector pairs

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::linalg::Vector;

/// Parallel input and target vectors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub inputs: Vec<Vector>,
    pub targets: Vec<Vector>,
}

impl Dataset {
    /// Build a dataset; both sides must have the same number of examples and
    /// every vector on a side must have the same length.
    pub fn new(inputs: Vec<Vector>, targets: Vec<Vector>) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(Error::Data(format!(
                "{} inputs but {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        check_uniform(&inputs, "input")?;
        check_uniform(&targets, "target")?;
        Ok(Self { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Width of the input vectors, `None` for an empty dataset
    pub fn input_size(&self) -> Option<usize> {
        self.inputs.first().map(Vector::len)
    }

    /// Width of the target vectors, `None` for an empty dataset
    pub fn target_size(&self) -> Option<usize> {
        self.targets.first().map(Vector::len)
    }

    /// Shuffle examples in place, keeping pairs together
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);
        self.inputs = order.iter().map(|&i| self.inputs[i].clone()).collect();
        self.targets = order.iter().map(|&i| self.targets[i].clone()).collect();
    }

    /// Shuffled train/test split; the train part holds
    /// `floor(len * train_fraction)` examples.
    pub fn split<R: Rng + ?Sized>(&self, train_fraction: f64, rng: &mut R) -> Result<(Dataset, Dataset)> {
        if !(0.0..=1.0).contains(&train_fraction) {
            return Err(Error::Data(format!(
                "train fraction must be within [0, 1], got {}",
                train_fraction
            )));
        }
        let mut shuffled = self.clone();
        shuffled.shuffle(rng);

        let train_len = (self.len() as f64 * train_fraction).floor() as usize;
        let test_inputs = shuffled.inputs.split_off(train_len);
        let test_targets = shuffled.targets.split_off(train_len);
        let test = Dataset {
            inputs: test_inputs,
            targets: test_targets,
        };
        Ok((shuffled, test))
    }

    /// Replace scalar class-index targets by one-hot vectors
    pub fn one_hot_targets(&mut self, classes: usize) -> Result<()> {
        self.targets = self
            .targets
            .iter()
            .map(|t| match t.as_slice() {
                [label] => one_hot(*label, classes),
                other => Err(Error::Data(format!(
                    "one-hot encoding needs a single label per example, got {}",
                    other.len()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }
}

fn check_uniform(vectors: &[Vector], what: &str) -> Result<()> {
    if let Some(first) = vectors.first() {
        if let Some(bad) = vectors.iter().position(|v| v.len() != first.len()) {
            return Err(Error::Data(format!(
                "{} {} has {} values, expected {}",
                what,
                bad,
                vectors[bad].len(),
                first.len()
            )));
        }
    }
    Ok(())
}

/// One-hot vector of length `classes` with a 1 at `label`
pub fn one_hot(label: f64, classes: usize) -> Result<Vector> {
    if label.fract() != 0.0 || label < 0.0 || label >= classes as f64 {
        return Err(Error::Data(format!(
            "label {} is not a class index below {}",
            label, classes
        )));
    }
    let mut v = Vector::zeros(classes);
    v.set(label as usize, 1.0)?;
    Ok(v)
}
