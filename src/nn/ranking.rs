//! Ranking of network outputs for display

use crate::linalg::Vector;

/// One output unit's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedScore {
    /// Output unit index (the class for one-hot targets)
    pub index: usize,
    pub score: f64,
    /// `score` divided by the sum of all scores; 0 when the sum is 0
    pub share: f64,
}

/// Output scores sorted highest first, each with its share of the total.
///
/// Only the presentation is normalized; the scores are the raw outputs.
pub fn rank_scores(output: &Vector) -> Vec<RankedScore> {
    let total = output.sum();
    let mut ranked: Vec<RankedScore> = output
        .iter()
        .enumerate()
        .map(|(index, &score)| RankedScore {
            index,
            score,
            share: if total == 0.0 { 0.0 } else { score / total },
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rank_scores() {
        let ranked = rank_scores(&Vector::from_vec(vec![0.1, 0.6, 0.3]));
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_relative_eq!(ranked[0].share, 0.6, epsilon = 1e-12);
        assert_relative_eq!(ranked.iter().map(|r| r.share).sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_total() {
        let ranked = rank_scores(&Vector::zeros(2));
        assert!(ranked.iter().all(|r| r.share == 0.0));
    }
}
