//! Prediction/outcome comparison and the per-step validation record.

use serde::{Deserialize, Serialize};

use lotolab_core::domain::{WeightVector, DRAW_SIZE};

/// Result of comparing one predicted set against the real draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    /// Numbers present in both sets, ascending.
    pub matched: Vec<u8>,
    pub hit_count: usize,
    /// hits / 6 (predicted size).
    pub accuracy: f64,
    /// hits / |actual|.
    pub coverage: f64,
    pub meets_target: bool,
}

/// Compare a predicted set to the actual draw.
///
/// `accuracy` is always against the nominal draw size, so a short prediction
/// is penalized rather than flattered.
pub fn compare_prediction(predicted: &[u8], actual: &[u8], target_hits: usize) -> Comparison {
    let mut matched: Vec<u8> = predicted
        .iter()
        .copied()
        .filter(|n| actual.contains(n))
        .collect();
    matched.sort_unstable();
    let hit_count = matched.len();
    let accuracy = hit_count as f64 / DRAW_SIZE as f64;
    let coverage = if actual.is_empty() {
        0.0
    } else {
        hit_count as f64 / actual.len() as f64
    };
    Comparison {
        matched,
        hit_count,
        accuracy,
        coverage,
        meets_target: hit_count >= target_hits,
    }
}

/// One backtest step's immutable result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// Most recent period of the training window.
    pub window_start: String,
    /// The predicted-for period.
    pub target_period: String,
    pub predicted: Vec<u8>,
    pub actual: Vec<u8>,
    pub hit_count: usize,
    pub accuracy: f64,
    pub coverage: f64,
    /// Strategy that produced the chosen candidate.
    pub strategy: String,
    /// Ensemble weights in force at this step.
    pub weights: WeightVector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overlap_counts_hits() {
        let c = compare_prediction(&[1, 2, 3, 4, 5, 6], &[3, 4, 5, 10, 11, 12], 3);
        assert_eq!(c.hit_count, 3);
        assert_eq!(c.matched, vec![3, 4, 5]);
        assert!((c.accuracy - 0.5).abs() < 1e-12);
        assert!((c.coverage - 0.5).abs() < 1e-12);
        assert!(c.meets_target);
    }

    #[test]
    fn no_overlap() {
        let c = compare_prediction(&[1, 2, 3, 4, 5, 6], &[7, 8, 9, 10, 11, 12], 3);
        assert_eq!(c.hit_count, 0);
        assert!(!c.meets_target);
        assert_eq!(c.accuracy, 0.0);
    }

    #[test]
    fn short_prediction_penalized_in_accuracy() {
        let c = compare_prediction(&[3, 4], &[3, 4, 5, 10, 11, 12], 3);
        assert_eq!(c.hit_count, 2);
        assert!((c.accuracy - 2.0 / 6.0).abs() < 1e-12);
        assert!((c.coverage - 2.0 / 6.0).abs() < 1e-12);
    }
}
