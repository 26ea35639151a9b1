//! Structural/combinatorial match score.
//!
//! Historical draws have characteristic sum, adjacent-difference, and
//! consecutive-pair statistics. For each candidate number, form the
//! hypothetical set "latest draw plus this number" and score how close its
//! statistics land to the historical means. Numbers already in the latest
//! draw score only through the closeness of the unmodified draw.

use super::Indicator;
use crate::domain::{DrawRecord, ScoreMap};

#[derive(Debug, Clone)]
pub struct Structural;

/// (sum, mean adjacent difference, consecutive-pair count) of a sorted set.
fn set_stats(numbers: &[u8]) -> (f64, f64, f64) {
    let sum: f64 = numbers.iter().map(|&n| n as f64).sum();
    let diffs: Vec<f64> = numbers
        .windows(2)
        .map(|w| (w[1] - w[0]) as f64)
        .collect();
    let mean_diff = if diffs.is_empty() {
        0.0
    } else {
        diffs.iter().sum::<f64>() / diffs.len() as f64
    };
    let consecutive = numbers.windows(2).filter(|w| w[1] - w[0] == 1).count() as f64;
    (sum, mean_diff, consecutive)
}

impl Indicator for Structural {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn min_periods(&self) -> usize {
        5
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let n_draws = history.len() as f64;
        let mut mean_sum = 0.0;
        let mut mean_diff = 0.0;
        let mut mean_consec = 0.0;
        for draw in history {
            let (s, d, c) = set_stats(&draw.numbers);
            mean_sum += s;
            mean_diff += d;
            mean_consec += c;
        }
        mean_sum /= n_draws;
        mean_diff /= n_draws;
        mean_consec /= n_draws;

        let latest = &history[0];
        ScoreMap::from_fn(|n| {
            let mut hypo: Vec<u8> = latest.numbers.to_vec();
            if !latest.contains(n) {
                hypo.push(n);
                hypo.sort_unstable();
            }
            let (s, d, c) = set_stats(&hypo);
            // Normalized distances; a 7-number set inflates the raw sum, so
            // compare per-number averages instead of totals.
            let sum_dist = (s / hypo.len() as f64 - mean_sum / 6.0).abs() / (mean_sum / 6.0);
            let diff_dist = (d - mean_diff).abs() / mean_diff.max(1.0);
            let consec_dist = (c - mean_consec).abs();
            100.0 / (1.0 + sum_dist * 10.0 + diff_dist * 5.0 + consec_dist)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_draws;

    #[test]
    fn stats_of_known_set() {
        let (s, d, c) = set_stats(&[1, 2, 3, 10, 20, 30]);
        assert_eq!(s, 66.0);
        assert!((d - 29.0 / 5.0).abs() < 1e-12);
        assert_eq!(c, 2.0);
    }

    #[test]
    fn all_scores_positive_and_bounded() {
        let history = make_draws(20);
        let map = Structural.compute(&history);
        for (_, s) in map.iter() {
            assert!(s > 0.0 && s <= 100.0);
        }
    }

    #[test]
    fn typical_addition_beats_outlier_addition() {
        let history = make_draws(20);
        let map = Structural.compute(&history);
        // Latest draw is {1..6}; adding 49 stretches sum and spacing far
        // more than adding 8 does.
        assert!(map.get(8) > map.get(49));
    }
}
