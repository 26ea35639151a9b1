//! Pairwise appearance correlation.
//!
//! Score: average Pearson correlation between a number's appearance series
//! and those of the latest draw's numbers, shifted into the positive range.
//! Numbers that historically co-move with what just came out score highest.

use super::{appearance_series, Indicator};
use crate::domain::{DrawRecord, ScoreMap, MAX_NUMBER};

#[derive(Debug, Clone)]
pub struct PairCorrelation {
    pub window: usize,
}

impl Default for PairCorrelation {
    fn default() -> Self {
        Self { window: 50 }
    }
}

/// Pearson correlation of two equal-length series; 0.0 when either side is
/// constant.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean_a = a[..n].iter().sum::<f64>() / nf;
    let mean_b = b[..n].iter().sum::<f64>() / nf;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a <= f64::EPSILON || var_b <= f64::EPSILON {
        return 0.0;
    }
    cov / (var_a * var_b).sqrt()
}

impl Indicator for PairCorrelation {
    fn name(&self) -> &'static str {
        "correlation"
    }

    fn min_periods(&self) -> usize {
        10
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let window = &history[..history.len().min(self.window)];
        let series: Vec<Vec<f64>> = (1..=MAX_NUMBER as u8)
            .map(|n| appearance_series(window, n))
            .collect();
        let latest = &history[0];

        ScoreMap::from_fn(|n| {
            let own = &series[n as usize - 1];
            let mut total = 0.0;
            let mut count = 0;
            for &m in &latest.numbers {
                if m == n {
                    continue; // self-correlation is trivially 1
                }
                total += pearson(own, &series[m as usize - 1]);
                count += 1;
            }
            if count == 0 {
                return 0.0;
            }
            // Shift [-1,1] → [0,100]
            (total / count as f64 + 1.0) * 50.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_draws;

    #[test]
    fn pearson_of_identical_series_is_one() {
        let s = [1.0, 0.0, 1.0, 0.0, 1.0];
        assert!((pearson(&s, &s) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_opposite_series_is_minus_one() {
        let a = [1.0, 0.0, 1.0, 0.0];
        let b = [0.0, 1.0, 0.0, 1.0];
        assert!((pearson(&a, &b) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_correlates_zero() {
        let a = [1.0, 1.0, 1.0];
        let b = [1.0, 0.0, 1.0];
        assert_eq!(pearson(&a, &b), 0.0);
    }

    #[test]
    fn comoving_number_scores_high() {
        let history = make_draws(30);
        let map = PairCorrelation::default().compute(&history);
        // Numbers 2..6 share every draw with 1 (all offsets of the same
        // period pattern), and 1 is in the latest draw.
        assert!(map.get(2) > 50.0);
    }
}
