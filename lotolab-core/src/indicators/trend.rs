//! Windowed trend score — favors "low but rising" numbers.
//!
//! Over the last `window` periods, each number's binary appearance series
//! (chronological order) gets a least-squares slope and a mean appearance
//! rate. A positive slope with a still-low mean scores highest:
//! `max(slope, 0) * (1 - mean) * 100`.

use super::Indicator;
use crate::domain::{DrawRecord, ScoreMap};

#[derive(Debug, Clone)]
pub struct Trend {
    pub window: usize,
}

impl Default for Trend {
    fn default() -> Self {
        Self { window: 15 }
    }
}

/// Least-squares slope of `values` against their indices.
pub fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    if den <= f64::EPSILON {
        0.0
    } else {
        num / den
    }
}

impl Indicator for Trend {
    fn name(&self) -> &'static str {
        "trend"
    }

    fn min_periods(&self) -> usize {
        self.window
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let window = &history[..self.window];
        ScoreMap::from_fn(|n| {
            // Chronological: oldest first, so a positive slope means the
            // number is appearing more often lately.
            let series: Vec<f64> = window
                .iter()
                .rev()
                .map(|d| if d.contains(n) { 1.0 } else { 0.0 })
                .collect();
            let slope = regression_slope(&series);
            let mean = series.iter().sum::<f64>() / series.len() as f64;
            slope.max(0.0) * (1.0 - mean) * 100.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DrawRecord;
    use chrono::NaiveDate;

    fn draws_from_patterns(patterns: &[[u8; 6]]) -> Vec<DrawRecord> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        patterns
            .iter()
            .enumerate()
            .map(|(i, nums)| {
                DrawRecord::new(
                    &format!("2024{:03}", patterns.len() - i),
                    base + chrono::Duration::weeks((patterns.len() - i) as i64),
                    *nums,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn slope_of_rising_series_is_positive() {
        assert!(regression_slope(&[0.0, 0.0, 1.0, 1.0]) > 0.0);
        assert!(regression_slope(&[1.0, 1.0, 0.0, 0.0]) < 0.0);
        assert_eq!(regression_slope(&[0.5]), 0.0);
    }

    #[test]
    fn rising_number_beats_fading_number() {
        // 5 appears only in recent periods (low indices = newest);
        // 9 appears only in the old half.
        let mut patterns = Vec::new();
        for i in 0..15u8 {
            if i < 5 {
                patterns.push([5, 20, 21, 22, 23, 24]);
            } else {
                patterns.push([9, 20, 21, 22, 23, 24]);
            }
        }
        let history = draws_from_patterns(&patterns);
        let map = Trend::default().compute(&history);
        assert!(map.get(5) > 0.0);
        assert_eq!(map.get(9), 0.0); // negative slope clamps to zero
    }

    #[test]
    fn saturated_number_scores_zero() {
        // 20 appears in every period: slope 0 → score 0.
        let patterns = vec![[20, 1, 2, 3, 4, 6]; 15];
        let history = draws_from_patterns(&patterns);
        let map = Trend::default().compute(&history);
        assert_eq!(map.get(20), 0.0);
    }
}
