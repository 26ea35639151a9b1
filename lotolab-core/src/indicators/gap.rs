//! Log-scaled absence gap.
//!
//! Score: `ln(1 + periods since last seen) * 10`. Numbers absent from the
//! whole window use the window length as their gap.

use super::{current_gap, Indicator};
use crate::domain::{DrawRecord, ScoreMap};

#[derive(Debug, Clone)]
pub struct LogGap;

impl Indicator for LogGap {
    fn name(&self) -> &'static str {
        "log_gap"
    }

    fn min_periods(&self) -> usize {
        5
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        ScoreMap::from_fn(|n| {
            let gap = current_gap(history, n).unwrap_or(history.len());
            (1.0 + gap as f64).ln() * 10.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_draws;

    #[test]
    fn longer_absence_scores_higher() {
        let history = make_draws(30);
        let map = LogGap.compute(&history);
        // 1 was just drawn (gap 0); 7 never appears (gap = window length).
        assert_eq!(map.get(1), 0.0);
        assert!(map.get(7) > map.get(1));
        assert!((map.get(7) - (31.0f64).ln() * 10.0).abs() < 1e-9);
    }
}
