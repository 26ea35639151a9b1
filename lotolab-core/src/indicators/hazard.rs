//! Survival-analysis hazard score.
//!
//! Ratio of the current absence gap to the number's historical mean
//! inter-appearance gap, scaled by 10. A number overdue relative to its own
//! rhythm scores above 10; one drawn more recently than its rhythm scores
//! below. Numbers with fewer than two appearances fall back to the uniform
//! expected gap (49/6 periods).

use super::{current_gap, inter_appearance_gaps, Indicator};
use crate::domain::{DrawRecord, ScoreMap, DRAW_SIZE, MAX_NUMBER};

#[derive(Debug, Clone)]
pub struct Hazard;

impl Indicator for Hazard {
    fn name(&self) -> &'static str {
        "hazard"
    }

    fn min_periods(&self) -> usize {
        8
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let uniform_gap = MAX_NUMBER as f64 / DRAW_SIZE as f64;
        ScoreMap::from_fn(|n| {
            let gap = current_gap(history, n).unwrap_or(history.len()) as f64;
            let gaps = inter_appearance_gaps(history, n);
            let mean_gap = if gaps.is_empty() {
                uniform_gap
            } else {
                gaps.iter().sum::<usize>() as f64 / gaps.len() as f64
            };
            gap / mean_gap.max(1.0) * 10.0
        })
    }
}
