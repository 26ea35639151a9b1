//! Extreme-value gap score.
//!
//! Compares the current absence gap to the number's historical maximum gap
//! and maps the ratio through an exceedance-probability approximation
//! `1 - exp(-ratio)`, scaled to [0, 100). A number at or past its historical
//! extreme approaches the asymptote; a freshly drawn number scores 0.

use super::{current_gap, inter_appearance_gaps, Indicator};
use crate::domain::{DrawRecord, ScoreMap};

#[derive(Debug, Clone)]
pub struct ExtremeGap;

impl Indicator for ExtremeGap {
    fn name(&self) -> &'static str {
        "extreme_gap"
    }

    fn min_periods(&self) -> usize {
        10
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        ScoreMap::from_fn(|n| {
            let gap = current_gap(history, n).unwrap_or(history.len()) as f64;
            let max_gap = inter_appearance_gaps(history, n)
                .into_iter()
                .max()
                .unwrap_or(history.len()) as f64;
            let ratio = gap / max_gap.max(1.0);
            (1.0 - (-ratio).exp()) * 100.0
        })
    }
}
