//! Short-window pattern score.
//!
//! Looks only at the last few periods, weighting each appearance by the
//! reciprocal of its recency rank (latest period = rank 1). Captures hot
//! numbers without the long-tail dilution of the frequency indicator.

use super::Indicator;
use crate::domain::{DrawRecord, ScoreMap};

#[derive(Debug, Clone)]
pub struct ShortPattern {
    pub window: usize,
}

impl Default for ShortPattern {
    fn default() -> Self {
        Self { window: 10 }
    }
}

impl Indicator for ShortPattern {
    fn name(&self) -> &'static str {
        "short_pattern"
    }

    fn min_periods(&self) -> usize {
        3
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let mut map = ScoreMap::zero();
        for (age, draw) in history.iter().take(self.window).enumerate() {
            let weight = 1.0 / (age + 1) as f64;
            for &n in &draw.numbers {
                map.add(n, weight);
            }
        }
        map
    }
}
