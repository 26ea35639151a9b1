//! Exponentially recency-weighted frequency.
//!
//! Each appearance contributes `decay^age`, age 0 = latest period, so a hit
//! last week counts far more than one from two years back.

use super::Indicator;
use crate::domain::{DrawRecord, ScoreMap};

#[derive(Debug, Clone)]
pub struct RecencyWeighted {
    pub decay: f64,
}

impl Default for RecencyWeighted {
    fn default() -> Self {
        Self { decay: 0.95 }
    }
}

impl Indicator for RecencyWeighted {
    fn name(&self) -> &'static str {
        "recency"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.is_empty() {
            return ScoreMap::zero();
        }
        let mut map = ScoreMap::zero();
        for (age, draw) in history.iter().enumerate() {
            let weight = self.decay.powi(age as i32);
            for &n in &draw.numbers {
                map.add(n, weight);
            }
        }
        map
    }
}
