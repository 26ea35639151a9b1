//! Raw appearance frequency.
//!
//! Score: number of draws in the window containing the number.

use super::{appearance_count, Indicator};
use crate::domain::{DrawRecord, ScoreMap};

#[derive(Debug, Clone)]
pub struct Frequency;

impl Indicator for Frequency {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.is_empty() {
            return ScoreMap::zero();
        }
        ScoreMap::from_fn(|n| appearance_count(history, n) as f64)
    }
}
