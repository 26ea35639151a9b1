//! One-step Markov transition score.
//!
//! Builds number-to-number transition counts from each historical draw to the
//! draw that followed it, then scores every candidate by the summed
//! transition probability out of the latest draw's numbers.

use super::Indicator;
use crate::domain::{DrawRecord, ScoreMap, MAX_NUMBER};

#[derive(Debug, Clone)]
pub struct Markov;

impl Indicator for Markov {
    fn name(&self) -> &'static str {
        "markov"
    }

    fn min_periods(&self) -> usize {
        3
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }

        // transition[a][b]: times number b+1 appeared in the draw after one
        // containing a+1. History is newest-first, so history[t+1] precedes
        // history[t].
        let mut transition = vec![[0.0f64; MAX_NUMBER]; MAX_NUMBER];
        let mut from_totals = [0.0f64; MAX_NUMBER];
        for t in 0..history.len() - 1 {
            let earlier = &history[t + 1];
            let later = &history[t];
            for &a in &earlier.numbers {
                from_totals[a as usize - 1] += 1.0;
                for &b in &later.numbers {
                    transition[a as usize - 1][b as usize - 1] += 1.0;
                }
            }
        }

        let latest = &history[0];
        ScoreMap::from_fn(|n| {
            let mut prob = 0.0;
            for &a in &latest.numbers {
                let total = from_totals[a as usize - 1];
                if total > 0.0 {
                    prob += transition[a as usize - 1][n as usize - 1] / total;
                }
            }
            prob * 100.0 / latest.numbers.len() as f64
        })
    }
}
