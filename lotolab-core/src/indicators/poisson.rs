//! Poisson-deficit score.
//!
//! Models per-number appearance counts as Poisson with
//! `lambda = 6 * periods / 49` and scores the deficit `lambda - observed`,
//! weighted by how improbable the observed count (or lower) is under the
//! model. Numbers at or above expectation score 0.

use super::{appearance_count, Indicator};
use crate::domain::{DrawRecord, ScoreMap, DRAW_SIZE, MAX_NUMBER};

#[derive(Debug, Clone)]
pub struct PoissonDeficit;

/// P(X <= k) for X ~ Poisson(lambda).
fn poisson_cdf(k: usize, lambda: f64) -> f64 {
    let mut term = (-lambda).exp(); // P(X = 0)
    let mut cum = term;
    for i in 1..=k {
        term *= lambda / i as f64;
        cum += term;
    }
    cum.min(1.0)
}

impl Indicator for PoissonDeficit {
    fn name(&self) -> &'static str {
        "poisson"
    }

    fn min_periods(&self) -> usize {
        10
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let lambda = DRAW_SIZE as f64 * history.len() as f64 / MAX_NUMBER as f64;
        ScoreMap::from_fn(|n| {
            let observed = appearance_count(history, n);
            let deficit = lambda - observed as f64;
            if deficit <= 0.0 {
                return 0.0;
            }
            // Rarer observed counts get proportionally more of the deficit.
            let tail = 1.0 - poisson_cdf(observed, lambda);
            deficit * tail * 10.0
        })
    }
}
