//! Chi-square deviation from uniform expectation.
//!
//! Per-number contribution `(observed - expected)^2 / expected` against the
//! uniform expectation `periods * 6 / 49`. Underrepresented numbers carry
//! their full contribution; overrepresented ones are halved, so the score
//! leans toward catch-up candidates while still flagging any deviation.

use super::{appearance_count, Indicator};
use crate::domain::{DrawRecord, ScoreMap, DRAW_SIZE, MAX_NUMBER};

#[derive(Debug, Clone)]
pub struct ChiSquare;

impl Indicator for ChiSquare {
    fn name(&self) -> &'static str {
        "chi_square"
    }

    fn min_periods(&self) -> usize {
        10
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let expected = history.len() as f64 * DRAW_SIZE as f64 / MAX_NUMBER as f64;
        ScoreMap::from_fn(|n| {
            let observed = appearance_count(history, n) as f64;
            let contribution = (observed - expected).powi(2) / expected;
            if observed < expected {
                contribution
            } else {
                contribution * 0.5
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{appearance_count, make_draws};

    #[test]
    fn never_drawn_number_has_full_contribution() {
        let history = make_draws(30);
        let map = ChiSquare.compute(&history);
        let expected = 30.0 * 6.0 / 49.0;
        assert!((map.get(7) - expected).abs() < 1e-9); // (0-e)^2/e = e
    }

    #[test]
    fn overrepresented_is_discounted() {
        let history = make_draws(30);
        let map = ChiSquare.compute(&history);
        let expected = 30.0 * 6.0 / 49.0; // ≈ 3.67
        // Number 1 appears ~5 times in 30 periods (every 7th period):
        // overrepresented → halved contribution.
        let observed = appearance_count(&history, 1) as f64;
        assert!(observed > expected);
        let full = (observed - expected).powi(2) / expected;
        assert!((map.get(1) - full * 0.5).abs() < 1e-9);
    }
}
