//! Shannon-entropy deviation score.
//!
//! Under uniform draws every number carries probability 1/49 and contributes
//! `-(1/49) ln(1/49)` to the pool's entropy. Numbers whose empirical
//! probability falls short of uniform contribute less than expected; the
//! signed contribution deficit (scaled) is the score, so underrepresented
//! numbers rank highest.

use super::{appearance_count, Indicator};
use crate::domain::{DrawRecord, ScoreMap, DRAW_SIZE, MAX_NUMBER};

#[derive(Debug, Clone)]
pub struct EntropyDeviation;

fn entropy_term(p: f64) -> f64 {
    if p <= 0.0 {
        0.0
    } else {
        -p * p.ln()
    }
}

impl Indicator for EntropyDeviation {
    fn name(&self) -> &'static str {
        "entropy"
    }

    fn min_periods(&self) -> usize {
        10
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let total = (history.len() * DRAW_SIZE) as f64;
        let uniform = 1.0 / MAX_NUMBER as f64;
        let expected_term = entropy_term(uniform);
        ScoreMap::from_fn(|n| {
            let p = appearance_count(history, n) as f64 / total;
            let deficit = expected_term - entropy_term(p);
            // Probability deficit dominates; the entropy-term deficit breaks
            // ties between equally rare numbers near the uniform point.
            ((uniform - p).max(0.0) * 1000.0) + deficit.max(0.0) * 100.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_draws;

    #[test]
    fn entropy_term_shape() {
        assert_eq!(entropy_term(0.0), 0.0);
        assert!(entropy_term(1.0 / 49.0) > 0.0);
        assert!(entropy_term(1.0) < 1e-12);
    }

    #[test]
    fn underrepresented_beats_overrepresented() {
        let history = make_draws(30);
        let map = EntropyDeviation.compute(&history);
        // 7 never appears; 1 appears 5 times in 30 draws (p > 1/49).
        assert!(map.get(7) > map.get(1));
        assert_eq!(map.get(1), 0.0);
    }
}
