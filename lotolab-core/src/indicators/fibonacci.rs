//! Fibonacci-sequence heuristics.
//!
//! Three sub-checks, 20 points each, with a strong-signal bonus of 40 when
//! at least two agree:
//! 1. membership — the number itself is a Fibonacci number;
//! 2. gap proximity — the current absence gap is within ±20% (minimum
//!    tolerance 1) of some Fibonacci value;
//! 3. golden-ratio prediction — the current gap is within the same tolerance
//!    of the previous inter-appearance gap scaled by φ ≈ 1.618.

use super::{current_gap, inter_appearance_gaps, Indicator};
use crate::domain::{DrawRecord, ScoreMap};

const PHI: f64 = 1.618_033_988_749_895;

/// Fibonacci numbers within the 1..=49 domain.
const FIB: [u8; 8] = [1, 2, 3, 5, 8, 13, 21, 34];

#[derive(Debug, Clone)]
pub struct Fibonacci;

fn within_tolerance(value: f64, target: f64) -> bool {
    let tol = (target * 0.2).max(1.0);
    (value - target).abs() <= tol
}

impl Indicator for Fibonacci {
    fn name(&self) -> &'static str {
        "fibonacci"
    }

    fn min_periods(&self) -> usize {
        5
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        ScoreMap::from_fn(|n| {
            let gap = current_gap(history, n).unwrap_or(history.len()) as f64;
            let gaps = inter_appearance_gaps(history, n);

            let member = FIB.contains(&n);
            let gap_fib = FIB.iter().any(|&f| within_tolerance(gap, f as f64));
            let golden = gaps
                .first()
                .map(|&last| within_tolerance(gap, last as f64 * PHI))
                .unwrap_or(false);

            let agreeing = [member, gap_fib, golden].iter().filter(|&&c| c).count();
            let mut score = agreeing as f64 * 20.0;
            if agreeing >= 2 {
                score += 40.0;
            }
            score
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_draws;

    #[test]
    fn tolerance_floor_is_one() {
        assert!(within_tolerance(2.0, 1.0)); // |2-1| = 1 <= max(0.2, 1)
        assert!(!within_tolerance(2.1, 1.0));
        assert!(within_tolerance(38.0, 34.0)); // 20% of 34 = 6.8
    }

    #[test]
    fn strong_signal_bonus_applies() {
        let history = make_draws(30);
        let map = Fibonacci.compute(&history);
        // Scores are quantized: 0, 20, 40+40, or 60+40.
        for (_, s) in map.iter() {
            assert!([0.0, 20.0, 80.0, 100.0].contains(&s), "unexpected {s}");
        }
    }

    #[test]
    fn membership_check_counts() {
        let history = make_draws(30);
        let map = Fibonacci.compute(&history);
        // 34 is Fibonacci; 35 is not and never appears with the same gap
        // profile. At minimum the membership point separates equal-gap pairs.
        let fib_total: f64 = FIB.iter().map(|&f| map.get(f)).sum();
        assert!(fib_total > 0.0);
    }
}
