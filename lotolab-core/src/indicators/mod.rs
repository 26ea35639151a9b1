//! Indicator calculators — the scoring ensemble.
//!
//! Each calculator maps draw history (most-recent-first, already windowed by
//! the caller) to a full per-number [`ScoreMap`]. Raw scores are
//! indicator-specific and not comparable across indicators; the composite
//! scorer normalizes before combining.
//!
//! Degrade contract: given fewer than `min_periods()` draws, `compute` returns
//! the zero map ("no signal"). Calculators never raise.

pub mod chi_square;
pub mod cluster;
pub mod correlation;
pub mod distribution;
pub mod entropy;
pub mod extreme_gap;
pub mod fibonacci;
pub mod frequency;
pub mod gap;
pub mod hazard;
pub mod markov;
pub mod neural;
pub mod poisson;
pub mod range_bins;
pub mod recency;
pub mod short_pattern;
pub mod structural;
pub mod trend;

pub use chi_square::ChiSquare;
pub use cluster::Cluster;
pub use correlation::PairCorrelation;
pub use distribution::DistributionFit;
pub use entropy::EntropyDeviation;
pub use extreme_gap::ExtremeGap;
pub use fibonacci::Fibonacci;
pub use frequency::Frequency;
pub use gap::LogGap;
pub use hazard::Hazard;
pub use markov::Markov;
pub use neural::NeuralPredictor;
pub use poisson::PoissonDeficit;
pub use range_bins::RangeBins;
pub use recency::RecencyWeighted;
pub use short_pattern::ShortPattern;
pub use structural::Structural;
pub use trend::Trend;

use crate::domain::{DrawRecord, ScoreMap};

/// One scoring heuristic over windowed draw history.
///
/// `history[0]` is the most recent draw of the training window. The caller is
/// responsible for the causality cut (slicing or exclusion-filtering the
/// window); calculators treat whatever they receive as the complete past.
pub trait Indicator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fewest periods needed to produce a signal. Shorter input → zero map.
    fn min_periods(&self) -> usize;

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap;
}

/// The full ensemble in canonical order.
///
/// `neural_seed` fixes the learned predictor's weight initialization so the
/// whole ensemble is deterministic given identical history.
pub fn all_indicators(neural_seed: u64) -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Frequency),
        Box::new(RecencyWeighted::default()),
        Box::new(ShortPattern::default()),
        Box::new(LogGap),
        Box::new(Hazard),
        Box::new(ExtremeGap),
        Box::new(DistributionFit),
        Box::new(ChiSquare),
        Box::new(PoissonDeficit),
        Box::new(Trend::default()),
        Box::new(Structural),
        Box::new(PairCorrelation::default()),
        Box::new(Markov),
        Box::new(EntropyDeviation),
        Box::new(Cluster::default()),
        Box::new(Fibonacci),
        Box::new(RangeBins::default()),
        Box::new(NeuralPredictor::new(neural_seed)),
    ]
}

/// Canonical indicator names, in ensemble order.
pub fn indicator_names() -> Vec<&'static str> {
    all_indicators(0).iter().map(|i| i.name()).collect()
}

// ─── Shared history helpers ──────────────────────────────────────────

/// Appearances of `number` across the window.
pub(crate) fn appearance_count(history: &[DrawRecord], number: u8) -> usize {
    history.iter().filter(|d| d.contains(number)).count()
}

/// Periods since `number` last appeared (0 = in the latest draw).
/// `None` if it never appears in the window.
pub(crate) fn current_gap(history: &[DrawRecord], number: u8) -> Option<usize> {
    history.iter().position(|d| d.contains(number))
}

/// Gaps between successive appearances of `number`, newest pair first.
pub(crate) fn inter_appearance_gaps(history: &[DrawRecord], number: u8) -> Vec<usize> {
    let positions: Vec<usize> = history
        .iter()
        .enumerate()
        .filter(|(_, d)| d.contains(number))
        .map(|(i, _)| i)
        .collect();
    positions.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Binary appearance series for `number` in chronological order
/// (index 0 = oldest period of the window).
pub(crate) fn appearance_series(history: &[DrawRecord], number: u8) -> Vec<f64> {
    history
        .iter()
        .rev()
        .map(|d| if d.contains(number) { 1.0 } else { 0.0 })
        .collect()
}

/// Synthetic deterministic history for tests; see [`crate::synthetic`].
#[cfg(test)]
pub fn make_draws(n: usize) -> Vec<DrawRecord> {
    crate::synthetic::consecutive_history(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensemble_has_unique_names() {
        let names = indicator_names();
        let mut dedup = names.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(names.len(), dedup.len());
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn every_indicator_degrades_to_zero_on_empty_history() {
        for ind in all_indicators(42) {
            let map = ind.compute(&[]);
            assert!(map.is_zero(), "{} did not degrade to zero", ind.name());
        }
    }

    #[test]
    fn every_indicator_degrades_below_min_periods() {
        let history = make_draws(200);
        for ind in all_indicators(42) {
            let min = ind.min_periods();
            if min > 1 {
                let short = &history[..min - 1];
                assert!(
                    ind.compute(short).is_zero(),
                    "{} produced signal below min_periods",
                    ind.name()
                );
            }
        }
    }

    #[test]
    fn helpers_agree_on_synthetic_history() {
        let history = make_draws(20);
        // Number drawn in period 0: (0*7+0)%49+1 = 1
        assert_eq!(current_gap(&history, 1), Some(0));
        assert!(appearance_count(&history, 1) >= 1);
        let series = appearance_series(&history, 1);
        assert_eq!(series.len(), 20);
        assert_eq!(*series.last().unwrap(), 1.0); // newest period is last chronologically
    }
}
