//! One backtest step: score a training window, select and refine candidates,
//! evaluate the survivors against the real next draw.

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use lotolab_core::candidates::{all_strategies, dedup_candidates};
use lotolab_core::domain::{CandidateSet, DrawRecord, WeightVector};
use lotolab_core::scoring::{score_window, MIN_HISTORY};
use lotolab_core::simulate::{refine, StrategyPerformance};

use crate::attribution::{attribute, Attribution};
use crate::compare::{compare_prediction, ValidationRecord};
use crate::config::EngineConfig;

/// Everything one evaluated step produces.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub record: ValidationRecord,
    /// Per-indicator credit for this step, `None` when degenerate.
    pub attribution: Option<Attribution>,
}

/// Evaluate the step predicting `history[offset]` from the window behind it.
///
/// `history` is most-recent-first; the training window is the contiguous
/// slice `history[offset + 1 ..]` capped at `lookback_periods`. Returns
/// `None` when the window's newest period and the target period are not
/// consecutive, so gaps in the archive are skipped rather than silently
/// scored across.
///
/// The caller guarantees the window holds at least [`MIN_HISTORY`] draws.
pub fn evaluate_step(
    history: &[DrawRecord],
    offset: usize,
    weights: &WeightVector,
    performance: &mut BTreeMap<String, StrategyPerformance>,
    cfg: &EngineConfig,
    rng: &mut StdRng,
) -> Option<StepOutcome> {
    let target = &history[offset];
    let window_end = (offset + 1 + cfg.lookback_periods).min(history.len());
    let window = &history[offset + 1..window_end];
    debug_assert!(window.len() >= MIN_HISTORY);

    if !is_consecutive(&window[0], target) {
        return None;
    }

    let ranking = score_window(window, weights, &cfg.scoring);
    let candidates = select_candidates(&ranking, window);
    let scored = refine(&candidates, &ranking, performance, &cfg.simulation, rng);

    // Survivors are ordered by simulation score; the one that actually hits
    // best wins, the simulation order breaking ties.
    let mut winner = 0usize;
    let mut best_hits = 0usize;
    let mut hits_per_survivor = Vec::with_capacity(scored.len());
    for (i, sc) in scored.iter().enumerate() {
        let hits = sc.candidate.hits_against(&target.numbers);
        if hits > best_hits {
            best_hits = hits;
            winner = i;
        }
        hits_per_survivor.push(hits);
    }

    for (sc, &hits) in scored.iter().zip(&hits_per_survivor) {
        performance
            .entry(sc.candidate.strategy.clone())
            .or_default()
            .record(hits, cfg.target_hits);
    }

    let chosen = &scored[winner].candidate;
    let comparison = compare_prediction(&chosen.numbers, &target.numbers, cfg.target_hits);
    let attribution = attribute(&ranking, &target.numbers);

    let record = ValidationRecord {
        window_start: window[0].period.clone(),
        target_period: target.period.clone(),
        predicted: chosen.numbers.clone(),
        actual: target.numbers.to_vec(),
        hit_count: comparison.hit_count,
        accuracy: comparison.accuracy,
        coverage: comparison.coverage,
        strategy: chosen.strategy.clone(),
        weights: weights.clone(),
    };

    Some(StepOutcome {
        record,
        attribution,
    })
}

/// Run every strategy and drop short sets, falling back to whatever the
/// first strategy produced when nothing fills out.
fn select_candidates(
    ranking: &lotolab_core::scoring::Ranking,
    window: &[DrawRecord],
) -> Vec<CandidateSet> {
    let raw: Vec<CandidateSet> = all_strategies()
        .iter()
        .map(|s| s.select(ranking, window))
        .collect();
    let mut full: Vec<CandidateSet> = raw.iter().filter(|c| !c.is_short()).cloned().collect();
    if full.is_empty() {
        if let Some(first) = raw.into_iter().next() {
            full.push(first);
        }
    }
    dedup_candidates(full)
}

fn is_consecutive(window_newest: &DrawRecord, target: &DrawRecord) -> bool {
    match (window_newest.key(), target.key()) {
        (Ok(a), Ok(b)) => a.is_followed_by(&b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotolab_core::indicators::indicator_names;
    use lotolab_core::synthetic::consecutive_history;
    use rand::SeedableRng;

    fn setup(periods: usize) -> (Vec<DrawRecord>, WeightVector, EngineConfig) {
        let history = consecutive_history(periods);
        let weights = WeightVector::uniform(indicator_names());
        (history, weights, EngineConfig::default())
    }

    #[test]
    fn evaluated_step_is_consistent() {
        let (history, weights, cfg) = setup(40);
        let mut perf = BTreeMap::new();
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = evaluate_step(&history, 0, &weights, &mut perf, &cfg, &mut rng)
            .expect("synthetic history is gapless");
        let record = &outcome.record;
        assert_eq!(record.target_period, history[0].period);
        assert_eq!(record.window_start, history[1].period);
        assert_eq!(record.actual, history[0].numbers.to_vec());
        assert_eq!(
            record.hit_count,
            record
                .predicted
                .iter()
                .filter(|n| record.actual.contains(n))
                .count()
        );
        assert!(!perf.is_empty());
    }

    #[test]
    fn step_is_deterministic_for_a_fixed_seed() {
        let (history, weights, cfg) = setup(40);
        let run = || {
            let mut perf = BTreeMap::new();
            let mut rng = StdRng::seed_from_u64(11);
            evaluate_step(&history, 3, &weights, &mut perf, &cfg, &mut rng)
                .map(|o| o.record.predicted)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn gap_in_archive_skips_the_step() {
        let (mut history, weights, cfg) = setup(40);
        // Remove the draw right behind the target so periods no longer chain.
        history.remove(1);
        let mut perf = BTreeMap::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(evaluate_step(&history, 0, &weights, &mut perf, &cfg, &mut rng).is_none());
    }

    #[test]
    fn training_window_never_includes_the_target() {
        let (history, weights, cfg) = setup(40);
        let mut perf = BTreeMap::new();
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = evaluate_step(&history, 5, &weights, &mut perf, &cfg, &mut rng)
            .expect("synthetic history is gapless");
        assert_eq!(outcome.record.target_period, history[5].period);
        assert_eq!(outcome.record.window_start, history[6].period);
    }
}
