//! Composite scorer — normalizes and combines the indicator ensemble.
//!
//! Each indicator's raw map is min-max normalized to [0,100] independently,
//! then combined as `composite[n] = Σ weight[i] * normalized[i][n]` with the
//! weight vector renormalized to sum 1 immediately before use. The learned
//! predictor additionally contributes a fixed minority blend over its own
//! top-ranked numbers. The output keeps raw and normalized sub-scores per
//! surviving number for diagnostics.
//!
//! Causality is enforced structurally here: `score` takes an explicit
//! exclusion set and every calculator only ever sees the filtered window.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{DrawRecord, HistoryError, ScoreMap, WeightVector, MAX_NUMBER};
use crate::indicators::{all_indicators, Indicator};

/// Fewest periods `score` accepts before rejecting outright. Individual
/// indicators may still degrade to zero maps above this floor.
pub const MIN_HISTORY: usize = 12;

/// Scoring knobs. Tuned values live here rather than at use sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Numbers retained in the ranked output.
    pub top_list: usize,
    /// Fixed blend weight of the learned predictor's boost.
    pub neural_blend: f64,
    /// How many of the predictor's top numbers receive the boost.
    pub neural_top: usize,
    /// Seed for the predictor's weight initialization.
    pub neural_seed: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            top_list: 40,
            neural_blend: 0.15,
            neural_top: 10,
            neural_seed: 42,
        }
    }
}

/// One number's composite result with per-indicator sub-scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedNumber {
    pub number: u8,
    pub composite: f64,
    pub raw: BTreeMap<String, f64>,
    pub normalized: BTreeMap<String, f64>,
}

/// Scoring diagnostics carried alongside the ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringDiagnostics {
    pub window_len: usize,
    pub excluded: usize,
    /// Indicators that produced a zero (no-signal) map for this window.
    pub silent_indicators: Vec<String>,
}

/// Ranked output of one scoring pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranking {
    /// Top numbers by composite score, best first.
    pub ranked: Vec<RankedNumber>,
    pub diagnostics: ScoringDiagnostics,
}

impl Ranking {
    /// Numbers in ranked order.
    pub fn numbers(&self) -> Vec<u8> {
        self.ranked.iter().map(|r| r.number).collect()
    }

    /// Normalized score of `number` under `indicator`, 0.0 if unranked.
    pub fn normalized_score(&self, indicator: &str, number: u8) -> f64 {
        self.ranked
            .iter()
            .find(|r| r.number == number)
            .and_then(|r| r.normalized.get(indicator).copied())
            .unwrap_or(0.0)
    }
}

/// One-shot scoring over an explicit exclusion set.
///
/// `history` is most-recent-first. Draws whose period identifier is in
/// `exclude` are invisible to every indicator; mutating an excluded draw can
/// never change the output.
pub fn score(
    history: &[DrawRecord],
    weights: &WeightVector,
    exclude: &BTreeSet<String>,
    cfg: &ScoringConfig,
) -> Result<Ranking, HistoryError> {
    if history.is_empty() {
        return Err(HistoryError::Empty);
    }
    let window: Vec<DrawRecord> = history
        .iter()
        .filter(|d| !exclude.contains(&d.period))
        .cloned()
        .collect();
    if window.len() < MIN_HISTORY {
        return Err(HistoryError::InsufficientData {
            got: window.len(),
            need: MIN_HISTORY,
        });
    }
    let mut ranking = score_window(&window, weights, cfg);
    ranking.diagnostics.excluded = history.len() - window.len();
    Ok(ranking)
}

/// Scoring over an already-causality-cut window. Used by the backtest step
/// evaluator, which slices contiguous training windows directly.
pub fn score_window(window: &[DrawRecord], weights: &WeightVector, cfg: &ScoringConfig) -> Ranking {
    let indicators = all_indicators(cfg.neural_seed);
    let effective = effective_weights(weights, &indicators);

    let mut raw_maps: Vec<(&'static str, ScoreMap)> = Vec::with_capacity(indicators.len());
    let mut silent = Vec::new();
    for ind in &indicators {
        let map = ind.compute(window);
        if map.is_zero() {
            silent.push(ind.name().to_string());
        }
        raw_maps.push((ind.name(), map));
    }

    let normalized: Vec<(&'static str, ScoreMap)> = raw_maps
        .iter()
        .map(|(name, map)| (*name, map.normalized()))
        .collect();

    let mut composite = ScoreMap::zero();
    for (name, norm) in &normalized {
        let w = effective.get(name);
        if w > 0.0 {
            for (n, s) in norm.iter() {
                composite.add(n, w * s);
            }
        }
    }

    // Minority blend: the predictor's own favorites get a flat boost on top
    // of their ensemble score.
    if cfg.neural_blend > 0.0 {
        if let Some((_, neural_norm)) = normalized.iter().find(|(name, _)| *name == "neural") {
            for n in neural_norm.ranked_numbers().into_iter().take(cfg.neural_top) {
                if neural_norm.get(n) > 0.0 {
                    composite.add(n, cfg.neural_blend * neural_norm.get(n));
                }
            }
        }
    }

    let order = composite.ranked_numbers();
    let ranked: Vec<RankedNumber> = order
        .into_iter()
        .take(cfg.top_list.min(MAX_NUMBER))
        .map(|n| RankedNumber {
            number: n,
            composite: composite.get(n),
            raw: raw_maps
                .iter()
                .map(|(name, map)| (name.to_string(), map.get(n)))
                .collect(),
            normalized: normalized
                .iter()
                .map(|(name, map)| (name.to_string(), map.get(n)))
                .collect(),
        })
        .collect();

    Ranking {
        ranked,
        diagnostics: ScoringDiagnostics {
            window_len: window.len(),
            excluded: 0,
            silent_indicators: silent,
        },
    }
}

/// Restrict `weights` to the ensemble's names and renormalize to sum 1.
/// Missing names get weight 0; an empty intersection falls back to uniform.
fn effective_weights(weights: &WeightVector, indicators: &[Box<dyn Indicator>]) -> WeightVector {
    let pairs: Vec<(String, f64)> = indicators
        .iter()
        .map(|i| (i.name().to_string(), weights.get(i.name())))
        .collect();
    WeightVector::from_pairs(pairs).normalized()
}
