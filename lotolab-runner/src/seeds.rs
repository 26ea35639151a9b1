//! Seed weight profiles and the parallel evaluation pass that picks the
//! starting vector for a replay.
//!
//! Each profile is a hand-shaped prior over the indicator family. Profiles
//! are evaluated over a short slice of recent history with adaptation
//! switched off; the replay then starts from the best performer. Evaluation
//! parallelizes over profiles with rayon, and RNG sub-seeds are derived per
//! profile so the parallel and sequential orders agree bit for bit.

use std::collections::BTreeMap;

use rayon::prelude::*;

use lotolab_core::domain::{DrawRecord, WeightVector};
use lotolab_core::indicators::indicator_names;
use lotolab_core::rng::RngHierarchy;
use lotolab_core::scoring::MIN_HISTORY;

use crate::config::EngineConfig;
use crate::step::evaluate_step;

/// A named starting weight profile.
#[derive(Debug, Clone)]
pub struct SeedProfile {
    pub name: &'static str,
    pub weights: WeightVector,
}

/// The seed family, canonical order.
pub fn seed_profiles() -> Vec<SeedProfile> {
    vec![
        SeedProfile {
            name: "uniform",
            weights: WeightVector::uniform(indicator_names()),
        },
        SeedProfile {
            name: "frequency_lean",
            weights: shaped(&[("frequency", 4.0), ("recency", 3.0), ("short_pattern", 2.0)]),
        },
        SeedProfile {
            name: "gap_hunter",
            weights: shaped(&[("log_gap", 4.0), ("hazard", 3.0), ("extreme_gap", 3.0)]),
        },
        SeedProfile {
            name: "statistical",
            weights: shaped(&[
                ("distribution", 3.0),
                ("chi_square", 3.0),
                ("poisson", 3.0),
                ("entropy", 2.0),
            ]),
        },
        SeedProfile {
            name: "pattern_lean",
            weights: shaped(&[
                ("markov", 3.0),
                ("cluster", 2.0),
                ("correlation", 2.0),
                ("trend", 2.0),
                ("structural", 2.0),
            ]),
        },
        SeedProfile {
            name: "learned_lean",
            weights: shaped(&[("neural", 4.0), ("frequency", 2.0), ("recency", 2.0)]),
        },
    ]
}

/// Uniform base with the named indicators raised by the given factors,
/// renormalized to a probability vector.
fn shaped(boosts: &[(&str, f64)]) -> WeightVector {
    let mut w = WeightVector::uniform(indicator_names());
    for (name, factor) in boosts {
        let current = w.get(name);
        w.set(name, current * factor);
    }
    w.normalized()
}

/// Result of evaluating one profile over the sample window.
#[derive(Debug, Clone)]
pub struct SeedEvaluation {
    pub name: &'static str,
    pub weights: WeightVector,
    pub avg_hits: f64,
    pub avg_accuracy: f64,
    pub steps: usize,
}

impl SeedEvaluation {
    /// Scalar fitness; hit count dominates, accuracy breaks near-ties.
    pub fn fitness(&self) -> f64 {
        2.0 * self.avg_hits + self.avg_accuracy
    }
}

/// Evaluate every profile in parallel and return the winner plus the full
/// ranking (best first). Ties resolve toward the earlier profile, so the
/// result is stable across runs.
pub fn select_seed(
    history: &[DrawRecord],
    cfg: &EngineConfig,
    hierarchy: &RngHierarchy,
    fingerprint: &str,
) -> Vec<SeedEvaluation> {
    let sample_len = cfg.seed_sample_periods.min(history.len());
    let sample = &history[..sample_len];

    let mut evaluated: Vec<(usize, SeedEvaluation)> = seed_profiles()
        .into_par_iter()
        .enumerate()
        .map(|(idx, profile)| {
            let eval = evaluate_profile(sample, &profile, cfg, hierarchy, fingerprint, idx as u64);
            (idx, eval)
        })
        .collect();

    evaluated.sort_by(|(ia, a), (ib, b)| {
        b.fitness()
            .partial_cmp(&a.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(ia.cmp(ib))
    });
    evaluated.into_iter().map(|(_, e)| e).collect()
}

fn evaluate_profile(
    sample: &[DrawRecord],
    profile: &SeedProfile,
    cfg: &EngineConfig,
    hierarchy: &RngHierarchy,
    fingerprint: &str,
    profile_idx: u64,
) -> SeedEvaluation {
    let mut performance = BTreeMap::new();
    let mut rng = hierarchy.rng_for(fingerprint, "seed_eval", profile_idx);

    let mut total_hits = 0usize;
    let mut total_accuracy = 0.0;
    let mut steps = 0usize;

    for offset in 0..cfg.seed_eval_steps {
        if sample.len() < offset + 1 + MIN_HISTORY {
            break;
        }
        if let Some(outcome) = evaluate_step(
            sample,
            offset,
            &profile.weights,
            &mut performance,
            cfg,
            &mut rng,
        ) {
            total_hits += outcome.record.hit_count;
            total_accuracy += outcome.record.accuracy;
            steps += 1;
        }
    }

    let (avg_hits, avg_accuracy) = if steps == 0 {
        (0.0, 0.0)
    } else {
        (total_hits as f64 / steps as f64, total_accuracy / steps as f64)
    };
    SeedEvaluation {
        name: profile.name,
        weights: profile.weights.clone(),
        avg_hits,
        avg_accuracy,
        steps,
    }
}
