//! Weight adaptation — a pure function from (weights, attribution) to the
//! next weight vector.
//!
//! The learning rate scales with the gap to the accuracy target and, more
//! heavily, the gap to the hit-count target. Indicators with positive
//! attribution gain weight proportionally to their share of total absolute
//! attribution; the rest lose it. Every step ends with a projection back into
//! the configured bounds with the components summing to 1.

use lotolab_core::domain::WeightVector;

use crate::attribution::Attribution;
use crate::config::EngineConfig;

/// Indicators favored by the degenerate-attribution fallback nudge.
const FALLBACK_FAVORITES: [&str; 6] = [
    "log_gap",
    "hazard",
    "extreme_gap",
    "trend",
    "distribution",
    "markov",
];

/// One adaptation step.
///
/// `accuracy` and `hit_count` describe the step just evaluated. When
/// `attribution` is `None` (zero hits or an otherwise degenerate step), a
/// fixed heuristic nudge toward the gap/trend/distribution/Markov indicators
/// applies instead of proportional reallocation.
pub fn adapt(
    weights: &WeightVector,
    attribution: Option<&Attribution>,
    accuracy: f64,
    hit_count: f64,
    cfg: &EngineConfig,
) -> WeightVector {
    let rate = learning_rate(accuracy, hit_count, cfg);

    let mut next = weights.clone();
    match attribution {
        Some(attr) if attr.values().any(|v| v.abs() > f64::EPSILON) => {
            let total_abs: f64 = attr.values().map(|v| v.abs()).sum();
            for (name, &value) in attr {
                let share = value.abs() / total_abs;
                let current = next.get(name);
                let delta = rate * share;
                if value > 0.0 {
                    next.set(name, current + delta);
                } else {
                    next.set(name, (current - delta).max(0.0));
                }
            }
        }
        _ => {
            for name in FALLBACK_FAVORITES {
                let current = next.get(name);
                next.set(name, current + cfg.adapter.fallback_nudge);
            }
        }
    }

    next.bounded(cfg.weight_floor, cfg.weight_ceiling)
}

/// Learning rate from the two target gaps; hit-count gap weighs heavier.
fn learning_rate(accuracy: f64, hit_count: f64, cfg: &EngineConfig) -> f64 {
    let acc_gap = (cfg.target_accuracy - accuracy).max(0.0);
    let hit_gap = (cfg.target_avg_hits - hit_count).max(0.0) / cfg.target_avg_hits.max(1.0);
    cfg.adapter.base_rate
        * (1.0 + cfg.adapter.accuracy_gap_weight * acc_gap + cfg.adapter.hit_gap_weight * hit_gap)
}
