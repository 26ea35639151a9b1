//! Aggregate statistics for a completed backtest run and the ordering used
//! to pick the best run across perturbation retries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use lotolab_core::domain::{WeightVector, DRAW_SIZE};

use crate::compare::ValidationRecord;
use crate::config::EngineConfig;

/// Summary numbers over every step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub steps: usize,
    pub total_hits: usize,
    pub avg_hits: f64,
    pub avg_accuracy: f64,
    /// `hit_histogram[k]` counts steps with exactly `k` hits.
    pub hit_histogram: [usize; DRAW_SIZE + 1],
    pub meets_target: bool,
}

impl RunStatistics {
    pub fn from_records(records: &[ValidationRecord], cfg: &EngineConfig) -> Self {
        let steps = records.len();
        let total_hits: usize = records.iter().map(|r| r.hit_count).sum();
        let mut hit_histogram = [0usize; DRAW_SIZE + 1];
        for record in records {
            hit_histogram[record.hit_count.min(DRAW_SIZE)] += 1;
        }
        let avg_hits = if steps == 0 {
            0.0
        } else {
            total_hits as f64 / steps as f64
        };
        let avg_accuracy = if steps == 0 {
            0.0
        } else {
            records.iter().map(|r| r.accuracy).sum::<f64>() / steps as f64
        };
        RunStatistics {
            steps,
            total_hits,
            avg_hits,
            avg_accuracy,
            hit_histogram,
            meets_target: steps > 0
                && avg_hits >= cfg.target_avg_hits
                && avg_accuracy >= cfg.target_accuracy,
        }
    }

    /// Euclidean-ish distance to the configured targets, for run ranking.
    fn target_distance(&self, cfg: &EngineConfig) -> f64 {
        let hit_gap = (cfg.target_avg_hits - self.avg_hits).max(0.0);
        let acc_gap = (cfg.target_accuracy - self.avg_accuracy).max(0.0);
        hit_gap * hit_gap + acc_gap * acc_gap
    }
}

/// One full replay over the history with a fixed starting weight vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRun {
    pub records: Vec<ValidationRecord>,
    pub skipped_non_consecutive: usize,
    pub start_weights: WeightVector,
    pub final_weights: WeightVector,
    pub statistics: RunStatistics,
}

impl BacktestRun {
    /// Orders runs best-first: meeting the target beats not meeting it,
    /// then smaller distance to target, then more total hits.
    pub fn compare_priority(&self, other: &BacktestRun, cfg: &EngineConfig) -> Ordering {
        match (self.statistics.meets_target, other.statistics.meets_target) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        let dist = other
            .statistics
            .target_distance(cfg)
            .partial_cmp(&self.statistics.target_distance(cfg))
            .unwrap_or(Ordering::Equal);
        dist.then(self.statistics.total_hits.cmp(&other.statistics.total_hits))
    }

    pub fn is_better_than(&self, other: &BacktestRun, cfg: &EngineConfig) -> bool {
        self.compare_priority(other, cfg) == Ordering::Greater
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotolab_core::indicators::indicator_names;

    fn record(hit_count: usize) -> ValidationRecord {
        ValidationRecord {
            window_start: "2024001".into(),
            target_period: "2024002".into(),
            predicted: vec![1, 2, 3, 4, 5, 6],
            actual: vec![1, 2, 3, 4, 5, 6],
            hit_count,
            accuracy: hit_count as f64 / DRAW_SIZE as f64,
            coverage: hit_count as f64 / DRAW_SIZE as f64,
            strategy: "top_six".into(),
            weights: WeightVector::uniform(indicator_names()),
        }
    }

    fn run_with_hits(hits: &[usize], cfg: &EngineConfig) -> BacktestRun {
        let records: Vec<_> = hits.iter().map(|&h| record(h)).collect();
        let statistics = RunStatistics::from_records(&records, cfg);
        BacktestRun {
            records,
            skipped_non_consecutive: 0,
            start_weights: WeightVector::uniform(indicator_names()),
            final_weights: WeightVector::uniform(indicator_names()),
            statistics,
        }
    }

    #[test]
    fn statistics_aggregate_correctly() {
        let cfg = EngineConfig::default();
        let run = run_with_hits(&[0, 2, 3, 3, 6], &cfg);
        let stats = &run.statistics;
        assert_eq!(stats.steps, 5);
        assert_eq!(stats.total_hits, 14);
        assert!((stats.avg_hits - 2.8).abs() < 1e-9);
        assert_eq!(stats.hit_histogram[3], 2);
        assert_eq!(stats.hit_histogram[6], 1);
        assert_eq!(stats.hit_histogram[1], 0);
    }

    #[test]
    fn meeting_target_outranks_any_miss() {
        let cfg = EngineConfig::default();
        // avg_hits 3.0, avg_accuracy 0.5 exactly at target.
        let meets = run_with_hits(&[3, 3, 3], &cfg);
        let misses = run_with_hits(&[2, 2, 2], &cfg);
        assert!(meets.statistics.meets_target);
        assert!(!misses.statistics.meets_target);
        assert!(meets.is_better_than(&misses, &cfg));
        assert!(!misses.is_better_than(&meets, &cfg));
    }

    #[test]
    fn closer_to_target_wins_among_misses() {
        let cfg = EngineConfig::default();
        let close = run_with_hits(&[2, 3, 2], &cfg);
        let far = run_with_hits(&[1, 0, 1], &cfg);
        assert!(close.is_better_than(&far, &cfg));
    }

    #[test]
    fn empty_run_never_meets_target() {
        let cfg = EngineConfig::default();
        let stats = RunStatistics::from_records(&[], &cfg);
        assert_eq!(stats.steps, 0);
        assert!(!stats.meets_target);
        assert_eq!(stats.avg_hits, 0.0);
    }
}
