//! Monte-Carlo candidate refinement.
//!
//! Simulates N uniform 6-of-49 draws and scores every candidate set by its
//! average simulated hit count and hit rate, plus two optional bonuses: the
//! learned predictor's opinion of the candidate's numbers and the producing
//! strategy's historical real-outcome record. The top few survivors go on to
//! real evaluation; when nobody clears the simulated-hit threshold, all
//! candidates survive.
//!
//! The RNG is injected so a fixed seed reproduces the exact simulation set.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{CandidateSet, DRAW_SIZE, MAX_NUMBER};
use crate::scoring::Ranking;

/// Refinement knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulated draws per refinement pass.
    pub simulations: usize,
    /// Candidates forwarded to real evaluation.
    pub survivors: usize,
    /// Simulated average hits a candidate must reach for the survivor cut
    /// to apply; below it, everyone survives.
    pub hit_threshold: f64,
    /// Simulated hits counting as a "hit" for the rate statistic.
    pub rate_min_hits: usize,
    /// Weight of the learned predictor's bonus.
    pub neural_bonus: f64,
    /// Weight of the strategy's historical-performance bonus.
    pub history_bonus: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulations: 500,
            survivors: 3,
            hit_threshold: 0.5,
            rate_min_hits: 2,
            neural_bonus: 0.3,
            history_bonus: 0.5,
        }
    }
}

/// A strategy's running real-outcome record across backtest steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyPerformance {
    pub evaluations: usize,
    pub total_hits: usize,
    pub hits_at_target: usize,
}

impl StrategyPerformance {
    /// Record one real evaluation; `target` is the configured hit count that
    /// counts as a success.
    pub fn record(&mut self, hits: usize, target: usize) {
        self.evaluations += 1;
        self.total_hits += hits;
        if hits >= target {
            self.hits_at_target += 1;
        }
    }

    pub fn avg_hits(&self) -> f64 {
        if self.evaluations == 0 {
            0.0
        } else {
            self.total_hits as f64 / self.evaluations as f64
        }
    }

    pub fn target_rate(&self) -> f64 {
        if self.evaluations == 0 {
            0.0
        } else {
            self.hits_at_target as f64 / self.evaluations as f64
        }
    }
}

/// One candidate's refinement scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: CandidateSet,
    pub sim_avg_hits: f64,
    pub sim_hit_rate: f64,
    pub bonus: f64,
    pub score: f64,
}

/// Draw 6 distinct numbers uniformly from 1..=49.
pub fn simulate_draw(rng: &mut StdRng) -> [u8; DRAW_SIZE] {
    let mut pool: Vec<u8> = (1..=MAX_NUMBER as u8).collect();
    pool.shuffle(rng);
    let mut draw = [0u8; DRAW_SIZE];
    draw.copy_from_slice(&pool[..DRAW_SIZE]);
    draw.sort_unstable();
    draw
}

/// Rank candidates by simulation score and select survivors.
///
/// Output is sorted best-first. Candidate order within equal scores follows
/// input order, so refinement is deterministic for a fixed RNG seed.
pub fn refine(
    candidates: &[CandidateSet],
    ranking: &Ranking,
    performance: &BTreeMap<String, StrategyPerformance>,
    cfg: &SimulationConfig,
    rng: &mut StdRng,
) -> Vec<ScoredCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let draws: Vec<[u8; DRAW_SIZE]> = (0..cfg.simulations.max(1))
        .map(|_| simulate_draw(rng))
        .collect();

    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|candidate| {
            let mut total_hits = 0usize;
            let mut rate_hits = 0usize;
            for draw in &draws {
                let hits = candidate.hits_against(draw);
                total_hits += hits;
                if hits >= cfg.rate_min_hits {
                    rate_hits += 1;
                }
            }
            let sim_avg_hits = total_hits as f64 / draws.len() as f64;
            let sim_hit_rate = rate_hits as f64 / draws.len() as f64;

            let neural: f64 = candidate
                .numbers
                .iter()
                .map(|&n| ranking.normalized_score("neural", n) / 100.0)
                .sum::<f64>()
                / candidate.numbers.len().max(1) as f64;

            let record = performance
                .get(&candidate.strategy)
                .cloned()
                .unwrap_or_default();
            let history = record.avg_hits() / DRAW_SIZE as f64 + record.target_rate();

            let bonus = cfg.neural_bonus * neural + cfg.history_bonus * history;
            let score = sim_avg_hits + sim_hit_rate + bonus;
            ScoredCandidate {
                candidate: candidate.clone(),
                sim_avg_hits,
                sim_hit_rate,
                bonus,
                score,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let best_reaches_threshold = scored
        .first()
        .map(|s| s.sim_avg_hits >= cfg.hit_threshold)
        .unwrap_or(false);
    if best_reaches_threshold {
        scored.truncate(cfg.survivors.max(1));
    }
    scored
}
