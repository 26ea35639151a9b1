//! Candidate-selection strategies.
//!
//! Each strategy turns the composite ranking (top-40) into one concrete
//! 6-number bet. All strategies are deterministic given identical inputs;
//! a strategy facing a too-short ranking returns its best available count
//! and the set is flagged short (see [`CandidateSet::is_short`]). Duplicate
//! sets across strategies are removed by canonical sorted-number key.

use crate::domain::{CandidateSet, DrawRecord, DRAW_SIZE, MAX_NUMBER};
use crate::scoring::Ranking;

/// One deterministic ranking → bet heuristic.
pub trait SelectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn select(&self, ranking: &Ranking, history: &[DrawRecord]) -> CandidateSet;
}

/// The full strategy family in canonical order.
pub fn all_strategies() -> Vec<Box<dyn SelectionStrategy>> {
    vec![
        Box::new(TopSix),
        Box::new(DiversityGreedy),
        Box::new(Balanced { top: 1 }),
        Box::new(Balanced { top: 2 }),
        Box::new(Balanced { top: 3 }),
        Box::new(RangeBinned),
        Box::new(ParityBalanced),
        Box::new(TopKHybrid { k: 4 }),
        Box::new(TopKHybrid { k: 5 }),
        Box::new(HitFrequency { window: None }),
        Box::new(HitFrequency { window: Some(20) }),
        Box::new(SumTarget),
    ]
}

/// Remove duplicate candidate sets (same numbers, any strategy), keeping the
/// first producer's tag.
pub fn dedup_candidates(candidates: Vec<CandidateSet>) -> Vec<CandidateSet> {
    let mut seen = std::collections::BTreeSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.key()))
        .collect()
}

/// Numbers within this distance of an already-picked number count as "too
/// close" for the diversity strategies.
const DIVERSITY_DISTANCE: u8 = 5;

fn closeness_penalty(n: u8, selected: &[u8]) -> usize {
    selected
        .iter()
        .filter(|&&m| n.abs_diff(m) < DIVERSITY_DISTANCE)
        .count()
}

/// Greedy diversity fill: walk the ranking, preferring the highest-ranked
/// number with the fewest too-close conflicts against what is already picked.
fn diversity_fill(ranked: &[u8], mut selected: Vec<u8>, want: usize) -> Vec<u8> {
    while selected.len() < want {
        let pick = ranked
            .iter()
            .filter(|n| !selected.contains(n))
            .min_by_key(|&&n| closeness_penalty(n, &selected));
        match pick {
            Some(&n) => selected.push(n),
            None => break,
        }
    }
    selected
}

// ─── Strategies ──────────────────────────────────────────────────────

/// The straight bet: the six best composite scores.
#[derive(Debug, Clone)]
pub struct TopSix;

impl SelectionStrategy for TopSix {
    fn name(&self) -> &'static str {
        "top_six"
    }

    fn select(&self, ranking: &Ranking, _history: &[DrawRecord]) -> CandidateSet {
        CandidateSet::new(self.name(), ranking.numbers().into_iter().take(DRAW_SIZE))
    }
}

/// Diversity-maximizing greedy insertion over the whole ranking.
#[derive(Debug, Clone)]
pub struct DiversityGreedy;

impl SelectionStrategy for DiversityGreedy {
    fn name(&self) -> &'static str {
        "diversity"
    }

    fn select(&self, ranking: &Ranking, _history: &[DrawRecord]) -> CandidateSet {
        let ranked = ranking.numbers();
        let seed = ranked.first().map(|&n| vec![n]).unwrap_or_default();
        CandidateSet::new(self.name(), diversity_fill(&ranked, seed, DRAW_SIZE))
    }
}

/// Top-`top` picks kept as-is, remainder filled for diversity.
#[derive(Debug, Clone)]
pub struct Balanced {
    pub top: usize,
}

impl SelectionStrategy for Balanced {
    fn name(&self) -> &'static str {
        match self.top {
            1 => "balanced_1_5",
            2 => "balanced_2_4",
            3 => "balanced_3_3",
            _ => "balanced",
        }
    }

    fn select(&self, ranking: &Ranking, _history: &[DrawRecord]) -> CandidateSet {
        let ranked = ranking.numbers();
        let seed: Vec<u8> = ranked.iter().copied().take(self.top).collect();
        CandidateSet::new(self.name(), diversity_fill(&ranked, seed, DRAW_SIZE))
    }
}

/// One best-scoring number from each of six equal-width range bins,
/// backfilled from the ranking when a bin has no ranked number.
#[derive(Debug, Clone)]
pub struct RangeBinned;

impl SelectionStrategy for RangeBinned {
    fn name(&self) -> &'static str {
        "range_binned"
    }

    fn select(&self, ranking: &Ranking, _history: &[DrawRecord]) -> CandidateSet {
        let ranked = ranking.numbers();
        let bin_width = MAX_NUMBER.div_ceil(DRAW_SIZE) as u8; // 9: bins 1-9, 10-18, … 46-49
        let mut picks: Vec<u8> = Vec::with_capacity(DRAW_SIZE);
        for bin in 0..DRAW_SIZE as u8 {
            let lo = bin * bin_width + 1;
            let hi = ((bin + 1) * bin_width).min(MAX_NUMBER as u8);
            if let Some(&n) = ranked.iter().find(|&&n| n >= lo && n <= hi) {
                picks.push(n);
            }
        }
        // Backfill empty bins from the top of the ranking.
        for &n in &ranked {
            if picks.len() >= DRAW_SIZE {
                break;
            }
            if !picks.contains(&n) {
                picks.push(n);
            }
        }
        CandidateSet::new(self.name(), picks)
    }
}

/// Three best-ranked odd numbers plus three best-ranked even numbers,
/// backfilled from the ranking when one parity runs short.
#[derive(Debug, Clone)]
pub struct ParityBalanced;

impl SelectionStrategy for ParityBalanced {
    fn name(&self) -> &'static str {
        "parity_balanced"
    }

    fn select(&self, ranking: &Ranking, _history: &[DrawRecord]) -> CandidateSet {
        let ranked = ranking.numbers();
        let half = DRAW_SIZE / 2;
        let mut picks: Vec<u8> = ranked
            .iter()
            .copied()
            .filter(|n| n % 2 == 1)
            .take(half)
            .collect();
        picks.extend(ranked.iter().copied().filter(|n| n % 2 == 0).take(half));
        for &n in &ranked {
            if picks.len() >= DRAW_SIZE {
                break;
            }
            if !picks.contains(&n) {
                picks.push(n);
            }
        }
        CandidateSet::new(self.name(), picks)
    }
}

/// Top-k kept, the rest filled for diversity from the remainder.
#[derive(Debug, Clone)]
pub struct TopKHybrid {
    pub k: usize,
}

impl SelectionStrategy for TopKHybrid {
    fn name(&self) -> &'static str {
        match self.k {
            4 => "hybrid_top4",
            5 => "hybrid_top5",
            _ => "hybrid",
        }
    }

    fn select(&self, ranking: &Ranking, _history: &[DrawRecord]) -> CandidateSet {
        let ranked = ranking.numbers();
        let seed: Vec<u8> = ranked.iter().copied().take(self.k).collect();
        // Remainder excludes the seed's immediate successors so the fill
        // actually differs from plain top-6.
        let remainder: Vec<u8> = ranked.iter().copied().skip(self.k + 2).collect();
        let filled = diversity_fill(&remainder, seed, DRAW_SIZE);
        CandidateSet::new(self.name(), filled)
    }
}

/// Numbers that actually hit in past draws, ranked by hit frequency within
/// the current top list, backfilled by composite score.
#[derive(Debug, Clone)]
pub struct HitFrequency {
    /// Restrict counting to the most recent N periods; `None` = whole window.
    pub window: Option<usize>,
}

impl SelectionStrategy for HitFrequency {
    fn name(&self) -> &'static str {
        match self.window {
            Some(_) => "hit_recent",
            None => "hit_frequency",
        }
    }

    fn select(&self, ranking: &Ranking, history: &[DrawRecord]) -> CandidateSet {
        let ranked = ranking.numbers();
        let window = match self.window {
            Some(w) => &history[..history.len().min(w)],
            None => history,
        };
        let mut with_hits: Vec<(usize, usize, u8)> = ranked
            .iter()
            .enumerate()
            .map(|(rank, &n)| {
                let hits = window.iter().filter(|d| d.contains(n)).count();
                (hits, rank, n)
            })
            .filter(|&(hits, _, _)| hits > 0)
            .collect();
        // Most hits first; composite rank breaks ties.
        with_hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut picks: Vec<u8> = with_hits.into_iter().map(|(_, _, n)| n).collect();
        for &n in &ranked {
            if picks.len() >= DRAW_SIZE {
                break;
            }
            if !picks.contains(&n) {
                picks.push(n);
            }
        }
        picks.truncate(DRAW_SIZE);
        CandidateSet::new(self.name(), picks)
    }
}

/// Greedy pick steering the set's sum toward the historical mean draw sum.
#[derive(Debug, Clone)]
pub struct SumTarget;

impl SelectionStrategy for SumTarget {
    fn name(&self) -> &'static str {
        "sum_target"
    }

    fn select(&self, ranking: &Ranking, history: &[DrawRecord]) -> CandidateSet {
        let ranked = ranking.numbers();
        let mean_sum = if history.is_empty() {
            // Uniform expectation: 6 * 25
            150.0
        } else {
            history
                .iter()
                .map(|d| d.numbers.iter().map(|&n| n as f64).sum::<f64>())
                .sum::<f64>()
                / history.len() as f64
        };

        let mut picks: Vec<u8> = ranked.iter().copied().take(2).collect();
        while picks.len() < DRAW_SIZE {
            let current: f64 = picks.iter().map(|&n| n as f64).sum();
            let remaining = (DRAW_SIZE - picks.len()) as f64;
            let ideal = (mean_sum - current) / remaining;
            let pick = ranked
                .iter()
                .filter(|n| !picks.contains(n))
                .min_by(|&&a, &&b| {
                    let da = (a as f64 - ideal).abs();
                    let db = (b as f64 - ideal).abs();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                });
            match pick {
                Some(&n) => picks.push(n),
                None => break,
            }
        }
        CandidateSet::new(self.name(), picks)
    }
}
