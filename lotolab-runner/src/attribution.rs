//! Per-indicator performance attribution.
//!
//! For one backtest step: within each indicator's own ordering of the ranked
//! numbers, compare the average rank of numbers that actually hit against the
//! average rank of the misses. An indicator that ranked the hit numbers
//! better (lower mean rank) than the misses gets a positive attribution,
//! normalized by the list length so values are comparable across steps.

use std::collections::BTreeMap;

use lotolab_core::scoring::Ranking;

/// Signed per-indicator attribution for one step. Positive = the indicator's
/// favorites coincided with the real draw.
pub type Attribution = BTreeMap<String, f64>;

/// Compute the attribution for one step, or `None` in the degenerate cases:
/// no ranked number hit, or every ranked number hit.
pub fn attribute(ranking: &Ranking, actual: &[u8]) -> Option<Attribution> {
    let ranked = &ranking.ranked;
    if ranked.is_empty() {
        return None;
    }
    let hit_flags: Vec<bool> = ranked
        .iter()
        .map(|r| actual.contains(&r.number))
        .collect();
    let hit_total = hit_flags.iter().filter(|&&h| h).count();
    if hit_total == 0 || hit_total == ranked.len() {
        return None;
    }

    let indicator_names: Vec<String> = ranked[0].normalized.keys().cloned().collect();
    let n = ranked.len() as f64;

    let mut attribution = Attribution::new();
    for name in indicator_names {
        // Order the ranked numbers by this indicator's normalized score.
        let mut order: Vec<usize> = (0..ranked.len()).collect();
        order.sort_by(|&a, &b| {
            let sa = ranked[a].normalized.get(&name).copied().unwrap_or(0.0);
            let sb = ranked[b].normalized.get(&name).copied().unwrap_or(0.0);
            sb.partial_cmp(&sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ranked[a].number.cmp(&ranked[b].number))
        });

        let mut hit_rank_sum = 0.0;
        let mut miss_rank_sum = 0.0;
        let mut hits = 0.0;
        let mut misses = 0.0;
        for (rank, &idx) in order.iter().enumerate() {
            if hit_flags[idx] {
                hit_rank_sum += rank as f64;
                hits += 1.0;
            } else {
                miss_rank_sum += rank as f64;
                misses += 1.0;
            }
        }
        // Positive when hits rank better (lower) than misses.
        let value = (miss_rank_sum / misses - hit_rank_sum / hits) / n;
        attribution.insert(name, value);
    }
    Some(attribution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotolab_core::scoring::{RankedNumber, Ranking};
    use std::collections::BTreeMap;

    /// Ranking where indicator "good" scores hit numbers high and "bad"
    /// scores them low.
    fn synthetic_ranking(numbers: &[u8], hits: &[u8]) -> Ranking {
        let ranked = numbers
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let is_hit = hits.contains(&n);
                let mut normalized = BTreeMap::new();
                normalized.insert("good".to_string(), if is_hit { 100.0 } else { 10.0 });
                normalized.insert("bad".to_string(), if is_hit { 10.0 } else { 100.0 });
                normalized.insert("flat".to_string(), 50.0);
                RankedNumber {
                    number: n,
                    composite: (numbers.len() - i) as f64,
                    raw: BTreeMap::new(),
                    normalized,
                }
            })
            .collect();
        Ranking {
            ranked,
            diagnostics: Default::default(),
        }
    }

    #[test]
    fn discriminating_indicator_gets_positive_attribution() {
        let numbers: Vec<u8> = (1..=20).collect();
        let ranking = synthetic_ranking(&numbers, &[3, 7, 11]);
        let attr = attribute(&ranking, &[3, 7, 11, 40, 41, 42]).unwrap();
        assert!(attr["good"] > 0.0);
        assert!(attr["bad"] < 0.0);
        assert!((attr["good"] + attr["bad"]).abs() < 1e-9); // mirror images
    }

    #[test]
    fn zero_hits_is_degenerate() {
        let numbers: Vec<u8> = (1..=20).collect();
        let ranking = synthetic_ranking(&numbers, &[]);
        assert!(attribute(&ranking, &[40, 41, 42, 43, 44, 45]).is_none());
    }

    #[test]
    fn all_hits_is_degenerate() {
        let numbers: Vec<u8> = vec![1, 2, 3];
        let ranking = synthetic_ranking(&numbers, &[1, 2, 3]);
        assert!(attribute(&ranking, &[1, 2, 3]).is_none());
    }

    #[test]
    fn empty_ranking_is_degenerate() {
        let ranking = Ranking {
            ranked: Vec::new(),
            diagnostics: Default::default(),
        };
        assert!(attribute(&ranking, &[1, 2, 3]).is_none());
    }
}
