//! Similarity-cluster score.
//!
//! Numbers are greedily clustered by cosine similarity of their appearance
//! vectors over a recent window: a number joins the first existing cluster
//! whose seed it resembles above the threshold, else it seeds a new cluster.
//! A number scores by the share of its cluster present in the latest draw —
//! the "friends of what just came out" heuristic.

use super::{appearance_series, Indicator};
use crate::domain::{DrawRecord, ScoreMap, MAX_NUMBER};

#[derive(Debug, Clone)]
pub struct Cluster {
    pub window: usize,
    pub similarity_threshold: f64,
}

impl Default for Cluster {
    fn default() -> Self {
        Self {
            window: 50,
            similarity_threshold: 0.35,
        }
    }
}

/// Cosine similarity; 0.0 when either vector is all-zero.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na <= f64::EPSILON || nb <= f64::EPSILON {
        0.0
    } else {
        dot / (na * nb)
    }
}

impl Indicator for Cluster {
    fn name(&self) -> &'static str {
        "cluster"
    }

    fn min_periods(&self) -> usize {
        10
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let window = &history[..history.len().min(self.window)];
        let vectors: Vec<Vec<f64>> = (1..=MAX_NUMBER as u8)
            .map(|n| appearance_series(window, n))
            .collect();

        // Greedy assignment against cluster seeds, in number order.
        let mut cluster_of = [usize::MAX; MAX_NUMBER];
        let mut seeds: Vec<usize> = Vec::new(); // index of each cluster's seed number
        for i in 0..MAX_NUMBER {
            let mut assigned = false;
            for (c, &seed) in seeds.iter().enumerate() {
                if cosine(&vectors[i], &vectors[seed]) >= self.similarity_threshold {
                    cluster_of[i] = c;
                    assigned = true;
                    break;
                }
            }
            if !assigned {
                cluster_of[i] = seeds.len();
                seeds.push(i);
            }
        }

        let mut cluster_sizes = vec![0usize; seeds.len()];
        for &c in &cluster_of {
            cluster_sizes[c] += 1;
        }

        let latest = &history[0];
        let mut cluster_hits = vec![0usize; seeds.len()];
        for &n in &latest.numbers {
            cluster_hits[cluster_of[n as usize - 1]] += 1;
        }

        ScoreMap::from_fn(|n| {
            let c = cluster_of[n as usize - 1];
            cluster_hits[c] as f64 / cluster_sizes[c] as f64 * 100.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_draws;

    #[test]
    fn cosine_sanity() {
        assert!((cosine(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn cluster_mates_of_latest_draw_score() {
        let history = make_draws(30);
        let map = Cluster::default().compute(&history);
        // 1..6 always co-occur → same cluster, all six in the latest draw.
        assert!(map.get(1) > 0.0);
        assert_eq!(map.get(1), map.get(2));
    }

    #[test]
    fn scores_bounded() {
        let history = make_draws(30);
        let map = Cluster::default().compute(&history);
        for (_, s) in map.iter() {
            assert!((0.0..=100.0).contains(&s));
        }
    }
}
