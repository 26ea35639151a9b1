//! Score maps and the ensemble weight vector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest drawable number; the score domain is `1..=MAX_NUMBER`.
pub const MAX_NUMBER: usize = 49;

/// Numbers per draw.
pub const DRAW_SIZE: usize = 6;

/// Dense per-number score map over `1..=49`.
///
/// Indicator semantics differ (a frequency count and a hazard ratio are not
/// comparable), so raw maps are only combined after min-max normalization in
/// the composite scorer. A zero-initialized map is the "no signal" value every
/// calculator degrades to on short input.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMap {
    scores: [f64; MAX_NUMBER],
}

impl Default for ScoreMap {
    fn default() -> Self {
        Self::zero()
    }
}

impl ScoreMap {
    pub fn zero() -> Self {
        Self {
            scores: [0.0; MAX_NUMBER],
        }
    }

    /// Build from a closure over each number in `1..=49`.
    pub fn from_fn(mut f: impl FnMut(u8) -> f64) -> Self {
        let mut map = Self::zero();
        for n in 1..=MAX_NUMBER as u8 {
            map.set(n, f(n));
        }
        map
    }

    pub fn get(&self, number: u8) -> f64 {
        self.scores[number as usize - 1]
    }

    pub fn set(&mut self, number: u8, score: f64) {
        self.scores[number as usize - 1] = score;
    }

    pub fn add(&mut self, number: u8, delta: f64) {
        self.scores[number as usize - 1] += delta;
    }

    /// Iterate `(number, score)` pairs in number order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.scores
            .iter()
            .enumerate()
            .map(|(i, &s)| (i as u8 + 1, s))
    }

    pub fn min(&self) -> f64 {
        self.scores.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.scores
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn is_zero(&self) -> bool {
        self.scores.iter().all(|&s| s == 0.0)
    }

    /// Min-max normalize into `[0, 100]`.
    ///
    /// A range-zero map (all scores identical, including all-zero) normalizes
    /// to all-zero rather than dividing by zero.
    pub fn normalized(&self) -> ScoreMap {
        let lo = self.min();
        let hi = self.max();
        let range = hi - lo;
        if !range.is_finite() || range <= f64::EPSILON {
            return ScoreMap::zero();
        }
        ScoreMap::from_fn(|n| (self.get(n) - lo) / range * 100.0)
    }

    /// Numbers sorted by descending score, ties broken by ascending number.
    pub fn ranked_numbers(&self) -> Vec<u8> {
        let mut order: Vec<u8> = (1..=MAX_NUMBER as u8).collect();
        order.sort_by(|&a, &b| {
            self.get(b)
                .partial_cmp(&self.get(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        order
    }
}

/// Per-indicator ensemble weights.
///
/// Invariants (enforced by `bounded`/`normalized`, checked by the adapter's
/// callers): every component lies in the configured bounds and the vector
/// sums to 1 at the moment it is used for combination. Stored as a BTreeMap
/// so iteration order, serialization, and hashing are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector(BTreeMap<String, f64>);

impl WeightVector {
    /// Uniform weights over the given indicator names.
    pub fn uniform<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let map: BTreeMap<String, f64> = names.into_iter().map(|n| (n.into(), 1.0)).collect();
        Self(map).normalized()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(n, w)| (n.into(), w.max(0.0)))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: &str, weight: f64) {
        self.0.insert(name.to_string(), weight.max(0.0));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(n, &w)| (n.as_str(), w))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Rescale so components sum to 1. A degenerate all-zero vector falls
    /// back to uniform.
    pub fn normalized(&self) -> WeightVector {
        let total = self.sum();
        if total <= f64::EPSILON {
            let n = self.0.len().max(1) as f64;
            return WeightVector(self.0.keys().map(|k| (k.clone(), 1.0 / n)).collect());
        }
        WeightVector(self.0.iter().map(|(k, w)| (k.clone(), w / total)).collect())
    }

    /// Clamp every component into `[lo, hi]`.
    pub fn clamped(&self, lo: f64, hi: f64) -> WeightVector {
        WeightVector(
            self.0
                .iter()
                .map(|(k, w)| (k.clone(), w.clamp(lo, hi)))
                .collect(),
        )
    }

    /// Project onto the set {sum = 1, every component in [lo, hi]}.
    ///
    /// A single clamp-then-normalize is not enough: dividing by a sum above 1
    /// pushes floor-clamped components back below `lo`. Instead, a common
    /// shift is added to every component before clamping, chosen by bisection
    /// so the clamped result sums to 1. The clamped sum is monotone in the
    /// shift, so bisection always lands on it when the box is feasible
    /// (`lo * n < 1 < hi * n`); an infeasible box falls back to the clamped
    /// uniform vector.
    pub fn bounded(&self, lo: f64, hi: f64) -> WeightVector {
        if self.0.is_empty() {
            return self.clone();
        }
        let w = self.normalized();
        let n = w.0.len() as f64;
        if lo * n >= 1.0 || hi * n <= 1.0 {
            let even = (1.0 / n).clamp(lo, hi);
            return WeightVector(w.0.keys().map(|k| (k.clone(), even)).collect());
        }
        let max = w.0.values().fold(f64::MIN, |a, &b| a.max(b));
        let min = w.0.values().fold(f64::MAX, |a, &b| a.min(b));
        let mut a = lo - max;
        let mut b = hi - min;
        for _ in 0..100 {
            let mid = 0.5 * (a + b);
            let sum: f64 = w.0.values().map(|&v| (v + mid).clamp(lo, hi)).sum();
            if sum < 1.0 {
                a = mid;
            } else {
                b = mid;
            }
        }
        let shift = 0.5 * (a + b);
        WeightVector(
            w.0.iter()
                .map(|(k, &v)| (k.clone(), (v + shift).clamp(lo, hi)))
                .collect(),
        )
    }
}
