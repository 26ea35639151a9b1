//! CandidateSet — one strategy's concrete bet proposal.

use serde::{Deserialize, Serialize};

use super::score::DRAW_SIZE;

/// A proposed set of numbers to bet on, tagged with the strategy that
/// produced it.
///
/// A full set holds exactly [`DRAW_SIZE`] distinct numbers. Strategies may
/// return fewer when the ranking they consume is too short; such sets are
/// flagged by [`CandidateSet::is_short`] and callers fall back per the
/// selection policy instead of propagating an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub strategy: String,
    pub numbers: Vec<u8>,
}

impl CandidateSet {
    /// Build from any number list: deduplicates, sorts, truncates to draw size.
    pub fn new(strategy: &str, numbers: impl IntoIterator<Item = u8>) -> Self {
        let mut nums: Vec<u8> = numbers.into_iter().collect();
        nums.sort_unstable();
        nums.dedup();
        nums.truncate(DRAW_SIZE);
        Self {
            strategy: strategy.to_string(),
            numbers: nums,
        }
    }

    pub fn is_short(&self) -> bool {
        self.numbers.len() < DRAW_SIZE
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    /// Canonical identity key: two sets with the same numbers (any order,
    /// any strategy) share a key. Used for cross-strategy deduplication.
    pub fn key(&self) -> String {
        let parts: Vec<String> = self.numbers.iter().map(|n| n.to_string()).collect();
        parts.join("-")
    }

    /// Count of this set's numbers appearing in `actual`.
    pub fn hits_against(&self, actual: &[u8]) -> usize {
        self.numbers
            .iter()
            .filter(|n| actual.contains(n))
            .count()
    }
}
