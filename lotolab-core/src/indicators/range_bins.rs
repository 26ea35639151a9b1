//! Range-bin hit-rate score.
//!
//! Splits 1..=49 into five fixed bins ([1-10], [11-20], [21-30], [31-40],
//! [41-49]) and counts hits per bin over a recent window. A number scores its
//! bin's share of hits, doubled when the bin is above the mean — the bet that
//! hot ranges stay hot for a while.

use super::Indicator;
use crate::domain::{DrawRecord, ScoreMap};

const BIN_COUNT: usize = 5;

fn bin_of(number: u8) -> usize {
    ((number as usize - 1) / 10).min(BIN_COUNT - 1)
}

#[derive(Debug, Clone)]
pub struct RangeBins {
    pub window: usize,
}

impl Default for RangeBins {
    fn default() -> Self {
        Self { window: 20 }
    }
}

impl Indicator for RangeBins {
    fn name(&self) -> &'static str {
        "range_bins"
    }

    fn min_periods(&self) -> usize {
        5
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let window = &history[..history.len().min(self.window)];
        let mut bin_hits = [0usize; BIN_COUNT];
        let mut total = 0usize;
        for draw in window {
            for &n in &draw.numbers {
                bin_hits[bin_of(n)] += 1;
                total += 1;
            }
        }
        if total == 0 {
            return ScoreMap::zero();
        }
        let mean = total as f64 / BIN_COUNT as f64;
        ScoreMap::from_fn(|n| {
            let hits = bin_hits[bin_of(n)] as f64;
            let share = hits / total as f64 * 100.0;
            if hits > mean {
                share * 2.0
            } else {
                share
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_draws;

    #[test]
    fn bin_layout() {
        assert_eq!(bin_of(1), 0);
        assert_eq!(bin_of(10), 0);
        assert_eq!(bin_of(11), 1);
        assert_eq!(bin_of(41), 4);
        assert_eq!(bin_of(49), 4);
    }

    #[test]
    fn numbers_in_same_bin_share_score() {
        let history = make_draws(20);
        let map = RangeBins::default().compute(&history);
        assert_eq!(map.get(41), map.get(49));
        assert_eq!(map.get(1), map.get(10));
    }

    #[test]
    fn hot_bin_doubles() {
        let history = make_draws(20);
        let map = RangeBins::default().compute(&history);
        // Window of 20 periods × 6 numbers = 120 hits, mean 24/bin. The last
        // bin [41-49] holds only 9 numbers and the synthetic cadence spreads
        // hits roughly evenly, so at least one bin must exceed the mean and
        // bins differ in score.
        let scores: Vec<f64> = [5u8, 15, 25, 35, 45].iter().map(|&n| map.get(n)).collect();
        let max = scores.iter().cloned().fold(f64::MIN, f64::max);
        let min = scores.iter().cloned().fold(f64::MAX, f64::min);
        assert!(max > min);
    }
}
