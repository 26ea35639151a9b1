//! Deterministic synthetic draw histories.
//!
//! Shared by unit tests, integration tests, and benches: period `p`
//! (0 = most recent of `n`) draws `{(p*7 + i) % 49 + 1 : i in 0..6}`, with
//! consecutive period identifiers and weekly dates. The pattern is fully
//! predictable, which makes expected hit totals computable by hand.

use chrono::NaiveDate;

use crate::domain::{DrawRecord, DRAW_SIZE, MAX_NUMBER};

/// Generate `n` consecutive synthetic periods, most recent first.
///
/// All periods share the year 2024 with sequences `n..=1` (newest = highest
/// sequence), so every adjacent pair is consecutive by `PeriodKey`.
pub fn consecutive_history(n: usize) -> Vec<DrawRecord> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
    (0..n)
        .map(|p| {
            let mut numbers = [0u8; DRAW_SIZE];
            for (i, slot) in numbers.iter_mut().enumerate() {
                *slot = ((p * 7 + i) % MAX_NUMBER) as u8 + 1;
            }
            let seq = (n - p) as u32;
            DrawRecord::new(
                &format!("2024{seq:03}"),
                base + chrono::Duration::weeks(seq as i64),
                numbers,
            )
            .expect("synthetic draw is valid")
        })
        .collect()
}

/// The synthetic draw for period index `p` (0 = most recent), sorted.
pub fn draw_numbers(p: usize) -> [u8; DRAW_SIZE] {
    let mut numbers = [0u8; DRAW_SIZE];
    for (i, slot) in numbers.iter_mut().enumerate() {
        *slot = ((p * 7 + i) % MAX_NUMBER) as u8 + 1;
    }
    numbers.sort_unstable();
    numbers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_are_consecutive() {
        let history = consecutive_history(10);
        for pair in history.windows(2) {
            let newer = pair[0].key().unwrap();
            let older = pair[1].key().unwrap();
            assert!(older.is_followed_by(&newer));
        }
    }

    #[test]
    fn newest_period_has_highest_sequence() {
        let history = consecutive_history(5);
        assert_eq!(history[0].period, "2024005");
        assert_eq!(history[4].period, "2024001");
    }

    #[test]
    fn draw_numbers_matches_history() {
        let history = consecutive_history(8);
        for (p, draw) in history.iter().enumerate() {
            assert_eq!(draw.numbers, draw_numbers(p));
        }
    }
}
