//! DrawRecord — the fundamental draw-history unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::score::{DRAW_SIZE, MAX_NUMBER};

/// Errors raised at the history boundary.
///
/// Nothing inside the scoring pipeline raises these; indicators degrade to
/// zero score maps on short input. Only empty or malformed history is
/// rejected, and only at the entry points.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history is empty")]
    Empty,
    #[error("history has {got} periods, need at least {need}")]
    InsufficientData { got: usize, need: usize },
    #[error("unparseable period identifier '{0}' (expected YY/NNN or YYYYNNN)")]
    BadPeriodId(String),
    #[error("draw {period} has number {number} outside 1..={max}", max = MAX_NUMBER)]
    NumberOutOfRange { period: String, number: u8 },
    #[error("draw {period} has {got} numbers, expected {expected}")]
    WrongDrawSize {
        period: String,
        got: usize,
        expected: usize,
    },
}

/// One historical lottery draw.
///
/// Histories are ordered most-recent-first (index 0 = latest period) and
/// never mutated after ingestion. `numbers` is kept sorted ascending so
/// membership checks and canonical comparison need no re-sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub period: String,
    pub date: NaiveDate,
    pub numbers: [u8; DRAW_SIZE],
}

impl DrawRecord {
    /// Build a record, validating number range and draw size.
    pub fn new(period: &str, date: NaiveDate, mut numbers: [u8; DRAW_SIZE]) -> Result<Self, HistoryError> {
        for &n in &numbers {
            if n < 1 || n > MAX_NUMBER as u8 {
                return Err(HistoryError::NumberOutOfRange {
                    period: period.to_string(),
                    number: n,
                });
            }
        }
        numbers.sort_unstable();
        Ok(Self {
            period: period.to_string(),
            date,
            numbers,
        })
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    pub fn key(&self) -> Result<PeriodKey, HistoryError> {
        PeriodKey::parse(&self.period)
    }
}

/// Decomposed period identifier: draw year plus sequence within the year.
///
/// Accepted textual forms:
/// - `YY/NNN` — two-digit year (pivot 2000) and sequence, e.g. `24/087`
/// - `YYYYNNN` — four-digit year and three-digit sequence, e.g. `2024087`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: u32,
    pub seq: u32,
}

impl PeriodKey {
    pub fn parse(id: &str) -> Result<Self, HistoryError> {
        let bad = || HistoryError::BadPeriodId(id.to_string());

        if let Some((y, s)) = id.split_once('/') {
            let year: u32 = y.parse().map_err(|_| bad())?;
            let seq: u32 = s.parse().map_err(|_| bad())?;
            if y.len() > 2 || seq == 0 {
                return Err(bad());
            }
            return Ok(Self {
                year: 2000 + year,
                seq,
            });
        }

        // YYYYNNN: 7 digits, first four are the year
        if id.len() == 7 && id.chars().all(|c| c.is_ascii_digit()) {
            let year: u32 = id[..4].parse().map_err(|_| bad())?;
            let seq: u32 = id[4..].parse().map_err(|_| bad())?;
            if seq == 0 {
                return Err(bad());
            }
            return Ok(Self { year, seq });
        }

        Err(bad())
    }

    /// True when `next` is the draw immediately after `self`.
    ///
    /// Either the same year with sequence + 1, or the first draw of the
    /// following year. This predicate gates which training windows are valid:
    /// a window whose newest period is not consecutive with its target would
    /// span a data gap.
    pub fn is_followed_by(&self, next: &PeriodKey) -> bool {
        (next.year == self.year && next.seq == self.seq + 1)
            || (next.year == self.year + 1 && next.seq == 1)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.year, self.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slash_form() {
        let k = PeriodKey::parse("24/087").unwrap();
        assert_eq!(k.year, 2024);
        assert_eq!(k.seq, 87);
    }

    #[test]
    fn parses_long_form() {
        let k = PeriodKey::parse("2024087").unwrap();
        assert_eq!(k.year, 2024);
        assert_eq!(k.seq, 87);
    }

    #[test]
    fn rejects_garbage() {
        assert!(PeriodKey::parse("").is_err());
        assert!(PeriodKey::parse("abc").is_err());
        assert!(PeriodKey::parse("2024/87").is_err());
        assert!(PeriodKey::parse("2024000").is_err());
    }

    #[test]
    fn consecutive_within_year() {
        let a = PeriodKey { year: 2024, seq: 87 };
        let b = PeriodKey { year: 2024, seq: 88 };
        assert!(a.is_followed_by(&b));
        assert!(!b.is_followed_by(&a));
    }

    #[test]
    fn consecutive_across_year_wrap() {
        let a = PeriodKey { year: 2023, seq: 153 };
        let b = PeriodKey { year: 2024, seq: 1 };
        assert!(a.is_followed_by(&b));
    }

    #[test]
    fn non_consecutive_gap() {
        let a = PeriodKey { year: 2024, seq: 87 };
        let b = PeriodKey { year: 2024, seq: 89 };
        assert!(!a.is_followed_by(&b));
    }

    #[test]
    fn new_sorts_and_validates() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 20).unwrap();
        let rec = DrawRecord::new("24/087", date, [9, 3, 44, 17, 28, 1]).unwrap();
        assert_eq!(rec.numbers, [1, 3, 9, 17, 28, 44]);
        assert!(rec.contains(17));
        assert!(!rec.contains(18));

        assert!(DrawRecord::new("24/088", date, [0, 3, 44, 17, 28, 1]).is_err());
        assert!(DrawRecord::new("24/088", date, [50, 3, 44, 17, 28, 1]).is_err());
    }
}
