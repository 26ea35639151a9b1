//! Domain types for lotolab.

pub mod candidate;
pub mod draw;
pub mod score;

pub use candidate::CandidateSet;
pub use draw::{DrawRecord, HistoryError, PeriodKey};
pub use score::{ScoreMap, WeightVector, DRAW_SIZE, MAX_NUMBER};

/// Period identifier type alias (`YY/NNN` or `YYYYNNN` textual form).
pub type PeriodId = String;
