//! LotoLab Runner — adaptive backtest orchestration over `lotolab-core`.
//!
//! This crate builds on `lotolab-core` to provide:
//! - Prediction/outcome comparison and per-step validation records
//! - Per-indicator hit attribution
//! - Weight adaptation toward the hit and accuracy targets
//! - Seed weight profiles with parallel selection
//! - The replay engine with bounded perturbation retries
//! - Run statistics, fingerprinting and configuration loading

pub mod adapter;
pub mod attribution;
pub mod compare;
pub mod config;
pub mod engine;
pub mod seeds;
pub mod stats;
pub mod step;

pub use adapter::adapt;
pub use attribution::{attribute, Attribution};
pub use compare::{compare_prediction, Comparison, ValidationRecord};
pub use config::{AdapterConfig, ConfigError, EngineConfig};
pub use engine::{run_backtest, BacktestOutcome, LivePrediction, ProgressFn, RunError};
pub use seeds::{seed_profiles, select_seed, SeedEvaluation, SeedProfile};
pub use stats::{BacktestRun, RunStatistics};
pub use step::{evaluate_step, StepOutcome};
