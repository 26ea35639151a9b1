//! LotoLab Core — draw history, indicator ensemble, composite scoring,
//! candidate strategies, Monte-Carlo refinement.
//!
//! This crate contains the deterministic heart of the prediction engine:
//! - Domain types (draw records, period keys, score maps, weight vectors,
//!   candidate sets)
//! - The 18-member indicator ensemble behind the `Indicator` trait
//! - Min-max normalization and weighted composite scoring with the one-shot
//!   `score()` entry point
//! - The candidate-selection strategy family
//! - Monte-Carlo candidate refinement with injectable RNG
//! - BLAKE3-derived deterministic RNG hierarchy
//!
//! Everything here is pure compute over immutable history; backtest
//! orchestration and weight adaptation live in `lotolab-runner`.

pub mod candidates;
pub mod domain;
pub mod indicators;
pub mod neural;
pub mod rng;
pub mod scoring;
pub mod simulate;
pub mod synthetic;
