//! End-to-end backtest over a synthetic gapless archive.

use lotolab_core::scoring::MIN_HISTORY;
use lotolab_core::synthetic::consecutive_history;
use lotolab_runner::{run_backtest, EngineConfig};

fn base_cfg() -> EngineConfig {
    let mut cfg = EngineConfig::default();
    cfg.max_retries = 0;
    cfg.seed_eval_steps = 3;
    cfg.simulation.simulations = 100;
    cfg
}

#[test]
fn full_replay_walks_every_step() {
    let history = consecutive_history(120);
    let cfg = base_cfg();
    let outcome = run_backtest(&history, &cfg, None).unwrap();

    // 120 draws leave one target per offset down to the 12-draw window floor.
    assert_eq!(outcome.run.records.len(), 120 - MIN_HISTORY);
    assert_eq!(outcome.run.skipped_non_consecutive, 0);

    let stats = &outcome.run.statistics;
    assert_eq!(stats.steps, outcome.run.records.len());
    assert_eq!(
        stats.total_hits,
        outcome.run.records.iter().map(|r| r.hit_count).sum::<usize>()
    );
    assert_eq!(stats.hit_histogram.iter().sum::<usize>(), stats.steps);

    // Live prediction is a full valid set.
    assert_eq!(outcome.prediction.numbers.len(), 6);
    let mut sorted = outcome.prediction.numbers.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 6);
    assert!(sorted.iter().all(|&n| (1..=49).contains(&n)));
}

#[test]
fn adapted_weights_stay_within_bounds() {
    let history = consecutive_history(60);
    let cfg = base_cfg();
    let outcome = run_backtest(&history, &cfg, None).unwrap();
    let weights = &outcome.run.final_weights;
    assert!((weights.sum() - 1.0).abs() < 1e-9);
    for (name, w) in weights.iter() {
        assert!(
            w >= cfg.weight_floor - 1e-9 && w <= cfg.weight_ceiling + 1e-9,
            "{name} = {w}"
        );
    }
    for record in &outcome.run.records {
        assert!((record.weights.sum() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn retry_budget_is_spent_or_cut_short_by_success() {
    let history = consecutive_history(40);
    let mut cfg = base_cfg();
    cfg.lookback_periods = 25;
    cfg.max_retries = 2;

    let outcome = run_backtest(&history, &cfg, None).unwrap();
    if outcome.run.statistics.meets_target {
        assert!(outcome.attempts <= cfg.max_retries + 1);
    } else {
        // A run short of target exhausts every retry.
        assert_eq!(outcome.attempts, cfg.max_retries + 1);
    }

    // The whole retry loop is deterministic.
    let again = run_backtest(&history, &cfg, None).unwrap();
    assert_eq!(outcome.attempts, again.attempts);
    assert_eq!(
        outcome.run.statistics.total_hits,
        again.run.statistics.total_hits
    );
    assert_eq!(outcome.run.final_weights, again.run.final_weights);
}

#[test]
fn extra_retries_never_keep_a_worse_run() {
    use std::cmp::Ordering;

    let history = consecutive_history(60);
    let baseline_cfg = base_cfg();
    let mut retried_cfg = base_cfg();
    retried_cfg.max_retries = 4;

    let baseline = run_backtest(&history, &baseline_cfg, None).unwrap();
    let retried = run_backtest(&history, &retried_cfg, None).unwrap();

    // The budget never forks the random streams, so both runs share the same
    // first attempt; a candidate only displaces the kept run by beating it.
    assert_eq!(baseline.fingerprint, retried.fingerprint);
    assert_ne!(
        retried.run.compare_priority(&baseline.run, &retried_cfg),
        Ordering::Less
    );
}

#[test]
fn bad_perturbation_is_a_config_error_not_a_panic() {
    let history = consecutive_history(40);
    let mut cfg = base_cfg();
    cfg.max_retries = 1;
    cfg.perturbation = -0.1;
    let err = run_backtest(&history, &cfg, None).unwrap_err();
    assert!(matches!(err, lotolab_runner::RunError::Config(_)));
}

#[test]
fn archive_gap_is_counted_not_fatal() {
    let mut history = consecutive_history(40);
    // Drop a middle draw so one step loses its consecutive predecessor.
    history.remove(20);
    let outcome = run_backtest(&history, &base_cfg(), None).unwrap();
    assert_eq!(outcome.run.skipped_non_consecutive, 1);
    assert_eq!(outcome.run.records.len(), 39 - MIN_HISTORY - 1);
}
