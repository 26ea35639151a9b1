//! Scoring hot-path benchmarks.
//!
//! The composite scorer dominates backtest cost: every replay step recomputes
//! all 18 indicators over the training window.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lotolab_core::domain::WeightVector;
use lotolab_core::indicators::indicator_names;
use lotolab_core::scoring::{score_window, ScoringConfig};
use lotolab_core::synthetic::consecutive_history;

fn bench_score_window(c: &mut Criterion) {
    let weights = WeightVector::uniform(indicator_names());
    let cfg = ScoringConfig::default();
    let mut group = c.benchmark_group("score_window");
    for periods in [50usize, 100, 200] {
        let history = consecutive_history(periods);
        group.bench_with_input(
            BenchmarkId::from_parameter(periods),
            &history,
            |b, history| {
                b.iter(|| score_window(black_box(history), &weights, &cfg));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_score_window);
criterion_main!(benches);
