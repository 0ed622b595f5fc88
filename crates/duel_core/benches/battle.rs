//! Battle benchmarks for duel_core.
//!
//! Run with: `cargo bench -p duel_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use duel_core::prelude::*;
use duel_test_utils::fixtures;

/// Runs full battles between fixture units under every range mode.
pub fn battle_benchmark(c: &mut Criterion) {
    let first = fixtures::profile(&fixtures::catapult());
    let second = fixtures::profile(&fixtures::demolisher());

    let mut group = c.benchmark_group("run_battle");
    for mode in [
        RangeMode::Short,
        RangeMode::Random,
        RangeMode::FastApproach,
        RangeMode::MinimizeDamage,
    ] {
        let config = BattleConfig::default()
            .with_range_mode(mode)
            .with_terrain([20, 30, 40], [10, 10, 10]);
        group.bench_with_input(BenchmarkId::from_parameter(mode), &config, |b, config| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let mut dice = SeededDice::new(seed);
                black_box(run_battle(&first, &second, config, &mut dice))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, battle_benchmark);
criterion_main!(benches);
