//! # Strategy Churn Benchmark
//!
//! Measures allocate/release cycles under each placement strategy over a
//! fragmented address space.
//!
//! Run with: `cargo bench --package contig_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use contig_core::{MemoryManager, ProcessId, StrategyKind};

/// Operations per benchmark iteration.
const CHURN_OPS: u32 = 512;

/// One deterministic churn cycle: interleaved allocations and releases
/// that fragment the space and force full-list scans.
fn churn(kind: StrategyKind) -> u32 {
    let mut manager = MemoryManager::new(kind.strategy());
    let mut survivors = 0;
    for i in 0..CHURN_OPS {
        let id = ProcessId::new(format!("P{}", i % 16));
        // Sizes cycle 2..=16 KiB; every fourth op releases instead.
        if i % 4 == 3 {
            survivors += manager.release(&id);
        } else if manager.allocate(id, 2 + (i * 2) % 16) {
            survivors += 1;
        }
    }
    survivors
}

fn bench_strategy_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_churn");

    for kind in [
        StrategyKind::FirstFit,
        StrategyKind::NextFit,
        StrategyKind::BestFit,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter(|| black_box(churn(kind)));
        });
    }

    group.finish();
}

/// Benchmark: fill the space one unit at a time, then release everything.
fn bench_fill_and_drain(c: &mut Criterion) {
    c.bench_function("fill_and_drain_first_fit", |b| {
        b.iter(|| {
            let mut manager = MemoryManager::new(StrategyKind::FirstFit.strategy());
            let units = manager.config().units();
            for i in 0..units {
                assert!(manager.allocate(ProcessId::new(format!("P{i}")), 2));
            }
            for i in 0..units {
                assert!(manager.release(&ProcessId::new(format!("P{i}"))) > 0);
            }
            black_box(manager.steps())
        });
    });
}

criterion_group!(benches, bench_strategy_churn, bench_fill_and_drain);
criterion_main!(benches);
