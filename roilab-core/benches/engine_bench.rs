//! Criterion benchmarks for the indicator and signal engines.
//!
//! The expanding percentile window grows with the series, so the signal
//! engine is measured at several lengths to watch its scaling.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roilab_core::{compute_indicators, evaluate_signals, PriceSeries, SignalConfig};

fn make_walk(n: usize) -> PriceSeries {
    let mut price = 100.0;
    let mut state: u64 = 7;
    let prices: Vec<f64> = (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let change = ((state >> 33) % 200) as f64 / 100.0 - 1.0;
            price = (price * (1.0 + change * 0.02)).max(1.0);
            price
        })
        .collect();
    PriceSeries::from_prices(NaiveDate::from_ymd_opt(2000, 1, 3).unwrap(), &prices).unwrap()
}

fn bench_indicators(c: &mut Criterion) {
    let config = SignalConfig::default();
    let mut group = c.benchmark_group("compute_indicators");
    for n in [1_000usize, 10_000, 100_000] {
        let series = make_walk(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, s| {
            b.iter(|| compute_indicators(black_box(s), &config).unwrap())
        });
    }
    group.finish();
}

fn bench_signals(c: &mut Criterion) {
    let config = SignalConfig::default();
    let mut group = c.benchmark_group("evaluate_signals");
    for n in [1_000usize, 10_000, 100_000] {
        let series = make_walk(n);
        let indicators = compute_indicators(&series, &config).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, s| {
            b.iter(|| evaluate_signals(black_box(&indicators), s, &config).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_indicators, bench_signals);
criterion_main!(benches);
