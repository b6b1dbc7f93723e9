//! Benchmarks for spherical-harmonic basis construction and encoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mica_spatial::sh;
use ndarray::Array2;

/// Directions of a 32-capsule spherical array: roughly uniform rings.
fn sphere_directions(count: usize) -> Vec<(f64, f64)> {
    (0..count)
        .map(|i| {
            let frac = (i as f64 + 0.5) / count as f64;
            let colatitude = (1.0 - 2.0 * frac).acos();
            let azimuth = (2.4 * i as f64).rem_euclid(2.0 * std::f64::consts::PI)
                - std::f64::consts::PI;
            (colatitude, azimuth)
        })
        .collect()
}

/// One second of deterministic multi-tone test signal per capsule.
fn test_signals(channels: usize, samples: usize) -> Array2<f32> {
    Array2::from_shape_fn((channels, samples), |(q, t)| {
        let f = 110.0 * (q as f32 + 1.0);
        (2.0 * std::f32::consts::PI * f * t as f32 / 48_000.0).sin()
    })
}

fn bench_sh_basis(c: &mut Criterion) {
    let directions = sphere_directions(32);
    let mut group = c.benchmark_group("sh_basis");
    for order in [1u32, 2, 3, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter(|| sh::sh_basis(black_box(order), black_box(&directions)));
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let directions = sphere_directions(32);
    let signals = test_signals(32, 48_000);
    let mut group = c.benchmark_group("encode");
    group.sample_size(10);
    for order in [1u32, 3] {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter(|| sh::encode(black_box(order), signals.view(), black_box(&directions)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sh_basis, bench_encode);
criterion_main!(benches);
