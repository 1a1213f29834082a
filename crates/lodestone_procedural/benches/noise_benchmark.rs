//! Benchmark for noise sampling performance.
//!
//! TARGET: 1,000,000 octave samples per second
//!
//! Run with: cargo bench --package lodestone_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lodestone_procedural::noise::{OctaveNoise, SimplexNoise, WorldSeed};
use lodestone_procedural::random::LegacyRandom;

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = SimplexNoise::new(&mut LegacyRandom::from_seed(42));

    c.bench_function("single_simplex_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_octave_sample(c: &mut Criterion) {
    let noise = OctaveNoise::new(WorldSeed::new(42), 4).unwrap();

    c.bench_function("octave_noise_4_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_million_samples(c: &mut Criterion) {
    let noise = OctaveNoise::new(WorldSeed::new(42), 4).unwrap();

    let mut group = c.benchmark_group("million_samples");
    group.throughput(Throughput::Elements(1_000_000));
    group.sample_size(10);

    group.bench_function("1M_octave_samples", |b| {
        b.iter(|| {
            for i in 0..1_000_000u32 {
                let x = f64::from(i % 1000) * 0.1;
                let y = f64::from(i / 1000) * 0.1;
                black_box(noise.sample(x, y));
            }
        });
    });

    group.finish();
}

fn benchmark_noise_construction(c: &mut Criterion) {
    c.bench_function("octave_noise_construction", |b| {
        let mut seed = 0i64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(OctaveNoise::new(WorldSeed::new(seed), 4).unwrap())
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_octave_sample,
    benchmark_million_samples,
    benchmark_noise_construction
);
criterion_main!(benches);
