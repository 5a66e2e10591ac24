use criterion::{black_box, criterion_group, criterion_main, Criterion};
use latency_analyzer::aggregator::{aggregate_percentiles, aggregate_statistics};
use latency_analyzer::sample::Sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn samples(count: usize) -> Vec<Sample> {
    let mut rng = StdRng::seed_from_u64(1);
    let threads = [1, 2, 4, 8, 16, 32, 64, 128];
    let sizes = [1024, 4096, 51_200, 204_800, 1_048_576, 2_097_152, 5_242_880];
    (0..count)
        .map(|i| Sample {
            timestamp: 1_700_000_000_000 + i as i64,
            elapsed_ms: rng.gen_range(0.5..2_000.0),
            sent_bytes: sizes[rng.gen_range(0..sizes.len())],
            active_threads: threads[rng.gen_range(0..threads.len())],
        })
        .collect()
}

fn benchmark(c: &mut Criterion) {
    let samples = samples(200_000);
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(20);
    group.bench_function("statistics", |b| {
        b.iter(|| aggregate_statistics(black_box(&samples)))
    });
    group.bench_function("percentiles", |b| {
        b.iter(|| aggregate_percentiles(black_box(&samples)))
    });
    group.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
