//! Criterion benchmarks over the optimization-stage table.

use criterion::{Criterion, criterion_group, criterion_main};
use sgemm::matrix::naive_ikj::matmul_naive_ikj;
use sgemm::{BlockingParams, PackingPolicy, multiply};

fn bench_stages(crit: &mut Criterion) {
    let stages: &[(&str, BlockingParams)] = &[
        (
            "blocked_eager",
            BlockingParams::new(512, 64, 512, PackingPolicy::Eager),
        ),
        (
            "tuned_eager",
            BlockingParams::new(1024, 64, 1024, PackingPolicy::Eager),
        ),
        (
            "tuned_lazy",
            BlockingParams::new(1024, 64, 1024, PackingPolicy::Lazy),
        ),
    ];

    for &n in &[256usize, 512, 1024] {
        let a: Vec<f32> = (0..n * n).map(|i| (i % 100) as f32).collect();
        let b: Vec<f32> = (0..n * n).map(|i| (i % 100) as f32).collect();
        let mut c = vec![0.0f32; n * n];

        let mut group = crit.benchmark_group(format!("gemm_{n}"));
        if n >= 1024 {
            group.sample_size(10);
        }

        if n <= 256 {
            group.bench_function("scalar_ikj", |bench| {
                bench.iter(|| matmul_naive_ikj(&a, &b, &mut c, n));
            });
        }

        for (name, params) in stages {
            group.bench_function(*name, |bench| {
                bench.iter(|| multiply(&a, &b, &mut c, n, params));
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_stages);
criterion_main!(benches);
