//! Progressive-optimization benchmark runner.
//!
//! Runs the GEMM stages in order - naive loops, then the blocked engine
//! under increasingly aggressive blocking/packing parameters - and
//! reports GFLOPS and speedup over the naive baseline. Each stage is
//! verified against the reference product before it is timed.

use sgemm::matrix::naive_ijk::matmul_naive_ijk;
use sgemm::matrix::naive_ikj::matmul_naive_ikj;
use sgemm::{BlockingParams, PackingPolicy, multiply};
use std::time::Instant;

/// The optimization stages, as data: same scheduler, different knobs.
const STAGES: &[(&str, BlockingParams)] = &[
    (
        "Blocked eager",
        BlockingParams::new(512, 64, 512, PackingPolicy::Eager),
    ),
    (
        "Tuned blocks",
        BlockingParams::new(1024, 64, 1024, PackingPolicy::Eager),
    ),
    (
        "Tuned + lazy",
        BlockingParams::new(1024, 64, 1024, PackingPolicy::Lazy),
    ),
];

fn main() {
    println!("=== Single-precision blocked GEMM benchmark ===\n");

    let sizes = [256, 512, 1024];
    let iterations = 3;

    #[cfg(target_arch = "x86_64")]
    println!(
        "CPU features: AVX2={}, FMA={}\n",
        is_x86_feature_detected!("avx2"),
        is_x86_feature_detected!("fma")
    );

    for &n in &sizes {
        println!("Matrix: {}×{}", n, n);
        println!("{}", "-".repeat(60));

        let a: Vec<f32> = (0..n * n).map(|i| (i % 100) as f32).collect();
        let b: Vec<f32> = (0..n * n).map(|i| (i % 100) as f32).collect();

        let mut c_ref = vec![0.0f32; n * n];
        matmul_naive_ikj(&a, &b, &mut c_ref, n);

        let mut results: Vec<(String, (f64, f64))> = vec![
            (
                "Naive (i-j-k)".to_string(),
                bench_fn(&a, &b, n, 1, |a, b, c, n| matmul_naive_ijk(a, b, c, n)),
            ),
            (
                "Scalar (i-k-j)".to_string(),
                bench_fn(&a, &b, n, iterations, |a, b, c, n| {
                    matmul_naive_ikj(a, b, c, n)
                }),
            ),
        ];

        for (name, params) in STAGES {
            let mut c = vec![0.0f32; n * n];
            multiply(&a, &b, &mut c, n, params);
            let err = max_diff(&c, &c_ref);
            assert!(err < 1e-3, "{} error {} exceeds tolerance", name, err);

            results.push((
                name.to_string(),
                bench_fn(&a, &b, n, iterations, |a, b, c, n| {
                    multiply(a, b, c, n, params)
                }),
            ));
        }

        let baseline_time = results[0].1.0;
        for (i, (name, (time_ms, gflops))) in results.iter().enumerate() {
            println!(
                "{}. {:24} {:8.2} ms  {:6.2} GFLOPS  ({:.1}×)",
                i + 1,
                name,
                time_ms,
                gflops,
                baseline_time / time_ms
            );
        }
        println!();
    }
}

fn max_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

/// Benchmark one GEMM stage: warmup run, then `iterations` timed runs.
fn bench_fn<F>(a: &[f32], b: &[f32], n: usize, iterations: usize, f: F) -> (f64, f64)
where
    F: Fn(&[f32], &[f32], &mut [f32], usize),
{
    let mut c = vec![0.0f32; n * n];
    f(a, b, &mut c, n);

    let mut total = 0.0;
    for _ in 0..iterations {
        let mut c = vec![0.0f32; n * n];
        let start = Instant::now();
        f(a, b, &mut c, n);
        total += start.elapsed().as_secs_f64();
    }

    let avg = total / iterations as f64;
    let gflops = 2.0 * (n * n * n) as f64 / avg / 1e9;
    (avg * 1000.0, gflops)
}
