use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fd_math::TridiagonalOperator;

/// Diagonally dominant operator shaped like an implicit Black-Scholes step.
fn operator(n: usize) -> TridiagonalOperator {
    let lower = (0..n).map(|i| -0.4 * (i as f64 + 1.0)).collect();
    let diag = (0..n).map(|i| 1.0 + 0.9 * (i as f64 + 1.0)).collect();
    let upper = (0..n).map(|i| -0.45 * (i as f64 + 1.0)).collect();
    TridiagonalOperator::from_bands(lower, diag, upper).unwrap()
}

fn bench_factorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tridiagonal_factorize");
    for n in [100usize, 1_000, 10_000] {
        let op = operator(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &op, |b, op| {
            b.iter(|| black_box(op.factorize().unwrap()))
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("tridiagonal_solve");
    for n in [100usize, 1_000, 10_000] {
        let lu = operator(n).factorize().unwrap();
        let rhs = vec![1.0; n];
        let mut x = vec![0.0; n];
        group.bench_with_input(BenchmarkId::from_parameter(n), &rhs, |b, rhs| {
            b.iter(|| {
                lu.solve_into(black_box(rhs), &mut x);
                black_box(x[n / 2])
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_factorize, bench_solve);
criterion_main!(benches);
