//! Benchmarks for the least-squares top-N refinement, which dominates the
//! cost of `most_common` on a `least_squares_top_n` sketch relative to the
//! raw tracked-heap read a standard sketch does.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use minsketch::Sketch;

fn populate(sketch: &mut Sketch<u64>, n: usize) {
    for rank in 1..=(n as u64) {
        let freq = 2000 / rank;
        for _ in 0..freq {
            sketch.insert(rank, 1);
        }
    }
    for filler in (n as u64)..((n as u64) * 20) {
        sketch.insert(filler, 1);
    }
}

fn bench_most_common(c: &mut Criterion) {
    let mut group = c.benchmark_group("least_squares_most_common");

    for &n in &[5usize, 20, 50] {
        let mut standard = Sketch::<u64>::top_n_count_min(0.01, 0.01, n, false).unwrap();
        populate(&mut standard, n);

        let mut least_squares = Sketch::<u64>::least_squares_top_n(0.01, 0.01, n).unwrap();
        populate(&mut least_squares, n);

        group.bench_with_input(BenchmarkId::new("standard", n), &standard, |b, sketch| {
            b.iter(|| black_box(sketch.most_common(None)));
        });

        group.bench_with_input(
            BenchmarkId::new("least_squares", n),
            &least_squares,
            |b, sketch| {
                b.iter(|| black_box(sketch.most_common(None)));
            },
        );
    }

    group.finish();
}

/// Accuracy: least-squares refinement should recover the heavy hitters'
/// ranking at least as well as the unrefined top-N estimate under noise.
fn bench_accuracy(c: &mut Criterion) {
    let mut group = c.benchmark_group("least_squares_accuracy");

    group.bench_function("least_squares_top_20", |b| {
        b.iter(|| {
            let mut sketch = Sketch::<u64>::least_squares_top_n(0.02, 0.02, 20).unwrap();
            populate(&mut sketch, 20);
            black_box(sketch.most_common(None))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_most_common, bench_accuracy);
criterion_main!(benches);
