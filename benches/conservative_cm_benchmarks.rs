//! Compares `ConservativeUpdateStrategy` against naive update, both through
//! the public [`Sketch`] constructors.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use minsketch::Sketch;

fn generate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key_{i}")).collect()
}

fn bench_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("conservative_vs_naive_insert");
    let keys = generate_keys(10_000);
    group.throughput(Throughput::Elements(10_000));

    group.bench_function("naive", |b| {
        b.iter(|| {
            let mut sketch = Sketch::<String>::count_min(0.01, 0.01).unwrap();
            for key in &keys {
                sketch.insert(black_box(key.clone()), 1);
            }
            sketch
        })
    });

    group.bench_function("conservative", |b| {
        b.iter(|| {
            let mut sketch = Sketch::<String>::conservative_count_min(0.01, 0.01).unwrap();
            for key in &keys {
                sketch.insert(black_box(key.clone()), 1);
            }
            sketch
        })
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("conservative_vs_naive_query");
    let keys = generate_keys(10_000);
    let query_keys = generate_keys(1_000);

    let mut naive = Sketch::<String>::count_min(0.01, 0.01).unwrap();
    let mut cons = Sketch::<String>::conservative_count_min(0.01, 0.01).unwrap();
    for key in &keys {
        naive.insert(key.clone(), 1);
        cons.insert(key.clone(), 1);
    }

    group.throughput(Throughput::Elements(1000));

    group.bench_function("naive", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for key in &query_keys {
                total += naive.get(black_box(key));
            }
            total
        })
    });

    group.bench_function("conservative", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for key in &query_keys {
                total += cons.get(black_box(key));
            }
            total
        })
    });

    group.finish();
}

/// Estimate accuracy under a collision-heavy workload: a frequent item
/// accompanied by a large number of distinct distractors at a tight epsilon.
fn bench_accuracy(c: &mut Criterion) {
    let mut group = c.benchmark_group("conservative_vs_naive_accuracy");

    for &epsilon in &[0.01, 0.05, 0.1] {
        group.bench_with_input(
            BenchmarkId::new("naive", format!("eps={epsilon}")),
            &epsilon,
            |b, &eps| {
                b.iter(|| {
                    let mut sketch = Sketch::<String>::count_min(eps, 0.01).unwrap();
                    for _ in 0..100 {
                        sketch.insert("frequent".to_string(), 1);
                    }
                    for i in 0..1000 {
                        sketch.insert(format!("item_{i}"), 1);
                    }
                    black_box(sketch.get(&"frequent".to_string()))
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("conservative", format!("eps={epsilon}")),
            &epsilon,
            |b, &eps| {
                b.iter(|| {
                    let mut sketch = Sketch::<String>::conservative_count_min(eps, 0.01).unwrap();
                    for _ in 0..100 {
                        sketch.insert("frequent".to_string(), 1);
                    }
                    for i in 0..1000 {
                        sketch.insert(format!("item_{i}"), 1);
                    }
                    black_box(sketch.get(&"frequent".to_string()))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_inserts, bench_queries, bench_accuracy);
criterion_main!(benches);
