use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use minsketch::common::hash::item_to_u64;
use minsketch::frequency::universal_hash::ARBITRARY_LARGE_PRIME;
use minsketch::UniversalHashFunctionGenerator;

fn bench_item_to_u64(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_to_u64");

    group.bench_function("u64", |b| {
        let mut counter = 0u64;
        b.iter(|| {
            black_box(item_to_u64(&counter));
            counter = counter.wrapping_add(1);
        });
    });

    group.bench_function("string", |b| {
        let strings: Vec<String> = (0..1000).map(|i| format!("item_{i}")).collect();
        let mut idx = 0usize;
        b.iter(|| {
            black_box(item_to_u64(&strings[idx % strings.len()]));
            idx = idx.wrapping_add(1);
        });
    });

    group.bench_function("str_ref", |b| {
        b.iter(|| black_box(item_to_u64(&"static_string")));
    });

    group.finish();
}

fn bench_universal_hash_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("universal_hash_next_function");

    group.bench_function("next_function", |b| {
        let mut gen = UniversalHashFunctionGenerator::with_seed(ARBITRARY_LARGE_PRIME, 7);
        b.iter(|| black_box(gen.next_function()));
    });

    group.finish();
}

fn bench_universal_hash_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("universal_hash_apply");

    for &m in &[1_000u64, 100_000, 10_000_000] {
        let mut gen = UniversalHashFunctionGenerator::with_seed(ARBITRARY_LARGE_PRIME, 11);
        let f = gen.next_function();
        group.bench_with_input(BenchmarkId::from_parameter(m), &m, |b, _| {
            let mut x = 0u64;
            b.iter(|| {
                black_box(f.apply(black_box(x)));
                x = x.wrapping_add(1);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_item_to_u64,
    bench_universal_hash_generation,
    bench_universal_hash_apply,
);
criterion_main!(benches);
