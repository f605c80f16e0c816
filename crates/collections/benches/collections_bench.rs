//! Benchmarks for kelp-collections.
//!
//! Focus: cost of a single mutation while derived collections are attached,
//! since every mutation pays for its whole downstream operator chain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kelp_collections::{CollectionExt, ListColl};
use kelp_core::Collection;

fn bench_backend_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("backend");

    group.bench_function("list_add_1000", |b| {
        b.iter(|| {
            let list = ListColl::new();
            for i in 0..1000 {
                list.add(black_box(i));
            }
            list.length()
        })
    });

    group.bench_function("list_contains_hit", |b| {
        let list = ListColl::from_vec((0..1000).collect());
        b.iter(|| list.contains(black_box(&999)))
    });

    group.finish();
}

fn bench_merge_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("add_one_source_item", size), &size, |b, &size| {
            let a = ListColl::from_vec((0..size).collect());
            let other = ListColl::from_vec((size..size * 2).collect());
            let merged = a.merge(&other);
            let mut next = size * 2;
            b.iter(|| {
                a.add(black_box(next));
                next += 1;
                merged.length()
            })
        });
    }

    group.finish();
}

fn bench_sorted_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted");

    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("insert_mid", size), &size, |b, &size| {
            let source = ListColl::from_vec((0..size).map(|i| i * 2).collect());
            let sorted = source.sorted_by(|a: &i32, b: &i32| a.cmp(b));
            b.iter(|| {
                source.add(black_box(size));
                source.remove(&size);
                sorted.length()
            })
        });
    }

    group.finish();
}

fn bench_operator_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    group.bench_function("filter_sort_propagation", |b| {
        let source = ListColl::from_vec((0..500).collect());
        let evens = source.filter(|n: &i32| n % 2 == 0);
        let sorted = evens.sorted_by(|a: &i32, b: &i32| b.cmp(a));
        let mut next = 500;
        b.iter(|| {
            source.add(black_box(next));
            next += 1;
            sorted.length()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_backend_mutations,
    bench_merge_update,
    bench_sorted_insert,
    bench_operator_chain
);
criterion_main!(benches);
