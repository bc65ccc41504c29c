//! Benchmarks for query cache hits, misses and key canonicalization

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use marquee::{CacheKey, CatalogKey, Language, QueryCache, QueryOptions, QueryOpts};
use std::hint::black_box;
use tokio::runtime::Runtime;

fn bench_fetch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache: QueryCache<Vec<u32>> = QueryCache::new();
    let opts = QueryOpts::new().stale_mins(60).build();

    // Pre-populate
    rt.block_on(async {
        cache
            .fetch("key", || async { Ok((0..20).collect()) }, &opts)
            .await;
    });

    let mut group = c.benchmark_group("fetch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit", |b| {
        b.iter(|| {
            rt.block_on(async {
                let state = cache
                    .fetch(black_box("key"), || async { Ok(Vec::new()) }, &opts)
                    .await;
                black_box(state);
            });
        });
    });

    group.bench_function("miss_then_remove", |b| {
        b.iter(|| {
            rt.block_on(async {
                let state = cache
                    .fetch(black_box("fresh"), || async { Ok(vec![1]) }, &opts)
                    .await;
                cache.remove("fresh");
                black_box(state);
            });
        });
    });

    group.bench_function("snapshot", |b| {
        b.iter(|| black_box(cache.snapshot(black_box("key"), &QueryOptions::default())));
    });

    group.finish();
}

fn bench_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("keys");

    group.bench_function("catalog_search", |b| {
        let key = CatalogKey::Search {
            query: "the lord of the rings".to_string(),
            page: 3,
            language: Language::Es,
        };
        b.iter(|| black_box(black_box(&key).cache_key()));
    });

    group.finish();
}

criterion_group!(benches, bench_fetch, bench_keys);
criterion_main!(benches);
