use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tempfile::TempDir;
use tokio::runtime::Runtime;

use finquest_kv::{MemoryStorage, NamespacedStore, RedbStorage};

fn bench_key_with_prefix(c: &mut Criterion) {
    let store = NamespacedStore::new(Arc::new(MemoryStorage::new()));

    c.bench_function("get_key_with_prefix", |b| {
        b.iter(|| store.get_key_with_prefix(black_box("lesson.progress/budgeting-101")));
    });
}

fn bench_memory_set_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = NamespacedStore::new(Arc::new(MemoryStorage::new()));

    c.bench_function("memory_set_get", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("bench.key.{}", i % 1000);
            rt.block_on(async {
                store.set_item(black_box(&key), "hello world").await;
                let _ = store.get_item(black_box(&key)).await;
            });
            i += 1;
        });
    });
}

fn bench_redb_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let backend = RedbStorage::open(&tmp.path().join("bench.redb")).unwrap();
    let store = NamespacedStore::new(Arc::new(backend));

    // Pre-populate.
    rt.block_on(async {
        for i in 0..1000 {
            store.set_item(&format!("bench.key.{:04}", i), "hello world").await;
        }
    });

    c.bench_function("redb_get", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("bench.key.{:04}", i % 1000);
            let _ = rt.block_on(store.get_item(black_box(&key)));
            i += 1;
        });
    });
}

fn bench_redb_clear(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let tmp = TempDir::new().unwrap();
    let backend = RedbStorage::open(&tmp.path().join("bench.redb")).unwrap();
    let store = NamespacedStore::new(Arc::new(backend));

    c.bench_function("redb_clear_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                for i in 0..100 {
                    store.set_item(&format!("bench.key.{}", i), "v").await;
                }
                store.clear().await;
            });
        });
    });
}

criterion_group!(
    benches,
    bench_key_with_prefix,
    bench_memory_set_get,
    bench_redb_get,
    bench_redb_clear,
);
criterion_main!(benches);
