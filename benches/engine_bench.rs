//! Benchmarks for filekv engine operations

use criterion::{criterion_group, criterion_main, Criterion};
use filekv::{Config, Engine};
use serde_json::{json, Map};
use tempfile::TempDir;

fn engine_benchmarks(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let engine = Engine::new(Config::builder().data_dir(temp.path()).build());

    // Seed a store of 1000 records for the read benchmark
    let mut seed = Map::new();
    for i in 0..1000 {
        seed.insert(format!("key{i:04}"), json!({"field": "value", "n": i}));
    }
    engine.create(seed).unwrap();

    c.bench_function("read_single_key", |b| {
        b.iter(|| engine.read("key0500").unwrap())
    });

    // Create/delete pairs keep the store size stable across iterations
    c.bench_function("create_delete_single_record", |b| {
        b.iter(|| {
            let mut input = Map::new();
            input.insert("bench-key".to_string(), json!({"field": "value"}));
            engine.create(input).unwrap();
            engine.delete("bench-key").unwrap();
        })
    });

    c.bench_function("create_delete_batch_of_100", |b| {
        b.iter(|| {
            let mut input = Map::new();
            for i in 0..100 {
                input.insert(format!("batch-{i}"), json!({"n": i}));
            }
            engine.create(input).unwrap();
            for i in 0..100 {
                engine.delete(&format!("batch-{i}")).unwrap();
            }
        })
    });
}

criterion_group!(benches, engine_benchmarks);
criterion_main!(benches);
