use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pill_identifier_engine::{store::PillStore, PillRecord, SqlitePillStore};

fn test_pill(i: usize) -> PillRecord {
    PillRecord::new(format!("TP {}", i), format!("Test Drug {}", i % 20))
        .with_appearance("White", "Round")
        .with_strength(format!("{} mg", 10 * (i % 7 + 1)))
}

async fn setup_store() -> SqlitePillStore {
    let store = SqlitePillStore::new(":memory:").await.unwrap().without_seed();
    store
        .insert_many((0..500).map(test_pill).collect())
        .await
        .unwrap();
    store
}

fn bench_store_snapshot(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = runtime.block_on(setup_store());

    c.bench_function("store_all_snapshot", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(store.all().await.unwrap().len())
        });
    });
}

fn bench_store_insert(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("store_insert_republish", |b| {
        b.to_async(&runtime).iter(|| async {
            let store = SqlitePillStore::new(":memory:").await.unwrap().without_seed();
            black_box(store.insert(test_pill(1)).await.unwrap())
        });
    });
}

fn bench_pill_serialization(c: &mut Criterion) {
    let pill = test_pill(42).with_class("Miscellaneous analgesics", "Pain, Fever");

    c.bench_function("pill_record_to_json", |b| {
        b.iter(|| black_box(pill.to_json().unwrap()));
    });

    let json = pill.to_json().unwrap();
    c.bench_function("pill_record_from_json", |b| {
        b.iter(|| black_box(PillRecord::from_json(&json).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_store_snapshot,
    bench_store_insert,
    bench_pill_serialization
);
criterion_main!(benches);
