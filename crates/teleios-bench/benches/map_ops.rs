//! Criterion micro-benchmarks for `teleios_containers::Map` put/get.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use teleios_containers::Map;

fn bench_map_put_1000(c: &mut Criterion) {
    c.bench_function("map_put_1000_keys", |b| {
        b.iter(|| {
            let mut map: Map<u32> = Map::create(1024);
            for i in 0..1000u32 {
                map.put(&format!("key.{i}"), i);
            }
            black_box(map.size());
        });
    });
}

fn bench_map_get_hit(c: &mut Criterion) {
    let mut map: Map<u32> = Map::create(1024);
    for i in 0..1000u32 {
        map.put(&format!("key.{i}"), i);
    }
    c.bench_function("map_get_1000_hits", |b| {
        b.iter(|| {
            for i in 0..1000u32 {
                black_box(map.get(&format!("key.{i}")));
            }
        });
    });
}

criterion_group!(benches, bench_map_put_1000, bench_map_get_hit);
criterion_main!(benches);
