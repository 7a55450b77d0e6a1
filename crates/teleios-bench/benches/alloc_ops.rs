//! Criterion micro-benchmarks for the bump and tracked-heap allocators.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use teleios_alloc::{AllocatorKind, Strategy, Tag};

fn bench_linear_bump_alloc(c: &mut Criterion) {
    c.bench_function("linear_bump_alloc_64b_x1000", |b| {
        b.iter(|| {
            let mut arena = AllocatorKind::create(Strategy::Linear, 64 * 1024);
            for _ in 0..1000 {
                black_box(arena.alloc(Tag::ContainerArray, 64));
            }
        });
    });
}

fn bench_linear_reset(c: &mut Criterion) {
    let mut arena = AllocatorKind::create(Strategy::Linear, 64 * 1024);
    for _ in 0..1000 {
        arena.alloc(Tag::ContainerArray, 64);
    }
    c.bench_function("linear_reset_after_1000_allocs", |b| {
        b.iter(|| {
            arena.reset();
            for _ in 0..1000 {
                arena.alloc(Tag::ContainerArray, 64);
            }
        });
    });
}

fn bench_tracked_heap_alloc_free(c: &mut Criterion) {
    c.bench_function("tracked_heap_alloc_free_x1000", |b| {
        b.iter(|| {
            let mut heap = AllocatorKind::create(Strategy::Heap, 0);
            let handles: Vec<_> = (0..1000).map(|_| heap.alloc(Tag::String, 32)).collect();
            for handle in handles {
                heap.free(handle);
            }
        });
    });
}

criterion_group!(benches, bench_linear_bump_alloc, bench_linear_reset, bench_tracked_heap_alloc_free);
criterion_main!(benches);
