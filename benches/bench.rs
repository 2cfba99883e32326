//! Criterion benchmarks for segcat.
//!
//! Covers the three hot paths of a catalog's life:
//! - full load of the published catalog
//! - the header-only version probe
//! - committing a new generation

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use segcat::catalog::{CatalogReader, CatalogWriter, SegmentCatalog, SegmentRecord};
use segcat::storage::{MemoryStorage, Storage};

/// Build a catalog listing `count` segments.
fn generate_catalog(count: usize) -> SegmentCatalog {
    let mut catalog = SegmentCatalog::new();
    for i in 0..count {
        let name = catalog.next_segment_name().unwrap();
        catalog.add(SegmentRecord::new(name, (i as i32 + 1) * 1000));
    }
    catalog
}

/// Storage holding one committed catalog of `count` segments.
fn committed_storage(count: usize) -> Arc<dyn Storage> {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
    let mut catalog = generate_catalog(count);
    CatalogWriter::new(storage.clone())
        .commit(&mut catalog)
        .unwrap();
    storage
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [10, 1_000, 10_000].iter() {
        let reader = CatalogReader::new(committed_storage(*size));
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("load_{size}_segments"), |b| {
            b.iter(|| black_box(reader.load().unwrap()))
        });
    }

    group.finish();
}

fn bench_peek_version(c: &mut Criterion) {
    let mut group = c.benchmark_group("peek_version");

    // The probe cost should not depend on the number of segments.
    for size in [10, 10_000].iter() {
        let reader = CatalogReader::new(committed_storage(*size));
        group.bench_function(format!("peek_{size}_segments"), |b| {
            b.iter(|| black_box(reader.peek_version().unwrap()))
        });
    }

    group.finish();
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit");
    group.sample_size(20);

    for size in [10, 1_000].iter() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        let writer = CatalogWriter::new(storage);
        let mut catalog = generate_catalog(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("commit_{size}_segments"), |b| {
            b.iter(|| writer.commit(black_box(&mut catalog)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_peek_version, bench_commit);
criterion_main!(benches);
