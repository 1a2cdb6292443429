//! Hot-path benchmarks: handle packing, slot churn, sequence allocation and
//! the upgrade of a resource back-reference.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tessera::prelude::*;
use tessera::{SlotTable, pack, unpack};

fn bench_handles(c: &mut Criterion) {
    c.bench_function("pack_unpack", |b| {
        b.iter(|| unpack(pack(black_box(1234), black_box(-7))));
    });

    let table = SlotTable::<u64>::with_capacity(1024);
    let handles: Vec<Handle> = (0..1024_u64).map(|i| table.allocate(i)).collect();

    c.bench_function("slot_resolve", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % handles.len();
            black_box(table.resolve(handles[i]).is_ok())
        });
    });

    c.bench_function("slot_allocate_free", |b| {
        b.iter(|| {
            let handle = table.allocate(black_box(42_u64));
            table.free(handle).is_ok()
        });
    });
}

fn bench_device(c: &mut Criterion) {
    let device = DeviceHandle::new();

    c.bench_function("allocate_sequence", |b| {
        b.iter(|| black_box(device.allocate_sequence()));
    });

    let base = ResourceBase::attached(&device);
    c.bench_function("resource_upgrade", |b| {
        b.iter(|| black_box(base.device().is_ok()));
    });
}

criterion_group!(benches, bench_handles, bench_device);
criterion_main!(benches);
