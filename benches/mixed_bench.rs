use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use mixed_index::{MixedIndex, RecordId};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

const RECORDS: u32 = 10_000;

/// 16-byte record: u32 at 0 (spread over 256 values), u16 at 4, u64 at 8.
fn make_record(i: u32) -> Vec<u8> {
    let mut buf = vec![0u8; 16];
    buf[0..4].copy_from_slice(&(i % 256).to_le_bytes());
    buf[4..6].copy_from_slice(&((i % 7) as u16).to_le_bytes());
    buf[8..16].copy_from_slice(&(i as u64 * 0x1_0000_0001).to_le_bytes());
    buf
}

fn make_index() -> (MixedIndex<Vec<u8>>, Vec<RecordId>) {
    let mut index = MixedIndex::new();
    index.configure(0, 4).unwrap();
    index.configure(4, 2).unwrap();
    index.configure(8, 8).unwrap();
    let ids = (0..RECORDS)
        .map(|i| index.add(make_record(i)).unwrap().id)
        .collect();
    (index, ids)
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Insertion
// ═══════════════════════════════════════════════════════════════════════════

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");

    group.bench_function("add 10k (3 keys)", |b| {
        b.iter_batched(
            || {
                let mut index: MixedIndex<Vec<u8>> = MixedIndex::new();
                index.configure(0, 4).unwrap();
                index.configure(4, 2).unwrap();
                index.configure(8, 8).unwrap();
                let records: Vec<_> = (0..RECORDS).map(make_record).collect();
                (index, records)
            },
            |(mut index, records)| {
                for r in records {
                    black_box(index.add(r).unwrap());
                }
                index
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("configure backfill 10k", |b| {
        b.iter_batched(
            || {
                let mut index: MixedIndex<Vec<u8>> = MixedIndex::new();
                for i in 0..RECORDS {
                    index.add(make_record(i)).unwrap();
                }
                index
            },
            |mut index| {
                index.configure(0, 4).unwrap();
                index
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Lookup
// ═══════════════════════════════════════════════════════════════════════════

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    let (index, _) = make_index();

    group.bench_function("get (u32 key)", |b| {
        b.iter(|| black_box(index.get(0, black_box(42))))
    });

    group.bench_function("get_first (u64 key)", |b| {
        b.iter(|| black_box(index.get_first(8, black_box(42 * 0x1_0000_0001))))
    });

    group.bench_function("get miss", |b| {
        b.iter(|| black_box(index.get(0, black_box(1_000_000))))
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Change protocol
// ═══════════════════════════════════════════════════════════════════════════

fn bench_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("change");
    let (mut index, ids) = make_index();
    let id = ids[ids.len() / 2];

    group.bench_function("begin/end unchanged", |b| {
        b.iter(|| {
            let change = index.begin_change(black_box(id)).unwrap();
            index.end_change(change).unwrap();
        })
    });

    let mut flip = 0u64;
    group.bench_function("set_value (moves bucket)", |b| {
        b.iter(|| {
            flip ^= 1;
            index.set_value(black_box(id), 0, 300 + flip).unwrap();
        })
    });

    group.finish();
}

// ─── Criterion Main ─────────────────────────────────────────────────────────

criterion_group!(benches, bench_add, bench_get, bench_change);
criterion_main!(benches);
