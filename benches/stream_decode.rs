//! Benchmarks for record stream decoding
//!
//! Measures throughput for:
//! - Slice iteration with `RecordStream` over a mixed metadata and flow stream
//! - Typed decode of single records
//! - Folding a decoded stream into an `ExporterTable`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use flowmeta::test_utils::{mixed_records, mixed_stream, sample_identity};
use flowmeta::{ByteOrder, CodecConfig, ExporterIdentity, ExporterTable, MetadataRecord, RecordStream};
use std::hint::black_box;

fn bench_stream_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_stream");

    for order in [ByteOrder::Little, ByteOrder::Big] {
        let config = CodecConfig::new(order);
        let bytes = mixed_stream(config, 64, 32).expect("Failed to build stream");
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("iterate", format!("{order:?}")), &bytes, |b, bytes| {
            b.iter(|| {
                let mut count = 0usize;
                for record in RecordStream::new(black_box(bytes), config) {
                    black_box(record.expect("Decode failed"));
                    count += 1;
                }
                count
            })
        });
    }

    group.finish();
}

fn bench_identity_decode(c: &mut Criterion) {
    let config = CodecConfig::default();
    let v4 = sample_identity(2).encode(&config).expect("Encode failed");
    let v6 = sample_identity(3).encode(&config).expect("Encode failed");

    let mut group = c.benchmark_group("exporter_identity");
    group.bench_function("decode_v4", |b| b.iter(|| ExporterIdentity::decode(black_box(&v4), &config)));
    group.bench_function("decode_v6", |b| b.iter(|| ExporterIdentity::decode(black_box(&v6), &config)));
    group.finish();
}

fn bench_table_fold(c: &mut Criterion) {
    let records = mixed_records(256, 4).expect("Failed to build records");

    c.bench_function("exporter_table_fold", |b| {
        b.iter(|| {
            let mut table = ExporterTable::new();
            black_box(table.apply_all(black_box(&records)));
            table
        })
    });
}

criterion_group!(benches, bench_stream_iteration, bench_identity_decode, bench_table_fold);
criterion_main!(benches);
