//! Schema header decoding and metadata building.
//!
//! Run with: `cargo bench --package tsdlink-bench --bench metadata_benchmark`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tsdlink_bench::schema_document;
use tsdlink_lib::{build_metadata_list, decode_scheme_header, encode_scheme_header};

const COLUMN_COUNTS: [usize; 3] = [8, 64, 512];

fn metadata_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_metadata_list");

    for columns in COLUMN_COUNTS {
        let document = schema_document(columns);
        group.throughput(Throughput::Elements(columns as u64));
        group.bench_with_input(BenchmarkId::from_parameter(columns), &document, |b, doc| {
            b.iter(|| build_metadata_list(black_box(doc)).unwrap());
        });
    }

    group.finish();
}

fn header_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_scheme_header");

    for columns in COLUMN_COUNTS {
        let header = encode_scheme_header(&schema_document(columns));
        group.throughput(Throughput::Bytes(header.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(columns), &header, |b, value| {
            b.iter(|| decode_scheme_header(black_box(value)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, metadata_benchmark, header_benchmark);
criterion_main!(benches);
