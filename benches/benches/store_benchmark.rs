//! Content storage and typed row decoding.
//!
//! Run with: `cargo bench --package tsdlink-bench --bench store_benchmark`

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tokio::runtime::Runtime;
use tsdlink_bench::{csv_content, schema_document};
use tsdlink_lib::{
    ContentStream, MemoryStore, StatementContext, StoreStrategy, TsdError, build_metadata_list,
};

const COLUMNS: usize = 8;
const ROW_COUNTS: [usize; 3] = [100, 1_000, 10_000];

fn content_stream(content: &Bytes) -> ContentStream {
    // 16 KiB chunks, roughly what the transport hands over
    let chunks: Vec<Result<Bytes, TsdError>> = (0..content.len())
        .step_by(16 * 1024)
        .map(|start| Ok(content.slice(start..content.len().min(start + 16 * 1024))))
        .collect();
    Box::pin(futures::stream::iter(chunks))
}

fn store_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let columns = build_metadata_list(&schema_document(COLUMNS)).unwrap();
    let mut group = c.benchmark_group("memory_store");

    for rows in ROW_COUNTS {
        let content = Bytes::from(csv_content(COLUMNS, rows));
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &content, |b, content| {
            b.to_async(&runtime).iter(|| async {
                let mut store = MemoryStore::new(&StatementContext::default());
                store.store(content_stream(content)).await.unwrap();
                let set = store.rows().await.unwrap();
                black_box(set.typed(&columns).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, store_benchmark);
criterion_main!(benches);
