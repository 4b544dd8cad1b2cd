use std::io::{self, Read};

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use futures_util::stream;
use httpexpect_body::{BodyWrapper, ByteStream};

fn source(chunk_size: usize, num_chunks: usize) -> ByteStream {
    let chunk = Bytes::from(vec![0u8; chunk_size]);
    let chunks: Vec<io::Result<Bytes>> = (0..num_chunks).map(|_| Ok(chunk.clone())).collect();
    Box::pin(stream::iter(chunks))
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("body_drain");
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

    for total in [64 * 1024, 1024 * 1024, 8 * 1024 * 1024] {
        group.throughput(Throughput::Bytes(total as u64));
        group.bench_with_input(BenchmarkId::new("materialize", total), &total, |b, &total| {
            b.iter(|| {
                rt.block_on(async {
                    let body = BodyWrapper::new(source(16 * 1024, total / (16 * 1024)));
                    black_box(body.materialize().await.unwrap().len())
                })
            });
        });
    }
    group.finish();
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("body_replay");
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

    // Retries and redirect hops each take a fresh reader over the same buffer.
    for replays in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::new("readers", replays), &replays, |b, &replays| {
            let body = BodyWrapper::new(source(16 * 1024, 64));
            rt.block_on(body.close()).unwrap();
            let mut sink = vec![0u8; 64 * 1024];

            b.iter(|| {
                rt.block_on(async {
                    for _ in 0..replays {
                        let mut reader = body.materialize().await.unwrap();
                        while reader.read(&mut sink).unwrap() > 0 {}
                    }
                })
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_drain, bench_replay);
criterion_main!(benches);
