use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use drift_chunk::{split_slice, FixedChunker, GearChunker};

fn synthetic(len: usize) -> Vec<u8> {
    (0..len as u32)
        .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
        .collect()
}

fn bench_chunkers(c: &mut Criterion) {
    let data = synthetic(8 * 1024 * 1024);

    let mut group = c.benchmark_group("chunking");
    group.throughput(Throughput::Bytes(data.len() as u64));

    let fixed = FixedChunker::new(256 * 1024).unwrap();
    group.bench_function("fixed_256k", |b| {
        b.iter(|| split_slice(&fixed, std::hint::black_box(&data)))
    });

    let gear = GearChunker::new(64 * 1024, 256 * 1024, 1024 * 1024).unwrap();
    group.bench_function("gear_256k_avg", |b| {
        b.iter(|| split_slice(&gear, std::hint::black_box(&data)))
    });

    group.finish();
}

criterion_group!(benches, bench_chunkers);
criterion_main!(benches);
