//! Throughput and compression-ratio benchmarks for the block codec.
//!
//! Exercises `compress`/scan across a few representative tick patterns:
//! a constant price stream (best case for XOR coding), a steady walk
//! (typical delta-of-delta case), and a volatile stream (near-worst case,
//! most ticks falling into the 64-bit XOR literal/delta bucket).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tachyon_codec::block::CompressedBlock;
use tachyon_codec::scanner::BlockScanner;
use tachyon_core::model::RawTick;

type PatternGenerator = fn(usize) -> Vec<RawTick>;

mod test_data {
    use tachyon_core::model::RawTick;

    /// Constant bid/ask, fixed 60-unit gap: every field hits the cheapest
    /// code path.
    pub fn constant(n: usize) -> Vec<RawTick> {
        (0..n as u64)
            .map(|i| RawTick::new(i * 60, 1, 100.0, 100.02, 10, 12))
            .collect()
    }

    /// A slow, steady price walk with a fixed inter-tick gap.
    pub fn steady_walk(n: usize) -> Vec<RawTick> {
        let mut bid = 100.0f64;
        (0..n as u64)
            .map(|i| {
                bid += 0.01 * ((i % 7) as f64 - 3.0);
                RawTick::new(i * 73, 2, bid, bid + 0.02, 10 + (i % 5) as u32, 8)
            })
            .collect()
    }

    /// A volatile stream: irregular gaps and large price jumps, forcing
    /// the codec into its most expensive prefix buckets.
    pub fn volatile(n: usize) -> Vec<RawTick> {
        let mut seed: u64 = 0x9E3779B97F4A7C15;
        let mut ts = 0u64;
        (0..n)
            .map(|i| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                ts += 1 + (seed >> 50);
                let bid = 50.0 + ((seed >> 16) % 10_000) as f64 / 37.0;
                RawTick::new(ts, 3, bid, bid + 0.05, (i % 5000) as u32, (i % 3000) as u32)
            })
            .collect()
    }
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    let sizes = [1_000usize, 10_000];
    let patterns: [(&str, PatternGenerator); 3] = [
        ("constant", test_data::constant as PatternGenerator),
        ("steady_walk", test_data::steady_walk as PatternGenerator),
        ("volatile", test_data::volatile as PatternGenerator),
    ];

    for size in sizes {
        for (name, gen) in patterns {
            let batch = gen(size);
            let id = format!("{name}/{size}");
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(&id), &batch, |b, batch| {
                b.iter(|| {
                    let block = CompressedBlock::compress(black_box(batch));
                    black_box(block);
                });
            });
        }
    }
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let sizes = [1_000usize, 10_000];
    let patterns: [(&str, PatternGenerator); 3] = [
        ("constant", test_data::constant as PatternGenerator),
        ("steady_walk", test_data::steady_walk as PatternGenerator),
        ("volatile", test_data::volatile as PatternGenerator),
    ];

    for size in sizes {
        for (name, gen) in patterns {
            let batch = gen(size);
            let block = CompressedBlock::compress(&batch).unwrap();
            let id = format!("{name}/{size}");
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(&id), &block, |b, block| {
                b.iter(|| {
                    let scanner = BlockScanner::new(black_box(block));
                    let count = scanner.filter(|r| r.is_ok()).count();
                    black_box(count);
                });
            });
        }
    }
    group.finish();
}

fn bench_compression_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_ratio");
    group.sample_size(10);
    let size = 10_000usize;
    let patterns: [(&str, PatternGenerator); 3] = [
        ("constant", test_data::constant as PatternGenerator),
        ("steady_walk", test_data::steady_walk as PatternGenerator),
        ("volatile", test_data::volatile as PatternGenerator),
    ];

    for (name, gen) in patterns {
        let batch = gen(size);
        let raw_bytes = size * std::mem::size_of::<RawTick>();
        group.bench_with_input(BenchmarkId::from_parameter(name), &batch, |b, batch| {
            b.iter(|| {
                let block = CompressedBlock::compress(black_box(batch)).unwrap();
                let ratio = raw_bytes as f64 / block.payload().len().max(1) as f64;
                black_box(ratio);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_scan, bench_compression_ratio);
criterion_main!(benches);
