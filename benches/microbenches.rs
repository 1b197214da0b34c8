//! Criterion microbenches for the maskcoco core pipeline.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - RLE encoding and decoding of binary masks
//! - Contour tracing with and without simplification

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use maskcoco::geometry::trace_polygons;
use maskcoco::mask::BinaryMask;
use maskcoco::rle::{decode, encode};

/// A 256x256 mask with a few filled blobs, roughly what one decomposed
/// instance of a real photo mask looks like.
fn sample_mask() -> BinaryMask {
    BinaryMask::from_fn(256, 256, |x, y| {
        let disc = |cx: i64, cy: i64, r: i64| {
            let dx = x as i64 - cx;
            let dy = y as i64 - cy;
            dx * dx + dy * dy <= r * r
        };
        disc(64, 64, 40) || disc(180, 90, 25) || disc(120, 200, 50)
    })
}

fn bench_rle_encode(c: &mut Criterion) {
    let mask = sample_mask();
    let (w, h) = mask.dimensions();

    let mut group = c.benchmark_group("rle");
    group.throughput(Throughput::Elements((w as u64) * (h as u64)));

    group.bench_function("encode", |b| {
        b.iter(|| black_box(encode(black_box(&mask))))
    });

    group.finish();
}

fn bench_rle_decode(c: &mut Criterion) {
    let rle = encode(&sample_mask());

    let mut group = c.benchmark_group("rle");
    group.throughput(Throughput::Elements((rle.h as u64) * (rle.w as u64)));

    group.bench_function("decode", |b| {
        b.iter(|| black_box(decode(black_box(&rle))))
    });

    group.finish();
}

fn bench_trace(c: &mut Criterion) {
    let mask = sample_mask();

    let mut group = c.benchmark_group("trace");

    group.bench_function("raw", |b| {
        b.iter(|| black_box(trace_polygons(black_box(&mask), 0.0)))
    });
    group.bench_function("simplified", |b| {
        b.iter(|| black_box(trace_polygons(black_box(&mask), 2.0)))
    });

    group.finish();
}

criterion_group!(benches, bench_rle_encode, bench_rle_decode, bench_trace);
criterion_main!(benches);
