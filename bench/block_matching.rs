use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cv_block_disparity::prelude::*;

const WIDTH: usize = 320;
const HEIGHT: usize = 240;
const TRUE_DISPARITY: usize = 7;

/// Cheap deterministic texture so every patch is distinct.
fn texture(x: usize, y: usize) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x9E37_79B1) ^ (y as u32).wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    (h & 0xFF) as f32 / 255.0
}

fn block_matching_bench(c: &mut Criterion) {

    // Build frame
    let frame = StereoPair::new(
        GrayFloatImage::from_fn(WIDTH, HEIGHT, texture),
        GrayFloatImage::from_fn(WIDTH, HEIGHT, |x, y| texture(x + TRUE_DISPARITY, y))
    ).unwrap();

    let params = Params::new((0, 16), 5);
    let ssd = Ssd::new(params);
    let ncc = Ncc::new(params);

    // Benchmark compute functions
    c.bench_function("ssd 320x240 d0..=16 k5", |b| b.iter(|| ssd.compute(black_box(&frame))));
    c.bench_function("ncc 320x240 d0..=16 k5", |b| b.iter(|| ncc.compute(black_box(&frame))));
}

criterion_group!(benches, block_matching_bench);
criterion_main!(benches);
