// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use paint_order::{BoundBox, Frame, Rotation, verify};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// A scene of `count` boxes spread over `quadrants` buckets, with neighbours overlapping.
fn gen_scene(seed: u64, rotation: Rotation, count: usize, quadrants: u16) -> Frame<u32> {
    let mut rng = Rng::new(seed);
    let mut frame = Frame::new(rotation);
    for i in 0..count {
        let q = rng.below(u64::from(quadrants)) as u16;
        let x = i32::from(q) * 32 + rng.below(48) as i32;
        let y = rng.below(512) as i32;
        let z = rng.below(64) as i32;
        let bounds = BoundBox::from_origin_size(
            x,
            y,
            z,
            8 + rng.below(40) as i32,
            8 + rng.below(40) as i32,
            4 + rng.below(24) as i32,
        );
        frame.submit(bounds, q, i as u32).unwrap();
    }
    frame
}

fn bench_arrange(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrange");
    for &count in &[100_usize, 1_000, 4_000] {
        group.throughput(Throughput::Elements(count as u64));
        for rotation in Rotation::ALL {
            let frame = gen_scene(0x9e37_79b9, rotation, count, 64);
            group.bench_function(format!("cached_n{}_r{}", count, rotation.value()), |b| {
                b.iter_batched(
                    || frame.clone(),
                    |mut f| {
                        black_box(f.arrange().unwrap());
                        f
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_resolvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolvers");
    for &count in &[1_000_usize, 4_000] {
        group.throughput(Throughput::Elements(count as u64));
        let frame = gen_scene(0x5eed, Rotation::R0, count, 128);
        group.bench_function(format!("cached_n{}", count), |b| {
            b.iter_batched(
                || frame.clone(),
                |mut f| {
                    black_box(f.arrange().unwrap());
                    f
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("uncached_n{}", count), |b| {
            b.iter_batched(
                || frame.clone(),
                |mut f| {
                    black_box(verify::arrange_uncached(&mut f).unwrap());
                    f
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");
    group.throughput(Throughput::Elements(4_000));
    group.bench_function("submit_clear_n4000", |b| {
        let mut frame = Frame::new(Rotation::R0);
        b.iter(|| {
            frame.clear();
            for i in 0..4_000_u32 {
                let q = (i % 256) as u16;
                let x = i32::from(q) * 16;
                frame
                    .submit(BoundBox::from_origin_size(x, 0, 0, 24, 24, 8), q, i)
                    .unwrap();
            }
            black_box(frame.len());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_arrange, bench_resolvers, bench_submit);
criterion_main!(benches);
