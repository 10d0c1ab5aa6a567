// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replays recorded paint sessions.
//!
//! Set `PAINT_ORDER_CAPTURES` to a list of compressed capture files separated by the platform
//! path separator. An empty "baseline" session always runs so the group is never empty.

use std::env;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use paint_order::{Frame, Rotation};
use paint_order_capture::{CapturedSession, SpriteRef};

fn load_sessions() -> Vec<(String, Frame<SpriteRef>)> {
    let baseline = CapturedSession::from_frame(&Frame::new(Rotation::R0))
        .and_then(|s| s.to_frame(Rotation::R0))
        .unwrap();
    let mut out = vec![("baseline".to_owned(), baseline)];

    let Some(paths) = env::var_os("PAINT_ORDER_CAPTURES") else {
        return out;
    };
    for path in env::split_paths(&paths) {
        let capture = match paint_order_capture::load(&path) {
            Ok(capture) => capture,
            Err(err) => {
                eprintln!("skipping {}: {err}", path.display());
                continue;
            }
        };
        for (i, frame) in capture.frames(Rotation::R0).enumerate() {
            match frame {
                Ok(frame) => out.push((format!("{}_{}", capture.park, i), frame)),
                Err(err) => eprintln!("skipping {} session {i}: {err}", capture.park),
            }
        }
    }
    out
}

fn bench_captures(c: &mut Criterion) {
    let sessions = load_sessions();
    let mut group = c.benchmark_group("captures");
    for (name, frame) in &sessions {
        group.throughput(Throughput::Elements(frame.len() as u64));
        group.bench_function(name.as_str(), |b| {
            b.iter_batched(
                || frame.clone(),
                |mut f| {
                    black_box(f.arrange().unwrap());
                    f
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_captures);
criterion_main!(benches);
