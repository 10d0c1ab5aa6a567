// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic frame generators for tests.

use crate::frame::Frame;
use crate::types::{BoundBox, Rotation};

#[derive(Clone, Debug)]
pub(crate) struct Rng(u64);

impl Rng {
    pub(crate) fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Values are reduced below `bound` first."
    )]
    pub(crate) fn below(&mut self, bound: u32) -> u32 {
        (self.next_u64() % u64::from(bound)) as u32
    }
}

/// `count` small boxes scattered over a tile strip, bucketed by their x/y sweep position
/// into `quadrants` quadrants, so neighbouring quadrants overlap often.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    reason = "Test coordinates stay far below the integer limits."
)]
pub(crate) fn random_frame(seed: u64, rotation: Rotation, count: usize, quadrants: u16) -> Frame<u32> {
    let mut rng = Rng::new(seed);
    let mut frame = Frame::new(rotation);
    let span = u32::from(quadrants) * 16;
    for i in 0..count {
        let x = rng.below(span) as i32;
        let y = rng.below(32) as i32;
        let z = rng.below(48) as i32;
        let bounds = BoundBox::from_origin_size(
            x,
            y,
            z,
            1 + rng.below(24) as i32,
            1 + rng.below(24) as i32,
            1 + rng.below(16) as i32,
        );
        let quadrant = ((x + y / 2) as u32 / 16).min(u32::from(quadrants) - 1) as u16;
        frame
            .submit(bounds, quadrant, i as u32)
            .expect("generated quadrant fits the frame");
    }
    frame
}
