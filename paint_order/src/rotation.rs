// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotation comparator: decides whether one bounding box must be painted before another.
//!
//! The comparison packs six overlap tests into a mask and looks it up in a per-rotation table.
//! The tables were recovered from the original game engine and are kept literally; they are
//! not derived from geometry, so a changed entry shows up as visible occlusion errors.

use crate::types::{BoundBox, Rotation};

/// Occlusion tables, one per [`Rotation`], indexed by [`overlap_mask`].
///
/// A `1` means the "current" box must be drawn before the "initial" one.
#[rustfmt::skip]
pub const ROTATION_TABLES: [[u8; 64]; 4] = [
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 0,
    ],
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 1, 1, 1, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1,
        1, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
];

/// Pack the six overlap tests between `initial` and `current` into a 6-bit mask.
///
/// Bit 5 down to bit 0:
/// `initial.z_end >= current.z`, `initial.y_end >= current.y`, `initial.x_end >= current.x`,
/// `initial.z < current.z_end`, `initial.y < current.y_end`, `initial.x < current.x_end`.
#[inline]
pub fn overlap_mask(initial: &BoundBox, current: &BoundBox) -> u8 {
    (u8::from(initial.z_end >= current.z) << 5)
        | (u8::from(initial.y_end >= current.y) << 4)
        | (u8::from(initial.x_end >= current.x) << 3)
        | (u8::from(initial.z < current.z_end) << 2)
        | (u8::from(initial.y < current.y_end) << 1)
        | u8::from(initial.x < current.x_end)
}

impl Rotation {
    /// Table entry for a precomputed overlap mask. Only the low six bits are used.
    #[inline]
    pub fn draws_mask_before(self, mask: u8) -> bool {
        ROTATION_TABLES[self.idx()][usize::from(mask & 0x3f)] != 0
    }

    /// Whether `current` must be painted before `initial` under this rotation.
    #[inline]
    pub fn draws_before(self, initial: &BoundBox, current: &BoundBox) -> bool {
        self.draws_mask_before(overlap_mask(initial, current))
    }
}
