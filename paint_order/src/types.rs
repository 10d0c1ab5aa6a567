// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: item handles, bounding boxes, rotations, and transient quadrant flags.

use crate::error::ArrangeError;

/// Default number of quadrant buckets in a frame.
pub const MAX_QUADRANTS: usize = 512;

/// Handle of an item inside a [`Frame`](crate::Frame) arena.
///
/// Handles are plain slot indices. They are only meaningful for the frame that issued them
/// and become stale when that frame is [cleared](crate::Frame::clear).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    /// Slot index of this item in its frame's arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Axis-aligned 3D bounding box of a draw item, in world units.
///
/// Extents are inclusive on the `*_end` side the way the comparator reads them; the box is
/// not required to be non-empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoundBox {
    /// Minimum x.
    pub x: i32,
    /// Minimum y.
    pub y: i32,
    /// Minimum z.
    pub z: i32,
    /// Maximum x.
    pub x_end: i32,
    /// Maximum y.
    pub y_end: i32,
    /// Maximum z.
    pub z_end: i32,
}

impl BoundBox {
    /// Create a box from its minimum and maximum corners.
    pub const fn new(x: i32, y: i32, z: i32, x_end: i32, y_end: i32, z_end: i32) -> Self {
        Self {
            x,
            y,
            z,
            x_end,
            y_end,
            z_end,
        }
    }

    /// Create a box from an origin and a size.
    ///
    /// Maximum corners saturate at the `i32` limits.
    pub const fn from_origin_size(x: i32, y: i32, z: i32, len_x: i32, len_y: i32, len_z: i32) -> Self {
        Self::new(
            x,
            y,
            z,
            x.saturating_add(len_x),
            y.saturating_add(len_y),
            z.saturating_add(len_z),
        )
    }
}

/// One of the four fixed camera orientations of the isometric view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Rotation 0 (the default view).
    #[default]
    R0 = 0,
    /// Rotation 1, a quarter turn from [`Rotation::R0`].
    R1 = 1,
    /// Rotation 2.
    R2 = 2,
    /// Rotation 3.
    R3 = 3,
}

impl Rotation {
    /// All rotations in ascending order.
    pub const ALL: [Self; 4] = [Self::R0, Self::R1, Self::R2, Self::R3];

    /// Numeric value of the rotation, `0..=3`.
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub(crate) const fn idx(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Rotation {
    type Error = ArrangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::R0),
            1 => Ok(Self::R1),
            2 => Ok(Self::R2),
            3 => Ok(Self::R3),
            other => Err(ArrangeError::InvalidRotation(other)),
        }
    }
}

bitflags::bitflags! {
    /// Transient per-item flags used while resolving one quadrant window.
    ///
    /// Flags are reset when a frame's chain is built and carry no meaning after arrangement.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct QuadrantFlags: u8 {
        /// Item belongs to the current window and has not been compared yet.
        const IDENTICAL = 1 << 0;
        /// Item may be moved in front of an earlier item of the window.
        const NEXT = 1 << 1;
        /// First item past the window; stops the comparison walk.
        const BIGGER = 1 << 7;
    }
}

/// Inclusive range of occupied quadrant indices of a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuadrantRange {
    /// Lowest occupied quadrant (drawn first).
    pub back: u16,
    /// Highest occupied quadrant (drawn last).
    pub front: u16,
}

impl QuadrantRange {
    /// Create a range covering `back..=front`.
    pub const fn new(back: u16, front: u16) -> Self {
        Self { back, front }
    }

    /// Whether `quadrant` lies inside the range.
    pub const fn contains(&self, quadrant: u16) -> bool {
        self.back <= quadrant && quadrant <= self.front
    }

    /// Widen the range so it includes `quadrant`.
    pub(crate) fn include(&mut self, quadrant: u16) {
        self.back = self.back.min(quadrant);
        self.front = self.front.max(quadrant);
    }
}
