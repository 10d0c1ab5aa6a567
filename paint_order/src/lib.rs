// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint Order: rotation-aware draw ordering for isometric, quadrant-bucketed scenes.
//!
//! An isometric renderer files every drawable into a coarse "quadrant" along the sweep
//! direction and paints quadrants back to front. That is almost right: boxes near a quadrant
//! boundary can overlap their neighbours, and then the nearer one has to be painted later even
//! though it sits in an earlier bucket. This crate computes the final order once per frame.
//!
//! - Submit items with a 3D bounding box, a quadrant index, and a payload into a [`Frame`].
//! - [`Frame::arrange`] chains the buckets back to front and resolves overlaps between each
//!   pair of adjacent quadrants in one pass, using a per-[`Rotation`] occlusion table.
//! - Read the result with [`Frame::paint_order`].
//!
//! Bounding-box computation, quadrant assignment, culling and rasterization happen upstream
//! or downstream; this crate only orders.
//!
//! # Example
//!
//! ```rust
//! use paint_order::{BoundBox, Frame, Rotation};
//!
//! let mut frame = Frame::new(Rotation::R0);
//! let a = frame.submit(BoundBox::new(0, 10, 0, 10, 20, 10), 0, "a").unwrap();
//! let b = frame.submit(BoundBox::new(5, 0, 0, 15, 10, 10), 1, "b").unwrap();
//! let c = frame.submit(BoundBox::new(20, 0, 0, 30, 10, 10), 2, "c").unwrap();
//!
//! frame.arrange().unwrap();
//!
//! // `b` overlaps `a` from behind, so it is painted first even though its quadrant is later.
//! let order: Vec<_> = frame.paint_order().collect();
//! assert_eq!(order, [b, a, c]);
//! ```
//!
//! ## Failure handling
//!
//! Malformed frames (a cyclic bucket, an item filed under the wrong quadrant, an inverted or
//! oversized quadrant range) are rejected with an [`ArrangeError`] before anything is relinked.
//! [`Frame::arrange_or_fallback`] logs the error and returns submission order instead.
//!
//! ## Cross-checking
//!
//! [`verify::cross_check`] runs the resumable resolver and a restart-from-head reference over
//! copies of a frame and reports where their orders diverge.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arrange;
mod chain;
pub mod error;
pub mod frame;
pub mod rotation;
pub mod types;
pub mod verify;

#[cfg(test)]
mod testing;

pub use arrange::ArrangeStats;
pub use error::ArrangeError;
pub use frame::{DrawItem, Frame, PaintOrder, RawFrame, RawItem};
pub use rotation::{ROTATION_TABLES, overlap_mask};
pub use types::{BoundBox, ItemId, MAX_QUADRANTS, QuadrantFlags, QuadrantRange, Rotation};
