// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported when a frame cannot be arranged.

use crate::types::ItemId;

/// Structural problems that stop a frame from being arranged.
///
/// All of these are detected before the chain is modified, so a frame that reports one
/// still holds its submitted items and can fall back to submission order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArrangeError {
    /// Rotation value outside `0..=3`.
    #[error("invalid rotation {0}, expected a value in 0..=3")]
    InvalidRotation(u8),
    /// Quadrant index at or beyond the frame's bucket count.
    #[error("quadrant {quadrant} exceeds the frame capacity of {capacity} quadrants")]
    QuadrantOverCapacity {
        /// Offending quadrant index.
        quadrant: u16,
        /// Number of buckets in the frame.
        capacity: usize,
    },
    /// Back index greater than front index.
    #[error("back quadrant {back} lies in front of front quadrant {front}")]
    InvertedRange {
        /// Back index.
        back: u16,
        /// Front index.
        front: u16,
    },
    /// A chained item carries a quadrant index outside the occupied range.
    #[error("item {item:?} has quadrant {quadrant}, outside the occupied range {back}..={front}")]
    QuadrantOutOfRange {
        /// Offending item.
        item: ItemId,
        /// Its quadrant index.
        quadrant: u16,
        /// Back index of the frame.
        back: u16,
        /// Front index of the frame.
        front: u16,
    },
    /// An item is reachable from a bucket other than its own.
    #[error("item {item:?} with quadrant {quadrant} is filed in bucket {bucket}")]
    MisplacedItem {
        /// Offending item.
        item: ItemId,
        /// Its quadrant index.
        quadrant: u16,
        /// Bucket it was reached from.
        bucket: u16,
    },
    /// A link or bucket head names a slot that does not exist.
    #[error("link to slot {slot} but the frame only holds {len} items")]
    DanglingLink {
        /// Linked slot.
        slot: u32,
        /// Number of items in the frame.
        len: usize,
    },
    /// The bucket lists revisit an item, which would make the chain cyclic.
    #[error("item {item:?} is reached twice while chaining buckets")]
    Cycle {
        /// First item reached a second time.
        item: ItemId,
    },
    /// Items were submitted after the frame was arranged.
    #[error("frame is already arranged; clear it before submitting new items")]
    AlreadyArranged,
    /// The frame arena is full.
    #[error("frame holds the maximum number of items")]
    ArenaFull,
}
