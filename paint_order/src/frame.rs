// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame context: item arena, quadrant table, and the resolved chain.

use alloc::vec;
use alloc::vec::Vec;

use crate::arrange::{self, ArrangeStats};
use crate::chain;
use crate::error::ArrangeError;
use crate::types::{BoundBox, ItemId, MAX_QUADRANTS, QuadrantFlags, QuadrantRange, Rotation};

/// A drawable item owned by a [`Frame`].
#[derive(Clone, Debug)]
pub struct DrawItem<P> {
    /// World-space bounding box used for occlusion tests.
    pub bounds: BoundBox,
    /// Quadrant bucket the item was filed under.
    pub quadrant: u16,
    /// Opaque render reference handed back to the renderer.
    pub payload: P,
    pub(crate) next: Option<ItemId>,
    pub(crate) flags: QuadrantFlags,
}

impl<P> DrawItem<P> {
    /// Transient flags left by the last arrangement. Only useful for debugging.
    pub fn flags(&self) -> QuadrantFlags {
        self.flags
    }
}

/// An item of a [`RawFrame`], with its forward link given as a slot index.
#[derive(Clone, Debug)]
pub struct RawItem<P> {
    /// World-space bounding box.
    pub bounds: BoundBox,
    /// Quadrant index.
    pub quadrant: u16,
    /// Slot of the next item in the same bucket.
    pub next: Option<u32>,
    /// Render reference.
    pub payload: P,
}

/// Bucketed items as recorded elsewhere, for example by a scene capture.
///
/// Unlike [`Frame::submit`], nothing here is checked until [`Frame::from_raw`].
#[derive(Clone, Debug)]
pub struct RawFrame<P> {
    /// Camera rotation.
    pub rotation: Rotation,
    /// Item slots. Slots that no bucket reaches are kept but never painted.
    pub items: Vec<RawItem<P>>,
    /// Bucket heads, one per quadrant.
    pub quadrants: Vec<Option<u32>>,
    /// Occupied quadrant range, or `None` for an empty frame.
    pub range: Option<QuadrantRange>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum State {
    Collecting,
    Arranged,
}

/// Everything one frame needs to compute its paint order.
///
/// Fill it with [`Frame::submit`], call [`Frame::arrange`], then read [`Frame::paint_order`].
/// [`Frame::clear`] prepares it for the next frame while keeping its allocations.
#[derive(Clone)]
pub struct Frame<P> {
    pub(crate) rotation: Rotation,
    pub(crate) items: Vec<DrawItem<P>>,
    pub(crate) quadrants: Vec<Option<ItemId>>,
    pub(crate) range: Option<QuadrantRange>,
    pub(crate) head: Option<ItemId>,
    pub(crate) state: State,
}

impl<P> core::fmt::Debug for Frame<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let occupied = self.quadrants.iter().filter(|q| q.is_some()).count();
        f.debug_struct("Frame")
            .field("rotation", &self.rotation)
            .field("items", &self.items.len())
            .field("quadrants", &self.quadrants.len())
            .field("occupied_quadrants", &occupied)
            .field("range", &self.range)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<P> Frame<P> {
    /// Create an empty frame with [`MAX_QUADRANTS`] buckets.
    pub fn new(rotation: Rotation) -> Self {
        Self::with_quadrant_capacity(rotation, MAX_QUADRANTS)
    }

    /// Create an empty frame with `capacity` buckets.
    pub fn with_quadrant_capacity(rotation: Rotation, capacity: usize) -> Self {
        Self {
            rotation,
            items: Vec::new(),
            quadrants: vec![None; capacity],
            range: None,
            head: None,
            state: State::Collecting,
        }
    }

    /// Build a frame from recorded buckets.
    ///
    /// Checks every link and bucket head for slots that do not exist, and the range against
    /// the bucket count. Cycles and misfiled items are reported by [`Frame::arrange`].
    pub fn from_raw(raw: RawFrame<P>) -> Result<Self, ArrangeError> {
        let len = raw.items.len();
        let check = |slot: u32| -> Result<ItemId, ArrangeError> {
            if (slot as usize) < len {
                Ok(ItemId(slot))
            } else {
                Err(ArrangeError::DanglingLink { slot, len })
            }
        };
        if u32::try_from(len).is_err() {
            return Err(ArrangeError::ArenaFull);
        }
        let mut items = Vec::with_capacity(len);
        for item in raw.items {
            items.push(DrawItem {
                bounds: item.bounds,
                quadrant: item.quadrant,
                payload: item.payload,
                next: item.next.map(check).transpose()?,
                flags: QuadrantFlags::empty(),
            });
        }
        let quadrants = raw
            .quadrants
            .into_iter()
            .map(|head| head.map(check).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(range) = raw.range {
            check_range(range, quadrants.len())?;
        }
        Ok(Self {
            rotation: raw.rotation,
            items,
            quadrants,
            range: raw.range,
            head: None,
            state: State::Collecting,
        })
    }

    /// The frame's buckets as a [`RawFrame`], for recording.
    ///
    /// Returns `None` once the frame is arranged, because the links then describe the chain
    /// rather than the buckets.
    pub fn to_raw(&self) -> Option<RawFrame<P>>
    where
        P: Clone,
    {
        if self.state == State::Arranged {
            return None;
        }
        Some(RawFrame {
            rotation: self.rotation,
            items: self
                .items
                .iter()
                .map(|item| RawItem {
                    bounds: item.bounds,
                    quadrant: item.quadrant,
                    next: item.next.map(|id| id.0),
                    payload: item.payload.clone(),
                })
                .collect(),
            quadrants: self.quadrants.iter().map(|q| q.map(|id| id.0)).collect(),
            range: self.range,
        })
    }

    /// Camera rotation used by the comparator.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Change the rotation. Takes effect on the next arrangement.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Number of quadrant buckets.
    pub fn quadrant_capacity(&self) -> usize {
        self.quadrants.len()
    }

    /// Occupied quadrant range, `None` when nothing was submitted.
    pub fn range(&self) -> Option<QuadrantRange> {
        self.range
    }

    /// Number of items in the arena.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the arena holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether [`Frame::arrange`] has completed for this frame.
    pub fn is_arranged(&self) -> bool {
        self.state == State::Arranged
    }

    /// Access an item.
    pub fn item(&self, id: ItemId) -> Option<&DrawItem<P>> {
        self.items.get(id.idx())
    }

    /// File an item under `quadrant`.
    ///
    /// The item goes to the head of its bucket, so within one quadrant the most recently
    /// submitted item is drawn first unless the resolver moves it.
    pub fn submit(&mut self, bounds: BoundBox, quadrant: u16, payload: P) -> Result<ItemId, ArrangeError> {
        if self.state == State::Arranged {
            return Err(ArrangeError::AlreadyArranged);
        }
        let capacity = self.quadrants.len();
        if usize::from(quadrant) >= capacity {
            return Err(ArrangeError::QuadrantOverCapacity { quadrant, capacity });
        }
        let id = ItemId(u32::try_from(self.items.len()).map_err(|_| ArrangeError::ArenaFull)?);
        let bucket = &mut self.quadrants[usize::from(quadrant)];
        self.items.push(DrawItem {
            bounds,
            quadrant,
            payload,
            next: *bucket,
            flags: QuadrantFlags::empty(),
        });
        *bucket = Some(id);
        match &mut self.range {
            Some(range) => range.include(quadrant),
            None => self.range = Some(QuadrantRange::new(quadrant, quadrant)),
        }
        Ok(id)
    }

    /// Chain the buckets and resolve overlaps between adjacent quadrants.
    ///
    /// On error nothing has been modified. Calling this on an arranged frame resolves the
    /// existing chain again, like [`Frame::rearrange`].
    pub fn arrange(&mut self) -> Result<ArrangeStats, ArrangeError> {
        if self.state == State::Collecting {
            chain::build(self)?;
            self.state = State::Arranged;
        }
        Ok(arrange::resolve_all(self))
    }

    /// Run the resolver again over the already arranged chain without rebuilding it.
    ///
    /// Returns `None` if the frame has not been arranged yet.
    pub fn rearrange(&mut self) -> Option<ArrangeStats> {
        (self.state == State::Arranged).then(|| arrange::resolve_all(self))
    }

    /// Arrange the frame, falling back to submission order if it is malformed.
    pub fn arrange_or_fallback(&mut self) -> Vec<ItemId> {
        match self.arrange() {
            Ok(_) => self.paint_order().collect(),
            Err(err) => {
                log::warn!("paint order rejected ({err}); drawing in submission order");
                self.submission_order().collect()
            }
        }
    }

    /// Items in final paint order. Empty until the frame is arranged.
    pub fn paint_order(&self) -> PaintOrder<'_, P> {
        PaintOrder {
            frame: self,
            next: self.head,
            remaining: self.items.len(),
        }
    }

    /// Items in final paint order, with their data.
    pub fn painted_items(&self) -> impl Iterator<Item = (ItemId, &DrawItem<P>)> + '_ {
        self.paint_order().map(|id| (id, &self.items[id.idx()]))
    }

    /// Items in arena order, which is the order they were submitted in.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Arena length is capped at u32::MAX by submit and from_raw."
    )]
    pub fn submission_order(&self) -> impl Iterator<Item = ItemId> + '_ {
        (0..self.items.len()).map(|i| ItemId(i as u32))
    }

    /// Drop all items and reset the quadrant table for the next frame.
    pub fn clear(&mut self) {
        self.items.clear();
        self.quadrants.fill(None);
        self.range = None;
        self.head = None;
        self.state = State::Collecting;
    }
}

pub(crate) fn check_range(range: QuadrantRange, capacity: usize) -> Result<(), ArrangeError> {
    if range.back > range.front {
        return Err(ArrangeError::InvertedRange {
            back: range.back,
            front: range.front,
        });
    }
    if usize::from(range.front) >= capacity {
        return Err(ArrangeError::QuadrantOverCapacity {
            quadrant: range.front,
            capacity,
        });
    }
    Ok(())
}

/// Iterator over a frame's chain, from the sentinel's successor to the end.
#[derive(Clone, Debug)]
pub struct PaintOrder<'a, P> {
    frame: &'a Frame<P>,
    next: Option<ItemId>,
    remaining: usize,
}

impl<P> Iterator for PaintOrder<'_, P> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        // The chain is acyclic once built; the countdown keeps a corrupted one finite.
        if self.remaining == 0 {
            return None;
        }
        let id = self.next?;
        self.remaining -= 1;
        self.next = self.frame.items[id.idx()].next;
        Some(id)
    }
}
