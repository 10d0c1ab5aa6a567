// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory form of a recorded paint session.

use paint_order::{BoundBox, Frame, QuadrantRange, RawFrame, RawItem, Rotation};

use crate::error::CaptureError;

/// Version string every capture starts with.
pub const VERSION: &str = "paint session v1";

/// Number of item slots recorded per session. Also the "no next item" marker.
pub const ITEM_SLOTS: usize = 4000;

/// Number of quadrant buckets recorded per session. Also the "empty bucket" marker.
pub const QUADRANT_SLOTS: usize = 512;

/// Back index recorded for a session with no items.
pub const EMPTY_BACK: u32 = u32::MAX;

/// Bounding box as recorded, in 16-bit world units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedBounds {
    /// Minimum x.
    pub x: u16,
    /// Minimum y.
    pub y: u16,
    /// Minimum z.
    pub z: u16,
    /// Maximum x.
    pub x_end: u16,
    /// Maximum y.
    pub y_end: u16,
    /// Maximum z.
    pub z_end: u16,
}

impl From<CapturedBounds> for BoundBox {
    fn from(b: CapturedBounds) -> Self {
        Self::new(
            b.x.into(),
            b.y.into(),
            b.z.into(),
            b.x_end.into(),
            b.y_end.into(),
            b.z_end.into(),
        )
    }
}

/// Sprite reference carried through replay as the item payload.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SpriteRef {
    /// Image to draw.
    pub image_id: u32,
    /// Screen x.
    pub x: u16,
    /// Screen y.
    pub y: u16,
}

/// One recorded item slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedItem {
    /// Bounding box.
    pub bounds: CapturedBounds,
    /// Slot of the next item in the same bucket.
    pub next: Option<u32>,
    /// Quadrant flags as they were in engine memory. Not used by replay.
    pub quadrant_flags: u8,
    /// Quadrant index.
    pub quadrant: u8,
    /// Sprite drawn for this item.
    pub sprite: SpriteRef,
}

/// One recorded frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedSession {
    /// Item slots, [`ITEM_SLOTS`] of them in a well-formed capture.
    pub items: Vec<CapturedItem>,
    /// Bucket heads, [`QUADRANT_SLOTS`] of them in a well-formed capture.
    pub quadrants: Vec<Option<u32>>,
    /// The engine's sentinel record. Recorded for completeness, ignored on replay.
    pub head: CapturedItem,
    /// Front quadrant index.
    pub front: u32,
    /// Back quadrant index, or [`EMPTY_BACK`].
    pub back: u32,
}

impl CapturedSession {
    /// Occupied quadrant range, `None` for an empty session.
    pub fn range(&self) -> Result<Option<QuadrantRange>, CaptureError> {
        if self.back == EMPTY_BACK {
            return Ok(None);
        }
        match (u16::try_from(self.back), u16::try_from(self.front)) {
            (Ok(back), Ok(front)) => Ok(Some(QuadrantRange::new(back, front))),
            _ => Err(CaptureError::RangeOverflow {
                back: self.back,
                front: self.front,
            }),
        }
    }

    /// Rebuild the frame this session was recorded from.
    ///
    /// Captures do not record the camera rotation, so the caller supplies it.
    pub fn to_frame(&self, rotation: Rotation) -> Result<Frame<SpriteRef>, CaptureError> {
        let raw = RawFrame {
            rotation,
            items: self
                .items
                .iter()
                .map(|item| RawItem {
                    bounds: item.bounds.into(),
                    quadrant: item.quadrant.into(),
                    next: item.next,
                    payload: item.sprite,
                })
                .collect(),
            quadrants: self.quadrants.clone(),
            range: self.range()?,
        };
        Ok(Frame::from_raw(raw)?)
    }

    /// Record a frame that has been filled but not arranged yet.
    ///
    /// Slots beyond the frame's items are padded with empty records so the session has the
    /// fixed layout. Fails if the frame does not fit that layout.
    pub fn from_frame(frame: &Frame<SpriteRef>) -> Result<Self, CaptureError> {
        let raw = frame.to_raw().ok_or(CaptureError::AlreadyArranged)?;
        if raw.items.len() > ITEM_SLOTS || raw.quadrants.len() > QUADRANT_SLOTS {
            return Err(CaptureError::DoesNotFit {
                items: raw.items.len(),
                quadrants: raw.quadrants.len(),
            });
        }
        let mut items = Vec::with_capacity(ITEM_SLOTS);
        for item in raw.items {
            let b = item.bounds;
            let bounds = CapturedBounds {
                x: to_u16(b.x)?,
                y: to_u16(b.y)?,
                z: to_u16(b.z)?,
                x_end: to_u16(b.x_end)?,
                y_end: to_u16(b.y_end)?,
                z_end: to_u16(b.z_end)?,
            };
            let quadrant = u8::try_from(item.quadrant).map_err(|_| CaptureError::DoesNotFit {
                items: frame.len(),
                quadrants: usize::from(item.quadrant) + 1,
            })?;
            items.push(CapturedItem {
                bounds,
                next: item.next,
                quadrant_flags: 0,
                quadrant,
                sprite: item.payload,
            });
        }
        items.resize(ITEM_SLOTS, CapturedItem::default());
        let mut quadrants = raw.quadrants;
        quadrants.resize(QUADRANT_SLOTS, None);
        let (back, front) = match raw.range {
            Some(range) => (u32::from(range.back), u32::from(range.front)),
            None => (EMPTY_BACK, 0),
        };
        Ok(Self {
            items,
            quadrants,
            head: CapturedItem::default(),
            front,
            back,
        })
    }
}

fn to_u16(v: i32) -> Result<u16, CaptureError> {
    u16::try_from(v).map_err(|_| CaptureError::CoordinateOutOfRange(v))
}

/// A decoded capture: a park name and its recorded sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    /// Name of the park the sessions were recorded in.
    pub park: String,
    /// Recorded frames.
    pub sessions: Vec<CapturedSession>,
}

impl Capture {
    /// Rebuild every session as a frame with the given rotation.
    pub fn frames(
        &self,
        rotation: Rotation,
    ) -> impl Iterator<Item = Result<Frame<SpriteRef>, CaptureError>> + '_ {
        self.sessions.iter().map(move |s| s.to_frame(rotation))
    }
}
