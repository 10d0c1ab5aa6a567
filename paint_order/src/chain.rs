// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain bookkeeping and the bucket/chain builder.
//!
//! The chain is a singly linked list threaded through the items' `next` links and anchored by a
//! sentinel that lives in the frame itself. Building it validates every bucket in the occupied
//! range first and only then rewrites links, so a rejected frame is left untouched.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::ArrangeError;
use crate::frame::{Frame, check_range};
use crate::types::{ItemId, QuadrantFlags};

/// A position in the chain: the sentinel or an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Pos {
    Head,
    Item(ItemId),
}

impl<P> Frame<P> {
    #[inline]
    pub(crate) fn next_of(&self, pos: Pos) -> Option<ItemId> {
        match pos {
            Pos::Head => self.head,
            Pos::Item(id) => self.items[id.idx()].next,
        }
    }

    #[inline]
    pub(crate) fn set_next(&mut self, pos: Pos, next: Option<ItemId>) {
        match pos {
            Pos::Head => self.head = next,
            Pos::Item(id) => self.items[id.idx()].next = next,
        }
    }
}

/// Concatenate the buckets of the occupied range into one chain, back to front.
pub(crate) fn build<P>(frame: &mut Frame<P>) -> Result<(), ArrangeError> {
    let spans = bucket_spans(frame)?;
    let mut tail = Pos::Head;
    frame.head = None;
    for (first, last) in spans {
        frame.set_next(tail, Some(first));
        tail = Pos::Item(last);
    }
    let mut cur = frame.head;
    while let Some(id) = cur {
        let item = &mut frame.items[id.idx()];
        item.flags = QuadrantFlags::empty();
        cur = item.next;
    }
    Ok(())
}

/// First and last item of each non-empty bucket in the occupied range, in ascending order.
fn bucket_spans<P>(frame: &Frame<P>) -> Result<Vec<(ItemId, ItemId)>, ArrangeError> {
    let Some(range) = frame.range else {
        return Ok(Vec::new());
    };
    check_range(range, frame.quadrants.len())?;

    let mut seen = vec![false; frame.items.len()];
    let mut spans = Vec::new();
    for bucket in range.back..=range.front {
        let Some(first) = frame.quadrants[usize::from(bucket)] else {
            continue;
        };
        let mut last = first;
        let mut cur = Some(first);
        while let Some(id) = cur {
            if core::mem::replace(&mut seen[id.idx()], true) {
                return Err(ArrangeError::Cycle { item: id });
            }
            let item = &frame.items[id.idx()];
            if !range.contains(item.quadrant) {
                return Err(ArrangeError::QuadrantOutOfRange {
                    item: id,
                    quadrant: item.quadrant,
                    back: range.back,
                    front: range.front,
                });
            }
            if item.quadrant != bucket {
                return Err(ArrangeError::MisplacedItem {
                    item: id,
                    quadrant: item.quadrant,
                    bucket,
                });
            }
            last = id;
            cur = item.next;
        }
        spans.push((first, last));
    }
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{RawFrame, RawItem};
    use crate::types::{BoundBox, QuadrantRange, Rotation};

    fn raw_item(quadrant: u16, next: Option<u32>) -> RawItem<u32> {
        RawItem {
            bounds: BoundBox::default(),
            quadrant,
            next,
            payload: 0,
        }
    }

    fn chain_of<P>(frame: &Frame<P>) -> Vec<usize> {
        frame.paint_order().map(ItemId::index).collect()
    }

    #[test]
    fn buckets_concatenate_in_quadrant_order() {
        // Bucket 1: 2 -> 0, bucket 3: 1, bucket 4: 3 -> 4.
        let raw = RawFrame {
            rotation: Rotation::R0,
            items: vec![
                raw_item(1, None),
                raw_item(3, None),
                raw_item(1, Some(0)),
                raw_item(4, Some(4)),
                raw_item(4, None),
            ],
            quadrants: vec![None, Some(2), None, Some(1), Some(3), None],
            range: Some(QuadrantRange::new(1, 4)),
        };
        let mut frame = Frame::from_raw(raw).unwrap();
        build(&mut frame).unwrap();
        assert_eq!(chain_of(&frame), [2, 0, 1, 3, 4]);
    }

    #[test]
    fn buckets_outside_the_range_are_ignored() {
        let raw = RawFrame {
            rotation: Rotation::R0,
            items: vec![raw_item(0, None), raw_item(2, None)],
            quadrants: vec![Some(0), None, Some(1)],
            range: Some(QuadrantRange::new(1, 2)),
        };
        let mut frame = Frame::from_raw(raw).unwrap();
        build(&mut frame).unwrap();
        assert_eq!(chain_of(&frame), [1]);
    }

    #[test]
    fn empty_range_yields_bare_sentinel() {
        let raw = RawFrame {
            rotation: Rotation::R0,
            items: vec![raw_item(0, None)],
            quadrants: vec![Some(0)],
            range: None,
        };
        let mut frame = Frame::from_raw(raw).unwrap();
        build(&mut frame).unwrap();
        assert_eq!(frame.head, None);
    }

    #[test]
    fn cyclic_bucket_is_rejected_without_relinking() {
        let raw = RawFrame {
            rotation: Rotation::R0,
            items: vec![raw_item(0, Some(1)), raw_item(0, Some(0)), raw_item(1, None)],
            quadrants: vec![Some(2), Some(0), None],
            range: Some(QuadrantRange::new(0, 1)),
        };
        let mut frame = Frame::from_raw(raw).unwrap();
        // Bucket 0 holds item 2, which claims quadrant 1.
        assert_eq!(
            build(&mut frame).unwrap_err(),
            ArrangeError::MisplacedItem {
                item: ItemId(2),
                quadrant: 1,
                bucket: 0
            }
        );

        let raw = RawFrame {
            rotation: Rotation::R0,
            items: vec![raw_item(0, Some(1)), raw_item(0, Some(0))],
            quadrants: vec![Some(0)],
            range: Some(QuadrantRange::new(0, 0)),
        };
        let mut frame = Frame::from_raw(raw).unwrap();
        assert_eq!(
            build(&mut frame).unwrap_err(),
            ArrangeError::Cycle { item: ItemId(0) }
        );
        assert_eq!(frame.items[1].next, Some(ItemId(0)));
        assert_eq!(frame.head, None);
    }

    #[test]
    fn link_into_another_bucket_is_misplaced() {
        // Bucket 0 runs on into item 1, the head of bucket 1.
        let raw = RawFrame {
            rotation: Rotation::R0,
            items: vec![raw_item(0, Some(1)), raw_item(1, None)],
            quadrants: vec![Some(0), Some(1)],
            range: Some(QuadrantRange::new(0, 1)),
        };
        let mut frame = Frame::from_raw(raw).unwrap();
        assert_eq!(
            build(&mut frame).unwrap_err(),
            ArrangeError::MisplacedItem {
                item: ItemId(1),
                quadrant: 1,
                bucket: 0
            }
        );
    }

    #[test]
    fn out_of_range_quadrant_is_rejected() {
        let raw = RawFrame {
            rotation: Rotation::R0,
            items: vec![raw_item(7, None)],
            quadrants: vec![None, Some(0), None],
            range: Some(QuadrantRange::new(1, 2)),
        };
        let mut frame = Frame::from_raw(raw).unwrap();
        assert_eq!(
            build(&mut frame).unwrap_err(),
            ArrangeError::QuadrantOutOfRange {
                item: ItemId(0),
                quadrant: 7,
                back: 1,
                front: 2
            }
        );
    }
}
