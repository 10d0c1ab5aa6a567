// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadrant arrangement resolver.
//!
//! The chain arrives in ascending quadrant order. The resolver slides a two-quadrant window
//! `[q, q + 1]` from back to front and, inside each window, lets items of the nearer quadrant
//! jump in front of earlier items whose boxes they must be painted before. Moves are local
//! relinks, never a re-sort.
//!
//! Each window resumes the scan where the previous one found its boundary, so one full pass
//! touches every item a bounded number of times.

use crate::chain::Pos;
use crate::frame::Frame;
use crate::types::{ItemId, QuadrantFlags, Rotation};

/// Counters collected while resolving one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrangeStats {
    /// Number of windows resolved.
    pub windows: usize,
    /// Number of comparator calls.
    pub comparisons: usize,
    /// Number of items moved in front of another.
    pub moves: usize,
}

/// Where a window starts scanning from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Resume {
    /// Continue from the boundary returned by the previous window.
    Cached,
    /// Restart every window from the sentinel.
    FromHead,
}

/// Resolve every window of an already built chain.
pub(crate) fn resolve_all<P>(frame: &mut Frame<P>) -> ArrangeStats {
    resolve_with(frame, Resume::Cached)
}

pub(crate) fn resolve_with<P>(frame: &mut Frame<P>, resume: Resume) -> ArrangeStats {
    let mut stats = ArrangeStats::default();
    let Some(range) = frame.range else {
        return stats;
    };
    if frame.head.is_none() {
        return stats;
    }

    let mut cache = resolve_window(frame, Pos::Head, range.back, QuadrantFlags::NEXT, &mut stats);
    for quadrant in range.back.saturating_add(1)..range.front {
        let start = match resume {
            Resume::Cached => cache,
            Resume::FromHead => Pos::Head,
        };
        cache = resolve_window(frame, start, quadrant, QuadrantFlags::empty(), &mut stats);
    }

    log::debug!(
        "arranged {} items over quadrants {}..={} (rotation {}): {} windows, {} comparisons, {} moves",
        frame.items.len(),
        range.back,
        range.front,
        frame.rotation.value(),
        stats.windows,
        stats.comparisons,
        stats.moves,
    );
    stats
}

/// Resolve the window `[quadrant, quadrant + 1]` starting the scan at `start`.
///
/// Returns the position the next window should resume from: the predecessor of the first item
/// at or beyond `quadrant`, or the last item of the chain if there is none.
fn resolve_window<P>(
    frame: &mut Frame<P>,
    start: Pos,
    quadrant: u16,
    flag: QuadrantFlags,
    stats: &mut ArrangeStats,
) -> Pos {
    let q = u32::from(quadrant);

    let mut pos = start;
    let boundary = loop {
        let Some(next) = frame.next_of(pos) else {
            return pos;
        };
        if u32::from(frame.items[next.idx()].quadrant) >= q {
            break pos;
        }
        pos = Pos::Item(next);
    };
    stats.windows += 1;

    tag_window(frame, boundary, q, flag);

    let rotation = frame.rotation;
    let moves_before = stats.moves;
    let mut anchor = boundary;
    while let Some(initial) = next_identical(frame, &mut anchor) {
        frame.items[initial.idx()].flags.remove(QuadrantFlags::IDENTICAL);
        compare_against(frame, rotation, anchor, initial, stats);
    }

    let moved = stats.moves - moves_before;
    if moved > 0 {
        log::trace!("window {quadrant}..={}: {moved} moves", q + 1);
    }
    boundary
}

/// Tag items from the boundary on: the window gets `IDENTICAL`, its front half `NEXT`, and the
/// first item past it `BIGGER`.
fn tag_window<P>(frame: &mut Frame<P>, boundary: Pos, q: u32, flag: QuadrantFlags) {
    let mut cur = frame.next_of(boundary);
    while let Some(id) = cur {
        let item = &mut frame.items[id.idx()];
        let k = u32::from(item.quadrant);
        if k > q + 1 {
            item.flags = QuadrantFlags::BIGGER;
            break;
        } else if k == q + 1 {
            item.flags = QuadrantFlags::NEXT | QuadrantFlags::IDENTICAL;
        } else if k == q {
            item.flags = flag | QuadrantFlags::IDENTICAL;
        }
        cur = item.next;
    }
}

/// Advance `pos` to the predecessor of the next uncompared window item.
///
/// Returns `None` once the walk reaches the end of the chain or a `BIGGER` item.
fn next_identical<P>(frame: &Frame<P>, pos: &mut Pos) -> Option<ItemId> {
    loop {
        let next = frame.next_of(*pos)?;
        let flags = frame.items[next.idx()].flags;
        if flags.contains(QuadrantFlags::BIGGER) {
            return None;
        }
        if flags.contains(QuadrantFlags::IDENTICAL) {
            return Some(next);
        }
        *pos = Pos::Item(next);
    }
}

/// Compare `initial` with every later `NEXT` item of the window and move each one that must be
/// painted first so it directly follows `anchor`.
fn compare_against<P>(
    frame: &mut Frame<P>,
    rotation: Rotation,
    anchor: Pos,
    initial: ItemId,
    stats: &mut ArrangeStats,
) {
    let initial_bounds = frame.items[initial.idx()].bounds;
    let mut prev = Pos::Item(initial);
    while let Some(current) = frame.next_of(prev) {
        let item = &frame.items[current.idx()];
        if item.flags.contains(QuadrantFlags::BIGGER) {
            break;
        }
        if !item.flags.contains(QuadrantFlags::NEXT) {
            prev = Pos::Item(current);
            continue;
        }
        stats.comparisons += 1;
        if rotation.draws_before(&initial_bounds, &item.bounds) {
            // Unlink `current` and splice it in right after the anchor; `prev` stays put.
            let after = item.next;
            frame.set_next(prev, after);
            let first = frame.next_of(anchor);
            frame.set_next(anchor, Some(current));
            frame.set_next(Pos::Item(current), first);
            stats.moves += 1;
        } else {
            prev = Pos::Item(current);
        }
    }
}
