// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-checking the resumable resolver against a restart-from-head reference.
//!
//! The reference runs the same window step but rescans the chain from the sentinel for every
//! window. It is slower and exists to catch regressions in the resume logic, for example when
//! replaying recorded scenes.

use alloc::vec::Vec;

use crate::arrange::{self, ArrangeStats, Resume};
use crate::chain;
use crate::error::ArrangeError;
use crate::frame::{Frame, State};
use crate::types::ItemId;

/// Arrange `frame` without the resume cache.
///
/// Produces the same chain as [`Frame::arrange`]; only the amount of scanning differs.
pub fn arrange_uncached<P>(frame: &mut Frame<P>) -> Result<ArrangeStats, ArrangeError> {
    if frame.state == State::Collecting {
        chain::build(frame)?;
        frame.state = State::Arranged;
    }
    Ok(arrange::resolve_with(frame, Resume::FromHead))
}

/// Paint orders produced by both resolvers for the same frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossCheck {
    /// Order from [`Frame::arrange`].
    pub cached: Vec<ItemId>,
    /// Order from [`arrange_uncached`].
    pub uncached: Vec<ItemId>,
}

impl CrossCheck {
    /// True if both orders are identical.
    pub fn is_consistent(&self) -> bool {
        self.cached == self.uncached
    }

    /// Index of the first position where the orders differ, if any.
    pub fn first_divergence(&self) -> Option<usize> {
        let common = self.cached.len().min(self.uncached.len());
        (0..common)
            .find(|&i| self.cached[i] != self.uncached[i])
            .or_else(|| (self.cached.len() != self.uncached.len()).then_some(common))
    }
}

/// Arrange copies of `frame` with both resolvers and collect their orders.
///
/// `frame` itself is left as it is.
pub fn cross_check<P: Clone>(frame: &Frame<P>) -> Result<CrossCheck, ArrangeError> {
    let mut cached = frame.clone();
    cached.arrange()?;
    let mut uncached = frame.clone();
    arrange_uncached(&mut uncached)?;
    let check = CrossCheck {
        cached: cached.paint_order().collect(),
        uncached: uncached.paint_order().collect(),
    };
    if let Some(at) = check.first_divergence() {
        log::warn!("resolvers diverge at paint position {at}");
    }
    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::random_frame;
    use crate::types::Rotation;

    #[test]
    fn resolvers_agree_on_random_frames() {
        for seed in 1..=40_u64 {
            for rotation in Rotation::ALL {
                let frame = random_frame(seed, rotation, 120, 24);
                let check = cross_check(&frame).unwrap();
                assert!(check.is_consistent(), "seed {seed} rotation {rotation:?}");
                assert_eq!(check.cached.len(), 120);
            }
        }
    }

    #[test]
    fn stats_match_between_resolvers() {
        let mut a = random_frame(7, Rotation::R3, 200, 40);
        let mut b = a.clone();
        let cached = a.arrange().unwrap();
        let uncached = arrange_uncached(&mut b).unwrap();
        assert_eq!(cached, uncached);
    }

    #[test]
    fn divergence_reports_first_difference() {
        let check = CrossCheck {
            cached: alloc::vec![ItemId(0), ItemId(1), ItemId(2)],
            uncached: alloc::vec![ItemId(0), ItemId(2), ItemId(1)],
        };
        assert!(!check.is_consistent());
        assert_eq!(check.first_divergence(), Some(1));

        let check = CrossCheck {
            cached: alloc::vec![ItemId(0)],
            uncached: alloc::vec![ItemId(0), ItemId(1)],
        };
        assert_eq!(check.first_divergence(), Some(1));
    }

    #[test]
    fn cross_check_leaves_frame_untouched() {
        let frame = random_frame(3, Rotation::R1, 30, 6);
        let _ = cross_check(&frame).unwrap();
        assert!(!frame.is_arranged());
        assert_eq!(frame.paint_order().count(), 0);
    }
}
