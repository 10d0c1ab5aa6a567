// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encoder producing the payload [`decode`](crate::decode) reads.

use crate::decode::SESSION_BYTES;
use crate::error::CaptureError;
use crate::types::{Capture, CapturedItem, CapturedSession, ITEM_SLOTS, QUADRANT_SLOTS, VERSION};

/// Encode a capture into an uncompressed payload.
///
/// Sessions must have exactly [`ITEM_SLOTS`] items and [`QUADRANT_SLOTS`] bucket heads, as
/// produced by [`CapturedSession::from_frame`].
pub fn encode(capture: &Capture) -> Result<Vec<u8>, CaptureError> {
    let count = session_count(capture.sessions.len())?;
    let mut out = Vec::with_capacity(
        VERSION.len() + capture.park.len() + 6 + capture.sessions.len() * SESSION_BYTES,
    );
    put_string(&mut out, VERSION)?;
    put_string(&mut out, &capture.park)?;
    out.extend_from_slice(&count.to_le_bytes());
    for session in &capture.sessions {
        put_session(&mut out, session)?;
    }
    Ok(out)
}

fn session_count(len: usize) -> Result<u32, CaptureError> {
    u32::try_from(len).map_err(|_| CaptureError::TooManySessions(len))
}

fn put_string(out: &mut Vec<u8>, s: &str) -> Result<(), CaptureError> {
    if s.as_bytes().contains(&0) {
        return Err(CaptureError::NulInString(s.to_owned()));
    }
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    Ok(())
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "ITEM_SLOTS and QUADRANT_SLOTS are small constants."
)]
fn put_session(out: &mut Vec<u8>, session: &CapturedSession) -> Result<(), CaptureError> {
    if session.items.len() != ITEM_SLOTS || session.quadrants.len() != QUADRANT_SLOTS {
        return Err(CaptureError::DoesNotFit {
            items: session.items.len(),
            quadrants: session.quadrants.len(),
        });
    }
    for item in &session.items {
        put_item(out, item);
    }
    for head in &session.quadrants {
        let head = head.unwrap_or(QUADRANT_SLOTS as u32);
        out.extend_from_slice(&head.to_le_bytes());
    }
    put_item(out, &session.head);
    out.extend_from_slice(&session.front.to_le_bytes());
    out.extend_from_slice(&session.back.to_le_bytes());
    Ok(())
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "ITEM_SLOTS is a small constant."
)]
fn put_item(out: &mut Vec<u8>, item: &CapturedItem) {
    let b = item.bounds;
    for v in [b.x, b.y, b.z, b.x_end, b.y_end, b.z_end] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    let next = item.next.unwrap_or(ITEM_SLOTS as u32);
    out.extend_from_slice(&next.to_le_bytes());
    out.push(item.quadrant_flags);
    out.push(item.quadrant);
    out.extend_from_slice(&item.sprite.x.to_le_bytes());
    out.extend_from_slice(&item.sprite.y.to_le_bytes());
    out.extend_from_slice(&item.sprite.image_id.to_le_bytes());
}
