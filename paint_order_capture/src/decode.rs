// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoder for the little-endian capture payload.

use crate::error::CaptureError;
use crate::types::{
    Capture, CapturedBounds, CapturedItem, CapturedSession, ITEM_SLOTS, QUADRANT_SLOTS, SpriteRef,
    VERSION,
};

/// Size of one item record.
pub(crate) const ITEM_BYTES: usize = 6 * 2 + 4 + 1 + 1 + 2 + 2 + 4;

/// Size of one session.
pub(crate) const SESSION_BYTES: usize = ITEM_SLOTS * ITEM_BYTES + QUADRANT_SLOTS * 4 + ITEM_BYTES + 4 + 4;

#[derive(Debug)]
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], CaptureError> {
        let end = self.pos + N;
        let chunk = self
            .bytes
            .get(self.pos..end)
            .ok_or(CaptureError::Truncated {
                offset: self.pos,
                what,
            })?;
        self.pos = end;
        let mut out = [0; N];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, CaptureError> {
        Ok(self.take::<1>(what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> Result<u16, CaptureError> {
        self.take(what).map(u16::from_le_bytes)
    }

    fn u32(&mut self, what: &'static str) -> Result<u32, CaptureError> {
        self.take(what).map(u32::from_le_bytes)
    }

    fn string(&mut self) -> Result<&'a str, CaptureError> {
        let offset = self.pos;
        let rest = &self.bytes[offset..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(CaptureError::UnterminatedString { offset })?;
        self.pos += len + 1;
        core::str::from_utf8(&rest[..len]).map_err(|_| CaptureError::InvalidUtf8 { offset })
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn item(&mut self) -> Result<CapturedItem, CaptureError> {
        let bounds = CapturedBounds {
            x: self.u16("bounds")?,
            y: self.u16("bounds")?,
            z: self.u16("bounds")?,
            x_end: self.u16("bounds")?,
            y_end: self.u16("bounds")?,
            z_end: self.u16("bounds")?,
        };
        let next = self.u32("next link")?;
        let quadrant_flags = self.u8("quadrant flags")?;
        let quadrant = self.u8("quadrant index")?;
        let x = self.u16("sprite position")?;
        let y = self.u16("sprite position")?;
        let image_id = self.u32("image id")?;
        Ok(CapturedItem {
            bounds,
            next: (next as usize != ITEM_SLOTS).then_some(next),
            quadrant_flags,
            quadrant,
            sprite: SpriteRef { image_id, x, y },
        })
    }

    fn session(&mut self) -> Result<CapturedSession, CaptureError> {
        let items = (0..ITEM_SLOTS)
            .map(|_| self.item())
            .collect::<Result<Vec<_>, _>>()?;
        let quadrants = (0..QUADRANT_SLOTS)
            .map(|_| {
                let head = self.u32("quadrant head")?;
                Ok((head as usize != QUADRANT_SLOTS).then_some(head))
            })
            .collect::<Result<Vec<_>, CaptureError>>()?;
        let head = self.item()?;
        let front = self.u32("front index")?;
        let back = self.u32("back index")?;
        Ok(CapturedSession {
            items,
            quadrants,
            head,
            front,
            back,
        })
    }
}

/// Decode a decompressed capture payload.
///
/// Trailing bytes after the last session are reported with a warning and otherwise ignored.
pub fn decode(bytes: &[u8]) -> Result<Capture, CaptureError> {
    let mut r = Reader { bytes, pos: 0 };
    let version = r.string()?;
    if version != VERSION {
        return Err(CaptureError::Version(version.to_owned()));
    }
    let park = r.string()?.to_owned();
    let count = r.u32("session count")? as usize;
    if count.saturating_mul(SESSION_BYTES) > r.remaining() {
        return Err(CaptureError::Truncated {
            offset: bytes.len(),
            what: "sessions",
        });
    }
    let sessions = (0..count)
        .map(|_| r.session())
        .collect::<Result<Vec<_>, _>>()?;
    if r.remaining() > 0 {
        log::warn!(
            "{} leftover bytes after {} sessions; consumed {} of {}",
            r.remaining(),
            sessions.len(),
            r.pos,
            bytes.len()
        );
    }
    log::info!("park {park} has {} sessions", sessions.len());
    Ok(Capture { park, sessions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(count: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(VERSION.as_bytes());
        out.push(0);
        out.extend_from_slice(b"Test Park\0");
        out.extend_from_slice(&count.to_le_bytes());
        out
    }

    #[test]
    fn record_layout_sizes() {
        assert_eq!(ITEM_BYTES, 26);
        assert_eq!(SESSION_BYTES, 4000 * 26 + 512 * 4 + 26 + 8);
    }

    #[test]
    fn empty_capture_decodes() {
        let capture = decode(&header(0)).unwrap();
        assert_eq!(capture.park, "Test Park");
        assert!(capture.sessions.is_empty());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let err = decode(b"paint session v2\0park\0\0\0\0\0").unwrap_err();
        assert!(matches!(err, CaptureError::Version(v) if v == "paint session v2"));
    }

    #[test]
    fn missing_terminator_is_rejected() {
        let err = decode(b"paint session v1").unwrap_err();
        assert!(matches!(err, CaptureError::UnterminatedString { offset: 0 }));
    }

    #[test]
    fn short_session_data_is_truncated() {
        let mut bytes = header(1);
        bytes.extend_from_slice(&[0; 100]);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CaptureError::Truncated { what: "sessions", .. }));
    }

    #[test]
    fn truncation_reports_where_the_field_starts() {
        let bytes = [7, 0, 1];
        let mut r = Reader {
            bytes: &bytes,
            pos: 0,
        };
        assert_eq!(r.u16("first").unwrap(), 7);
        let err = r.u16("second").unwrap_err();
        assert!(matches!(
            err,
            CaptureError::Truncated {
                offset: 2,
                what: "second"
            }
        ));
    }

    #[test]
    fn item_record_fields_are_little_endian() {
        let mut bytes = Vec::new();
        for v in [1_u16, 2, 3, 4, 5, 6] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&4000_u32.to_le_bytes());
        bytes.extend_from_slice(&[0x83, 9]);
        bytes.extend_from_slice(&300_u16.to_le_bytes());
        bytes.extend_from_slice(&400_u16.to_le_bytes());
        bytes.extend_from_slice(&0xdead_beef_u32.to_le_bytes());
        let mut r = Reader {
            bytes: &bytes,
            pos: 0,
        };
        let item = r.item().unwrap();
        assert_eq!(r.remaining(), 0);
        assert_eq!(item.bounds.x, 1);
        assert_eq!(item.bounds.z_end, 6);
        assert_eq!(item.next, None);
        assert_eq!(item.quadrant_flags, 0x83);
        assert_eq!(item.quadrant, 9);
        assert_eq!(
            item.sprite,
            SpriteRef {
                image_id: 0xdead_beef,
                x: 300,
                y: 400
            }
        );
    }
}
