// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint Order Capture: recorded paint sessions for replaying through [`paint_order`].
//!
//! A capture holds a park name and a list of sessions. Each session is one frame as the engine
//! left it just before ordering: a fixed arena of 4000 item slots linked into 512 quadrant
//! buckets, plus the occupied quadrant range. Replaying a session rebuilds the
//! [`Frame`](paint_order::Frame) so both resolvers can be run over real scenes.
//!
//! - A capture file is a `u32` payload size followed by the zlib-compressed payload. [`load`]
//!   reads one from disk, [`decode_compressed`] and [`encode_compressed`] work on bytes.
//! - [`decode`] and [`encode`] handle the uncompressed little-endian payload itself, and
//!   [`CapturedSession::from_frame`] records a filled frame.
//! - [`Capture::frames`] rebuilds every session with a chosen rotation. Captures do not record
//!   the camera rotation.
//!
//! ```rust
//! use paint_order::{BoundBox, Frame, Rotation};
//! use paint_order_capture::{Capture, CapturedSession, SpriteRef, decode_compressed, encode_compressed};
//!
//! let mut frame = Frame::new(Rotation::R0);
//! frame.submit(BoundBox::new(0, 10, 0, 10, 20, 10), 0, SpriteRef::default()).unwrap();
//! let capture = Capture {
//!     park: "Crazy Castle".into(),
//!     sessions: vec![CapturedSession::from_frame(&frame).unwrap()],
//! };
//!
//! let bytes = encode_compressed(&capture).unwrap();
//! let replayed = decode_compressed(&bytes).unwrap();
//! let mut frame = replayed.sessions[0].to_frame(Rotation::R0).unwrap();
//! frame.arrange().unwrap();
//! assert_eq!(frame.paint_order().count(), 1);
//! ```

mod decode;
mod encode;
mod envelope;
pub mod error;
pub mod types;

use std::path::Path;

pub use decode::decode;
pub use encode::encode;
pub use envelope::{compress, decode_compressed, decompress, encode_compressed};
pub use error::CaptureError;
pub use types::{
    Capture, CapturedBounds, CapturedItem, CapturedSession, EMPTY_BACK, ITEM_SLOTS,
    QUADRANT_SLOTS, SpriteRef, VERSION,
};

/// Read and decode a compressed capture file.
pub fn load(path: impl AsRef<Path>) -> Result<Capture, CaptureError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    decode_compressed(&bytes)
}

/// Read and decode a file holding a bare, already inflated payload.
pub fn load_uncompressed(path: impl AsRef<Path>) -> Result<Capture, CaptureError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    decode(&bytes)
}
