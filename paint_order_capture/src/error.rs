// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capture errors.

use paint_order::ArrangeError;

/// Errors raised while reading, writing, or replaying a capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Reading the capture file failed.
    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),
    /// The compressed body could not be inflated.
    #[error("corrupt compressed capture: {0}")]
    Inflate(#[source] std::io::Error),
    /// The inflated body does not have the size recorded in the file header.
    #[error("capture inflated to {actual} bytes, header says {expected}")]
    SizeMismatch {
        /// Size recorded in the header.
        expected: u32,
        /// Bytes produced, read at most one past `expected`.
        actual: usize,
    },
    /// The payload ended in the middle of a field.
    #[error("capture truncated at byte {offset} while reading {what}")]
    Truncated {
        /// Byte offset of the field that could not be read.
        offset: usize,
        /// Field being read.
        what: &'static str,
    },
    /// A string field has no terminating NUL.
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString {
        /// Start of the string.
        offset: usize,
    },
    /// A string field is not UTF-8.
    #[error("string at byte {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// Start of the string.
        offset: usize,
    },
    /// The version string is not one this crate reads.
    #[error("unsupported capture version {0:?}")]
    Version(String),
    /// A string to be written contains a NUL byte.
    #[error("string {0:?} contains a NUL byte")]
    NulInString(String),
    /// More sessions than the 32-bit session count can record.
    #[error("{0} sessions do not fit the session count field")]
    TooManySessions(usize),
    /// An encoded payload is larger than the 32-bit size header allows.
    #[error("payload of {0} bytes does not fit the size header")]
    PayloadTooLarge(usize),
    /// Back or front index does not fit a quadrant index.
    #[error("quadrant range {back}..={front} does not fit 16-bit quadrant indices")]
    RangeOverflow {
        /// Recorded back index.
        back: u32,
        /// Recorded front index.
        front: u32,
    },
    /// A frame is larger than the fixed session layout.
    #[error("frame with {items} items over {quadrants} quadrants does not fit a session")]
    DoesNotFit {
        /// Items in the frame.
        items: usize,
        /// Quadrants needed.
        quadrants: usize,
    },
    /// A coordinate does not fit the 16-bit recorded bounds.
    #[error("coordinate {0} does not fit a recorded bounding box")]
    CoordinateOutOfRange(i32),
    /// Only unarranged frames can be recorded.
    #[error("frame was already arranged and no longer holds its buckets")]
    AlreadyArranged,
    /// The recorded buckets do not form a valid frame.
    #[error("invalid recorded frame: {0}")]
    Frame(#[from] ArrangeError),
}
