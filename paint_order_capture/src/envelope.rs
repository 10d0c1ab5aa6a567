// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compressed file envelope: a little-endian `u32` payload size followed by a zlib stream.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::decode::decode;
use crate::encode::encode;
use crate::error::CaptureError;
use crate::types::Capture;

/// Inflate a capture file into its payload.
///
/// The inflated length must match the size header exactly.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, CaptureError> {
    let (header, body) = bytes.split_first_chunk::<4>().ok_or(CaptureError::Truncated {
        offset: 0,
        what: "size header",
    })?;
    let expected = u32::from_le_bytes(*header);
    let mut payload = Vec::new();
    // One byte past the header size is enough to tell an oversized body apart.
    ZlibDecoder::new(body)
        .take(u64::from(expected) + 1)
        .read_to_end(&mut payload)
        .map_err(CaptureError::Inflate)?;
    if payload.len() != expected as usize {
        return Err(CaptureError::SizeMismatch {
            expected,
            actual: payload.len(),
        });
    }
    log::debug!("inflated {} bytes into {expected}", body.len());
    Ok(payload)
}

/// Wrap a payload in the compressed file envelope.
pub fn compress(payload: &[u8]) -> Result<Vec<u8>, CaptureError> {
    let size =
        u32::try_from(payload.len()).map_err(|_| CaptureError::PayloadTooLarge(payload.len()))?;
    let mut out = size.to_le_bytes().to_vec();
    let mut encoder = ZlibEncoder::new(&mut out, Compression::default());
    encoder.write_all(payload)?;
    encoder.finish()?;
    Ok(out)
}

/// Decode a compressed capture file.
pub fn decode_compressed(bytes: &[u8]) -> Result<Capture, CaptureError> {
    decode(&decompress(bytes)?)
}

/// Encode a capture into the compressed file format.
pub fn encode_compressed(capture: &Capture) -> Result<Vec<u8>, CaptureError> {
    compress(&encode(capture)?)
}
