// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replay a capture.
//!
//! Loads a compressed capture file, arranges every session with both resolvers, and prints
//! the two paint orders as image ids. Exits with an error if any session diverges.
//!
//! Run:
//! - `cargo run -p paint_order_demos --example replay_capture -- path/to/capture.bin [rotation]`

use std::process::ExitCode;

use paint_order::{Frame, ItemId, Rotation, verify};
use paint_order_capture::SpriteRef;

fn join(frame: &Frame<SpriteRef>, order: &[ItemId]) -> String {
    order
        .iter()
        .filter_map(|&id| frame.item(id))
        .map(|item| format!("{};", item.payload.image_id))
        .collect()
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: replay_capture <capture> [rotation 0-3]");
        return ExitCode::FAILURE;
    };
    let rotation = match args.next().map(|r| r.parse::<u8>()) {
        None => Rotation::R0,
        Some(Ok(r)) => match Rotation::try_from(r) {
            Ok(rotation) => rotation,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
        Some(Err(err)) => {
            eprintln!("invalid rotation: {err}");
            return ExitCode::FAILURE;
        }
    };

    let capture = match paint_order_capture::load(&path) {
        Ok(capture) => capture,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("Park {} has {} sessions", capture.park, capture.sessions.len());

    let mut diverged = 0;
    for (i, frame) in capture.frames(rotation).enumerate() {
        let (check, frame) = match frame.and_then(|f| Ok((verify::cross_check(&f)?, f))) {
            Ok(pair) => pair,
            Err(err) => {
                log::warn!("session {i}: {err}");
                continue;
            }
        };
        println!("session {i}");
        println!("r1: {}", join(&frame, &check.cached));
        println!("r2: {}", join(&frame, &check.uncached));
        if let Some(at) = check.first_divergence() {
            println!("error: orders differ at position {at}");
            diverged += 1;
        }
    }

    if diverged > 0 {
        eprintln!("{diverged} sessions diverged");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
