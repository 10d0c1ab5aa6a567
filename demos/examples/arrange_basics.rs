// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arrange basics.
//!
//! Submit a few boxes into quadrant buckets, arrange them under every rotation, and print the
//! resulting paint order next to the submission order.
//!
//! Run:
//! - `RUST_LOG=paint_order=trace cargo run -p paint_order_demos --example arrange_basics`

use paint_order::{BoundBox, Frame, Rotation, overlap_mask};

fn main() {
    env_logger::init();

    // A wall segment, a crate leaning against it from the next quadrant, and a tree further on.
    let scene = [
        ("wall", BoundBox::new(0, 10, 0, 10, 20, 10), 0),
        ("crate", BoundBox::new(5, 0, 0, 15, 10, 10), 1),
        ("tree", BoundBox::new(20, 0, 0, 30, 10, 10), 2),
    ];
    println!(
        "overlap mask wall/crate: {:#08b}",
        overlap_mask(&scene[0].1, &scene[1].1)
    );
    println!(
        "submitted: {:?}",
        scene.iter().map(|(name, ..)| *name).collect::<Vec<_>>()
    );

    let mut frame = Frame::new(Rotation::R0);
    for rotation in Rotation::ALL {
        frame.clear();
        frame.set_rotation(rotation);
        for (name, bounds, quadrant) in scene {
            frame.submit(bounds, quadrant, name).unwrap();
        }
        let stats = frame.arrange().unwrap();
        let order: Vec<_> = frame.painted_items().map(|(_, item)| item.payload).collect();
        println!("{rotation:?}: {order:?} ({stats:?})");
    }
}
