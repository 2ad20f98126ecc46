// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load a custom behavior from a JSON description.
//!
//! Here the wheel zooms instead of scrolling, and the arrow keys scroll.
//!
//! Run:
//! - `cargo run -p ortho_demos --example behavior_from_json`

use glam::DVec3;
use kurbo::Point;
use ortho_display::{DisplayActionBroadcast, DisplayBehavior, SliceViewport, ViewportSet};
use ortho_interaction::dispatcher::Interactor;
use ortho_interaction::event::{EventKind, InteractionEvent, Key, PointerPosition, RendererId};
use ortho_interaction::state_machine::BehaviorDescription;

const BEHAVIOR: &str = r#"{
    "start": "idle",
    "states": [
        { "name": "idle", "transitions": [
            { "event": { "class": "key_press", "key": "Up" },
              "target": "idle", "actions": ["ScrollOneUp"] },
            { "event": { "class": "key_press", "key": "Down" },
              "target": "idle", "actions": ["ScrollOneDown"] },
            { "event": { "class": "mouse_wheel" },
              "condition": "check_position_event",
              "target": "idle", "actions": ["init", "zoom"] }
        ] }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let desc: BehaviorDescription = serde_json::from_str(BEHAVIOR)?;
    let behavior = DisplayBehavior::from_description(&desc)?;

    let views: ViewportSet = SliceViewport::standard_triple(0, DVec3::ZERO, DVec3::ONE)
        .into_iter()
        .collect();
    let mut broadcast = DisplayActionBroadcast::new(views, behavior);
    broadcast.subscribe(|e| println!("{:?}", e.action));

    let sender = Some(RendererId(0));
    for key in [Key::Up, Key::Down, Key::Left] {
        let ev = InteractionEvent::new(sender, EventKind::KeyPress { key });
        let handled = broadcast.handle_event(&ev);
        println!("{key:?}: handled={handled}");
    }
    let wheel = InteractionEvent::new(
        sender,
        EventKind::MouseWheel {
            delta: 1,
            position: PointerPosition::new(Point::new(10.0, 10.0), DVec3::new(10.0, 10.0, 0.0)),
        },
    );
    broadcast.handle_event(&wheel);
    Ok(())
}
