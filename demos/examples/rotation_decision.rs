// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where a shift-press rotates and where a ctrl+shift-press swivels.
//!
//! Prints a coarse map of the axial view around the crossing point of three
//! orthogonal planes. `R` marks positions that grab a crossing line for rotation, `S`
//! positions that can swivel, `B` both, `.` neither.
//!
//! Run:
//! - `cargo run -p ortho_demos --example rotation_decision`

use glam::DVec3;
use kurbo::Point;
use ortho_display::{
    ConditionId, DisplayActionBroadcast, ROTATION_GRAB_DISTANCE, SliceViewport, ViewportSet,
};
use ortho_interaction::event::{
    EventKind, InteractionEvent, Modifiers, MouseButtons, PointerPosition, RendererId,
};

fn main() {
    let views: ViewportSet = SliceViewport::standard_triple(0, DVec3::ZERO, DVec3::ONE)
        .into_iter()
        .collect();
    let mut broadcast = DisplayActionBroadcast::with_standard_behavior(views);

    println!("grab distance: {ROTATION_GRAB_DISTANCE}");
    for row in -6..=6 {
        let y = f64::from(row) * 4.0;
        let line: String = (-10..=10)
            .map(|col| {
                let x = f64::from(col) * 4.0;
                let ev = InteractionEvent::new(
                    Some(RendererId(0)),
                    EventKind::MousePress {
                        button: MouseButtons::LEFT,
                        position: PointerPosition::new(Point::new(x, y), DVec3::new(x, y, 0.0)),
                    },
                )
                .with_modifiers(Modifiers::SHIFT);
                let rotate = broadcast.check_condition(ConditionId::CheckCanRotate, &ev);
                let swivel = broadcast.check_condition(ConditionId::CheckCanSwivel, &ev);
                match (rotate, swivel) {
                    (true, true) => 'B',
                    (true, false) => 'R',
                    (false, true) => 'S',
                    (false, false) => '.',
                }
            })
            .collect();
        println!("{line}");
    }
    println!("last center of rotation: {:?}", broadcast.gesture().center_of_rotation);
}
