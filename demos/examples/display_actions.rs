// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan, zoom and scroll drags through the standard behavior.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p ortho_demos --example display_actions`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::DVec3;
use kurbo::Point;
use ortho_display::{DisplayActionBroadcast, SliceViewport, ViewportSet};
use ortho_interaction::dispatcher::Dispatcher;
use ortho_interaction::event::{
    EventKind, InteractionEvent, Modifiers, MouseButtons, PointerPosition, RendererId,
};
use tracing_subscriber::EnvFilter;

const AXIAL: RendererId = RendererId(0);

fn pointer(x: f64, y: f64) -> PointerPosition {
    PointerPosition::new(Point::new(x, y), DVec3::new(x, y, 0.0))
}

/// Press, drag through `path`, release.
fn gesture(
    button: MouseButtons,
    modifiers: Modifiers,
    path: &[(f64, f64)],
) -> Vec<InteractionEvent> {
    let Some((&(x0, y0), rest)) = path.split_first() else {
        return Vec::new();
    };
    let mut events = vec![
        InteractionEvent::new(
            Some(AXIAL),
            EventKind::MousePress {
                button,
                position: pointer(x0, y0),
            },
        )
        .with_modifiers(modifiers),
    ];
    for &(x, y) in rest {
        events.push(
            InteractionEvent::new(Some(AXIAL), EventKind::MouseMove { position: pointer(x, y) })
                .with_buttons(button)
                .with_modifiers(modifiers),
        );
    }
    let &(x, y) = rest.last().unwrap_or(&(x0, y0));
    events.push(InteractionEvent::new(
        Some(AXIAL),
        EventKind::MouseRelease {
            button,
            position: pointer(x, y),
        },
    ));
    events
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let views: ViewportSet = SliceViewport::standard_triple(0, DVec3::ZERO, DVec3::ONE)
        .into_iter()
        .collect();
    let broadcast = Rc::new(RefCell::new(DisplayActionBroadcast::with_standard_behavior(views)));

    let mut props = HashMap::new();
    props.insert("zoomFactor".to_owned(), "10".to_owned());
    props.insert("pixelPerSlice".to_owned(), "5".to_owned());
    broadcast.borrow_mut().configure(&props);
    broadcast
        .borrow_mut()
        .subscribe(|e| println!("  -> {:?}", e.action));

    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.add_interactor(broadcast.clone());

    let pan: &[(f64, f64)] = &[(50.0, 50.0), (55.0, 50.0), (60.0, 45.0)];
    let zoom: &[(f64, f64)] = &[(50.0, 50.0), (50.0, 60.0), (50.0, 70.0), (50.0, 65.0)];
    let scroll: &[(f64, f64)] = &[(50.0, 50.0), (50.0, 48.0), (50.0, 30.0)];
    let gestures = [
        ("pan", MouseButtons::MIDDLE, Modifiers::empty(), pan),
        ("zoom", MouseButtons::RIGHT, Modifiers::empty(), zoom),
        ("scroll", MouseButtons::LEFT, Modifiers::CONTROL, scroll),
    ];
    for (name, button, modifiers, path) in gestures {
        println!("== {name} ==");
        for ev in gesture(button, modifiers, path) {
            dispatcher.process(&ev);
        }
        assert!(dispatcher.selected().is_empty());
    }
}
