// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Jurisdiction arbitration with two competing interactors and a listener.
//!
//! A measurement tool claims presses with a high score but only accepts every other
//! one; a fallback accepts everything. The listener sees every event exactly once.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p ortho_demos --example dispatch_basics`

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec3;
use kurbo::Point;
use ortho_interaction::dispatcher::{Dispatcher, Interactor, Listener};
use ortho_interaction::event::{
    EventKind, InteractionEvent, MouseButtons, PointerPosition, RendererId,
};
use tracing_subscriber::EnvFilter;

struct Tool {
    name: &'static str,
    score: f32,
    accept_every: u32,
    seen: u32,
}

impl Interactor for Tool {
    fn jurisdiction(&self, _event: &InteractionEvent) -> f32 {
        self.score
    }

    fn handle_event(&mut self, _event: &InteractionEvent) -> bool {
        self.seen += 1;
        let accepted = self.seen % self.accept_every == 0;
        println!("  {} asked (#{}) -> {}", self.name, self.seen, accepted);
        accepted
    }
}

struct Log;

impl Listener for Log {
    fn notify(&mut self, event: &InteractionEvent, handled: bool) {
        println!("  listener: {:?} handled={handled}", event.kind);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let measure = Rc::new(RefCell::new(Tool {
        name: "measure",
        score: 0.9,
        accept_every: 2,
        seen: 0,
    }));
    let fallback = Rc::new(RefCell::new(Tool {
        name: "fallback",
        score: 0.1,
        accept_every: 1,
        seen: 0,
    }));

    let mut dispatcher: Dispatcher = Dispatcher::new();
    dispatcher.add_interactor(fallback.clone());
    dispatcher.add_interactor(measure.clone());
    dispatcher.add_listener(Rc::new(RefCell::new(Log)));

    for i in 0..3 {
        let x = f64::from(i) * 10.0;
        let ev = InteractionEvent::new(
            Some(RendererId(0)),
            EventKind::MousePress {
                button: MouseButtons::LEFT,
                position: PointerPosition::new(Point::new(x, 0.0), DVec3::new(x, 0.0, 0.0)),
            },
        );
        println!("== Event {i} ==");
        let handled = dispatcher.process(&ev);
        println!("  handled: {handled}");
    }

    assert_eq!(measure.borrow().seen, 3);
    assert_eq!(fallback.borrow().seen, 2);
}
