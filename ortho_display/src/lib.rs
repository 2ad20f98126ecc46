// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=ortho_display --heading-base-level=0

//! Ortho Display: display actions for multi-planar slice viewers.
//!
//! ## Overview
//!
//! [`DisplayActionBroadcast`] is an interactor that turns pointer and key input into
//! viewport transformations: pan, zoom, slice scrolling and crosshair placement. It also
//! decides, at the start of a drag, whether the pointer grabbed a plane crossing line
//! (rotation) or is far enough from the three-plane crossing point to swivel.
//!
//! The broadcast does not change any viewport itself. It emits [`DisplayActionEvent`]s to
//! its subscribers and records rotation geometry in [`GestureState`] for whoever applies
//! the transforms.
//!
//! ## Wiring
//!
//! - Render targets come from a [`RenderingManager`]. [`ViewportSet`] is a plain-data
//!   implementation.
//! - Which action runs for which input is a [`DisplayBehavior`]; [`standard_behavior`] is
//!   the default mapping. Behaviors loaded from a description refer to conditions and
//!   actions by the names of [`ConditionId`] and [`ActionId`].
//! - Options come from any [`PropertySource`]; see [`config`] for the recognized keys.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use glam::DVec3;
//! use kurbo::Point;
//! use ortho_display::{DisplayAction, DisplayActionBroadcast, SliceViewport, ViewportSet};
//! use ortho_interaction::dispatcher::Dispatcher;
//! use ortho_interaction::event::{
//!     EventKind, InteractionEvent, MouseButtons, PointerPosition, RendererId,
//! };
//!
//! let views: ViewportSet = SliceViewport::standard_triple(0, DVec3::ZERO, DVec3::ONE)
//!     .into_iter()
//!     .collect();
//! let broadcast = Rc::new(RefCell::new(DisplayActionBroadcast::with_standard_behavior(views)));
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! broadcast
//!     .borrow_mut()
//!     .subscribe(move |e| sink.borrow_mut().push(e.action));
//!
//! let mut dispatcher: Dispatcher = Dispatcher::new();
//! dispatcher.add_interactor(broadcast.clone());
//!
//! let click = InteractionEvent::new(
//!     Some(RendererId(0)),
//!     EventKind::MousePress {
//!         button: MouseButtons::LEFT,
//!         position: PointerPosition::new(Point::new(4.0, 2.0), DVec3::new(4.0, 2.0, 0.0)),
//!     },
//! );
//! assert!(dispatcher.process(&click));
//! assert_eq!(
//!     seen.borrow().as_slice(),
//!     &[DisplayAction::SetCrosshair(DVec3::new(4.0, 2.0, 0.0))]
//! );
//! // The left button is down, so the broadcast stays selected until release.
//! assert_eq!(dispatcher.selected().len(), 1);
//! ```
//!
//! This crate requires `std`, like [`ortho_interaction`], whose `Rc<RefCell<_>>`
//! handles it plugs into.

mod action;
mod behavior;
mod broadcast;
pub mod config;
mod viewport;

pub use action::{ActionId, ConditionId, DisplayAction, DisplayActionEvent, UnknownName};
pub use behavior::{DisplayBehavior, standard_behavior};
pub use broadcast::{
    DisplayActionBroadcast, GestureState, ROTATION_GRAB_DISTANCE, SWIVEL_GRAB_DISTANCE,
    SubscriptionId,
};
pub use config::{ConfigError, DisplayActionConfig, DragAxis, PropertySource};
pub use viewport::{
    ControllerId, MapperKind, Renderer, RenderingManager, SliceViewport, ViewDirection,
    ViewportSet,
};
