// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=ortho_interaction --heading-base-level=0

//! Ortho Interaction: deterministic event dispatch for slice-viewer interactors.
//!
//! ## Overview
//!
//! A slice viewer has several independent interactors (crosshair navigation, measurement
//! tools, segmentation brushes) competing for the same stream of mouse and keyboard
//! events. This crate decides who gets each event, in a reproducible order, and lets
//! passive listeners observe every event afterwards.
//!
//! ## Arbitration
//!
//! [`Dispatcher::dispatch`](crate::dispatcher::Dispatcher::dispatch) offers an event:
//!
//! 1) to every *selected* interactor (one that is mid-gesture), in selection order;
//! 2) if none handles it, to candidates ranked by their reported jurisdiction, highest
//!    first, in a map rebuilt for this event;
//! 3) after dispatch, [`process`](crate::dispatcher::Dispatcher::process) notifies each
//!    listener exactly once with the handled flag.
//!
//! Resuming a walk where an earlier unsuccessful event stopped only happens when callers
//! drive [`ask_current_interactor`](crate::dispatcher::Dispatcher::ask_current_interactor)
//! themselves; `dispatch` always starts from the top of a fresh map.
//!
//! Scores are compared with a threshold of `0.0`; only strictly greater scores are asked.
//! Equal scores keep registration order. See [`jurisdiction`] for the ranking details.
//!
//! ## Selection
//!
//! Interactors never call back into the dispatcher. After each `handle_event`, the
//! dispatcher reads [`Interactor::mode`](crate::dispatcher::Interactor::mode) and adds the
//! interactor to, or removes it from, the selected set accordingly.
//!
//! ## Behaviors
//!
//! [`state_machine`] provides transition tables keyed by [`EventPattern`](crate::event::EventPattern)s,
//! guarded by named conditions and running named actions. They can be built in code or
//! loaded from a serde description.
//!
//! ## Focus
//!
//! [`focus::FocusManager`] tracks which registered element has input focus. The dispatcher
//! owns one and forwards its operations.
//!
//! This crate requires `std`. Interactors and listeners are shared as `Rc<RefCell<_>>`
//! handles, so there is no `no_std`/`libm` feature split.

pub mod dispatcher;
pub mod event;
pub mod focus;
pub mod jurisdiction;
pub mod state_machine;
