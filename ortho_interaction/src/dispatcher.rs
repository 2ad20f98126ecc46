// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher implementation.
//!
//! ## Overview
//!
//! Owns the registries of interactors and listeners for one viewer session and decides
//! which interactor consumes each event.
//!
//! ## Arbitration
//!
//! - Selected interactors (those engaged in a gesture) are asked first, all of them,
//!   over a snapshot of the selected set. If any accepts, arbitration stops there.
//! - Otherwise the [`JurisdictionMap`] is rebuilt from every registered interactor's
//!   [`Interactor::jurisdiction`] with threshold `0`, and candidates are asked from the
//!   highest score down until one accepts.
//! - If the walk reaches the end, the cursor rewinds to the first candidate.
//!
//! ## Selection
//!
//! After asking an interactor, the dispatcher reads its [`Interactor::mode`]:
//! [`InteractorMode::Selected`] enters the selected set and
//! [`InteractorMode::Deselected`] leaves it. Interactors never call back into the
//! dispatcher.
//!
//! ## Listeners
//!
//! Listeners see every event, handled or not, through [`Dispatcher::notify_listeners`].
//! [`Dispatcher::process`] runs arbitration and then informs listeners.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::event::{InteractionEvent, RendererId};
use crate::focus::FocusManager;
use crate::jurisdiction::JurisdictionMap;

/// Whether an interactor is engaged in an ongoing gesture.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum InteractorMode {
    /// Idle; competes through jurisdiction.
    #[default]
    Deselected,
    /// Engaged; asked before any jurisdiction ranking.
    Selected,
}

/// An object that can consume interaction events.
pub trait Interactor {
    /// Relevance of `event` to this interactor. Only values above the threshold
    /// make it a candidate.
    fn jurisdiction(&self, event: &InteractionEvent) -> f32;

    /// Try to handle `event`. Returns whether it was consumed.
    fn handle_event(&mut self, event: &InteractionEvent) -> bool;

    /// Current selection mode.
    fn mode(&self) -> InteractorMode {
        InteractorMode::Deselected
    }
}

/// An object that passively observes every dispatched event.
pub trait Listener {
    /// Observe `event`; `handled` reports whether an interactor consumed it.
    fn notify(&mut self, event: &InteractionEvent, handled: bool);
}

/// Shared handle to an interactor. Identity is pointer identity.
pub type SharedInteractor = Rc<RefCell<dyn Interactor>>;

/// Shared handle to a listener. Identity is pointer identity.
pub type SharedListener = Rc<RefCell<dyn Listener>>;

/// Actions of the dispatcher's own top-level state machine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GlobalAction {
    /// Do nothing.
    DoNothing,
    /// Inform every listener of the event.
    InformListeners,
    /// Run interactor arbitration for the event.
    AskInteractors,
}

/// Event dispatcher for one viewer session.
///
/// ## Usage
///
/// - Construct one per session with [`Dispatcher::new`] and hand it to whatever owns
///   the event source.
/// - Register interactors with [`Dispatcher::add_interactor`] and observers with
///   [`Dispatcher::add_listener`]; handles are shared, the dispatcher does not own the
///   objects behind them.
/// - Call [`Dispatcher::process`] for each input event.
///
/// `F` is the key type of the focus registry.
pub struct Dispatcher<F: Copy + Eq = RendererId> {
    interactors: Vec<SharedInteractor>,
    listeners: Vec<SharedListener>,
    selected: Vec<SharedInteractor>,
    jurisdiction: JurisdictionMap<SharedInteractor>,
    focus: FocusManager<F>,
}

impl<F: Copy + Eq + Debug> Debug for Dispatcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("interactors", &self.interactors.len())
            .field("listeners", &self.listeners.len())
            .field("selected", &self.selected.len())
            .field("candidates", &self.jurisdiction.len())
            .field("cursor", &self.jurisdiction.cursor())
            .field("focus", &self.focus)
            .finish()
    }
}

impl<F: Copy + Eq> Default for Dispatcher<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Copy + Eq> Dispatcher<F> {
    /// Create a dispatcher with empty registries.
    pub const fn new() -> Self {
        Self {
            interactors: Vec::new(),
            listeners: Vec::new(),
            selected: Vec::new(),
            jurisdiction: JurisdictionMap::new(),
            focus: FocusManager::new(),
        }
    }

    /// Register an interactor. Returns `false` if it was already registered.
    ///
    /// An interactor that is already [`InteractorMode::Selected`] also enters the selected set.
    pub fn add_interactor(&mut self, interactor: SharedInteractor) -> bool {
        if self.is_interactor_registered(&interactor) {
            return false;
        }
        let selected = interactor
            .try_borrow()
            .map(|i| i.mode() == InteractorMode::Selected)
            .unwrap_or(false);
        if selected {
            self.add_to_selected(interactor.clone());
        }
        self.interactors.push(interactor);
        true
    }

    /// Unregister an interactor. Returns `false` if it was not registered.
    ///
    /// The interactor also leaves the selected set and the jurisdiction map.
    pub fn remove_interactor(&mut self, interactor: &SharedInteractor) -> bool {
        let Some(i) = self
            .interactors
            .iter()
            .position(|h| Rc::ptr_eq(h, interactor))
        else {
            return false;
        };
        self.interactors.remove(i);
        self.remove_from_selected(interactor);
        self.jurisdiction.remove_first(|h| Rc::ptr_eq(h, interactor));
        true
    }

    /// Whether `interactor` is registered.
    pub fn is_interactor_registered(&self, interactor: &SharedInteractor) -> bool {
        self.interactors.iter().any(|h| Rc::ptr_eq(h, interactor))
    }

    /// Registered interactors in registration order.
    pub fn interactors(&self) -> &[SharedInteractor] {
        &self.interactors
    }

    /// Register a listener. Returns `false` if it was already registered.
    pub fn add_listener(&mut self, listener: SharedListener) -> bool {
        if self.is_listener_registered(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, listener: &SharedListener) -> bool {
        let Some(i) = self.listeners.iter().position(|l| Rc::ptr_eq(l, listener)) else {
            return false;
        };
        self.listeners.remove(i);
        true
    }

    /// Whether `listener` is registered.
    pub fn is_listener_registered(&self, listener: &SharedListener) -> bool {
        self.listeners.iter().any(|l| Rc::ptr_eq(l, listener))
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Add an interactor to the selected set. Returns `false` if it was already there.
    pub fn add_to_selected(&mut self, interactor: SharedInteractor) -> bool {
        if self.selected.iter().any(|h| Rc::ptr_eq(h, &interactor)) {
            return false;
        }
        debug!(selected = self.selected.len() + 1, "interactor selected");
        self.selected.push(interactor);
        true
    }

    /// Remove an interactor from the selected set. Returns `false` if it was not there.
    pub fn remove_from_selected(&mut self, interactor: &SharedInteractor) -> bool {
        let Some(i) = self.selected.iter().position(|h| Rc::ptr_eq(h, interactor)) else {
            return false;
        };
        self.selected.remove(i);
        debug!(selected = self.selected.len(), "interactor deselected");
        true
    }

    /// Interactors currently engaged in a gesture.
    pub fn selected(&self) -> &[SharedInteractor] {
        &self.selected
    }

    /// The ranking built by the last [`fill_jurisdiction_map`](Self::fill_jurisdiction_map).
    pub fn jurisdiction_map(&self) -> &JurisdictionMap<SharedInteractor> {
        &self.jurisdiction
    }

    /// Ask every selected interactor to handle `event`.
    ///
    /// Iterates a snapshot so selection changes during the walk are safe. Returns
    /// whether at least one accepted.
    pub fn ask_selected(&mut self, event: &InteractionEvent) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        let snapshot = self.selected.clone();
        let mut handled = false;
        for interactor in &snapshot {
            handled |= self.ask(interactor, event);
        }
        handled
    }

    /// Rebuild the jurisdiction map from every registered interactor.
    ///
    /// Interactors scoring at or below `threshold` are left out. The cursor is reset to
    /// the first candidate.
    pub fn fill_jurisdiction_map(&mut self, event: &InteractionEvent, threshold: f32) {
        let scored: Vec<(f32, SharedInteractor)> = self
            .interactors
            .iter()
            .filter_map(|h| match h.try_borrow() {
                Ok(i) => Some((i.jurisdiction(event), h.clone())),
                Err(_) => {
                    warn!("interactor busy while computing jurisdiction; skipped");
                    None
                }
            })
            .collect();
        self.jurisdiction.rebuild(scored, threshold);
        trace!(
            candidates = self.jurisdiction.len(),
            threshold, "jurisdiction map rebuilt"
        );
    }

    /// Walk the jurisdiction map from the cursor until a candidate accepts `event`.
    ///
    /// The cursor stays on the accepting candidate. If none accepts, the cursor
    /// rewinds to the first candidate.
    pub fn ask_current_interactor(&mut self, event: &InteractionEvent) -> bool {
        if self.jurisdiction.is_empty() {
            return false;
        }
        let mut handled = false;
        while !handled {
            let Some(candidate) = self.jurisdiction.current() else {
                break;
            };
            let interactor = candidate.item.clone();
            trace!(
                score = candidate.score,
                cursor = self.jurisdiction.cursor(),
                "asking candidate"
            );
            handled = self.ask(&interactor, event);
            if !handled {
                self.jurisdiction.advance();
            }
        }
        if self.jurisdiction.is_at_end() {
            self.jurisdiction.rewind();
        }
        handled
    }

    /// Offer `event` to the interactors. Returns whether one consumed it.
    pub fn dispatch(&mut self, event: &InteractionEvent) -> bool {
        if self.ask_selected(event) {
            trace!("event taken by a selected interactor");
            return true;
        }
        self.fill_jurisdiction_map(event, 0.0);
        self.ask_current_interactor(event)
    }

    /// Inform every listener of `event`.
    pub fn notify_listeners(&mut self, event: &InteractionEvent, handled: bool) {
        for listener in &self.listeners {
            match listener.try_borrow_mut() {
                Ok(mut l) => l.notify(event, handled),
                Err(_) => warn!("listener busy; notification dropped"),
            }
        }
    }

    /// Dispatch `event` and then inform every listener of the outcome.
    pub fn process(&mut self, event: &InteractionEvent) -> bool {
        let handled = self.dispatch(event);
        self.notify_listeners(event, handled);
        handled
    }

    /// Execute one of the dispatcher's own actions. Always reports success.
    pub fn execute_action(&mut self, action: GlobalAction, event: &InteractionEvent) -> bool {
        match action {
            GlobalAction::DoNothing => {}
            GlobalAction::InformListeners => self.notify_listeners(event, false),
            GlobalAction::AskInteractors => {
                self.dispatch(event);
            }
        }
        true
    }

    /// Register a focus-capable element. Returns `false` if already present.
    pub fn add_focus_element(&mut self, element: F) -> bool {
        self.focus.add_element(element)
    }

    /// Unregister a focus-capable element. Returns `false` if absent.
    pub fn remove_focus_element(&mut self, element: F) -> bool {
        self.focus.remove_element(element)
    }

    /// Focus `element`. Returns `false` if it is not registered.
    pub fn set_focus(&mut self, element: F) -> bool {
        self.focus.set_focused(element)
    }

    /// The focused element, if any.
    pub fn focus(&self) -> Option<F> {
        self.focus.focused()
    }

    /// The focus registry.
    pub fn focus_manager(&self) -> &FocusManager<F> {
        &self.focus
    }

    /// The focus registry, mutably.
    pub fn focus_manager_mut(&mut self) -> &mut FocusManager<F> {
        &mut self.focus
    }

    fn ask(&mut self, interactor: &SharedInteractor, event: &InteractionEvent) -> bool {
        let (handled, mode) = match interactor.try_borrow_mut() {
            Ok(mut i) => {
                let handled = i.handle_event(event);
                (handled, i.mode())
            }
            Err(_) => {
                warn!("interactor busy; treated as rejecting the event");
                return false;
            }
        };
        match mode {
            InteractorMode::Selected => {
                self.add_to_selected(interactor.clone());
            }
            InteractorMode::Deselected => {
                self.remove_from_selected(interactor);
            }
        }
        handled
    }
}
