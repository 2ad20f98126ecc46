// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction events and the patterns that match them.
//!
//! ## Overview
//!
//! An [`InteractionEvent`] is what the event source (a viewport's window) hands to the
//! [`Dispatcher`](crate::dispatcher::Dispatcher). It carries the identity of the sending
//! render target, an [`EventKind`] with the pointer position where applicable, and the
//! button/modifier state at the time of the event.
//!
//! [`EventPattern`] is the matching side used by
//! [behavior transition tables](crate::state_machine::Behavior).

use glam::DVec3;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Opaque identity of a render target (the sender of an event).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RendererId(pub u32);

bitflags::bitflags! {
    /// Mouse buttons.
    ///
    /// Used both for the button that changed in a press/release and for the set of
    /// buttons held during an event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MouseButtons: u8 {
        /// Primary button.
        const LEFT   = 0b0000_0001;
        /// Middle button or wheel click.
        const MIDDLE = 0b0000_0010;
        /// Secondary button.
        const RIGHT  = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// Keyboard modifiers held during an event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT   = 0b0000_0001;
        /// Control key.
        const CONTROL = 0b0000_0010;
        /// Alt key.
        const ALT     = 0b0000_0100;
    }
}

/// Keys the interaction layer distinguishes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Escape.
    Escape,
    /// A printable character.
    Char(char),
}

/// Where the pointer is, on screen and in the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerPosition {
    /// Display coordinate in the sender's window.
    pub screen: Point,
    /// The picked world coordinate on the sender's current plane.
    pub world: DVec3,
}

impl PointerPosition {
    /// Create a pointer position.
    pub const fn new(screen: Point, world: DVec3) -> Self {
        Self { screen, world }
    }
}

/// What happened.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EventKind {
    /// A mouse button went down.
    MousePress {
        /// The button that changed.
        button: MouseButtons,
        /// Pointer location.
        position: PointerPosition,
    },
    /// The pointer moved.
    MouseMove {
        /// Pointer location.
        position: PointerPosition,
    },
    /// A mouse button went up.
    MouseRelease {
        /// The button that changed.
        button: MouseButtons,
        /// Pointer location.
        position: PointerPosition,
    },
    /// The wheel turned; positive is away from the user.
    MouseWheel {
        /// Wheel steps.
        delta: i32,
        /// Pointer location.
        position: PointerPosition,
    },
    /// A key went down.
    KeyPress {
        /// The key.
        key: Key,
    },
    /// An application-defined event without position.
    User(u32),
}

/// Discriminant of [`EventKind`], used for matching.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventClass {
    /// [`EventKind::MousePress`].
    MousePress,
    /// [`EventKind::MouseMove`].
    MouseMove,
    /// [`EventKind::MouseRelease`].
    MouseRelease,
    /// [`EventKind::MouseWheel`].
    MouseWheel,
    /// [`EventKind::KeyPress`].
    KeyPress,
    /// [`EventKind::User`].
    User,
}

/// A single interaction event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InteractionEvent {
    /// The render target the event originated from, if known.
    pub sender: Option<RendererId>,
    /// What happened.
    pub kind: EventKind,
    /// Buttons held while the event occurred.
    pub buttons: MouseButtons,
    /// Modifiers held while the event occurred.
    pub modifiers: Modifiers,
}

impl InteractionEvent {
    /// Create an event with no buttons or modifiers held.
    pub const fn new(sender: Option<RendererId>, kind: EventKind) -> Self {
        Self {
            sender,
            kind,
            buttons: MouseButtons::empty(),
            modifiers: Modifiers::empty(),
        }
    }

    /// Set the held buttons.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: MouseButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the held modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The pointer position, for position-carrying events.
    pub fn position(&self) -> Option<&PointerPosition> {
        match &self.kind {
            EventKind::MousePress { position, .. }
            | EventKind::MouseMove { position }
            | EventKind::MouseRelease { position, .. }
            | EventKind::MouseWheel { position, .. } => Some(position),
            EventKind::KeyPress { .. } | EventKind::User(_) => None,
        }
    }

    /// The discriminant of [`Self::kind`].
    pub fn class(&self) -> EventClass {
        match self.kind {
            EventKind::MousePress { .. } => EventClass::MousePress,
            EventKind::MouseMove { .. } => EventClass::MouseMove,
            EventKind::MouseRelease { .. } => EventClass::MouseRelease,
            EventKind::MouseWheel { .. } => EventClass::MouseWheel,
            EventKind::KeyPress { .. } => EventClass::KeyPress,
            EventKind::User(_) => EventClass::User,
        }
    }
}

/// Wheel direction for [`EventPattern::wheel`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelDirection {
    /// Positive delta.
    Up,
    /// Negative delta.
    Down,
}

/// Matches events by class and optional details.
///
/// - `button`: for press/release, the changed button must equal it; for other
///   classes, the held buttons must contain it. Empty matches any.
/// - `modifiers`: must equal the held modifiers exactly. `None` matches any.
/// - `wheel`: sign of the wheel delta. `None` matches any.
/// - `key`: the pressed key. `None` matches any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPattern {
    /// Event class.
    pub class: EventClass,
    /// Button constraint.
    #[serde(default)]
    pub button: MouseButtons,
    /// Modifier constraint.
    #[serde(default)]
    pub modifiers: Option<Modifiers>,
    /// Wheel direction constraint.
    #[serde(default)]
    pub wheel: Option<WheelDirection>,
    /// Key constraint.
    #[serde(default)]
    pub key: Option<Key>,
}

impl EventPattern {
    /// Match every event of `class`.
    pub const fn new(class: EventClass) -> Self {
        Self {
            class,
            button: MouseButtons::empty(),
            modifiers: None,
            wheel: None,
            key: None,
        }
    }

    /// Require a button.
    #[must_use]
    pub const fn button(mut self, button: MouseButtons) -> Self {
        self.button = button;
        self
    }

    /// Require an exact modifier set.
    #[must_use]
    pub const fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    /// Require a wheel direction.
    #[must_use]
    pub const fn wheel(mut self, direction: WheelDirection) -> Self {
        self.wheel = Some(direction);
        self
    }

    /// Require a key.
    #[must_use]
    pub const fn key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }

    /// Whether `event` satisfies this pattern.
    pub fn matches(&self, event: &InteractionEvent) -> bool {
        if event.class() != self.class {
            return false;
        }
        if let Some(m) = self.modifiers
            && m != event.modifiers
        {
            return false;
        }
        if !self.button.is_empty() {
            let ok = match event.kind {
                EventKind::MousePress { button, .. } | EventKind::MouseRelease { button, .. } => {
                    button == self.button
                }
                _ => event.buttons.contains(self.button),
            };
            if !ok {
                return false;
            }
        }
        if let Some(dir) = self.wheel {
            let ok = match event.kind {
                EventKind::MouseWheel { delta, .. } => match dir {
                    WheelDirection::Up => delta > 0,
                    WheelDirection::Down => delta < 0,
                },
                _ => false,
            };
            if !ok {
                return false;
            }
        }
        if let Some(k) = self.key {
            return matches!(event.kind, EventKind::KeyPress { key } if key == k);
        }
        true
    }
}
