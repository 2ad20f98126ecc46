// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Condition and action names, and the display actions the broadcast emits.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use kurbo::{Point, Vec2};
use ortho_interaction::event::InteractionEvent;
use thiserror::Error;

/// A name that is not a known condition or action.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} name: {name}")]
pub struct UnknownName {
    /// `"condition"` or `"action"`.
    pub kind: &'static str,
    /// The rejected name.
    pub name: String,
}

macro_rules! named_ids {
    (
        $(#[$meta:meta])*
        $ty:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $name:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum $ty {
            $($(#[$vmeta])* $variant,)*
        }

        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The name used in behavior descriptions.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }

        impl FromStr for $ty {
            type Err = UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)*
                    _ => Err(UnknownName { kind: $kind, name: s.to_owned() }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_ids! {
    /// Guard conditions the broadcast can evaluate.
    ConditionId ("condition") {
        /// The event carries a pointer position.
        CheckPositionEvent => "check_position_event",
        /// The cursor grabs exactly one plane crossing line suitable for rotation.
        CheckCanRotate => "check_can_rotate",
        /// The cursor is far enough from the three-plane crossing point to swivel.
        CheckCanSwivel => "check_can_swivel",
    }
}

named_ids! {
    /// Actions the broadcast can execute.
    ActionId ("action") {
        /// Start a drag gesture.
        Init => "init",
        /// Pan.
        Move => "move",
        /// Zoom around the gesture start.
        Zoom => "zoom",
        /// Scroll through slices by drag distance.
        Scroll => "scroll",
        /// Scroll one slice up.
        ScrollOneUp => "ScrollOneUp",
        /// Scroll one slice down.
        ScrollOneDown => "ScrollOneDown",
        /// Adjust level/window. Emits nothing.
        LevelWindow => "levelWindow",
        /// Move the crosshair to the pointer.
        SetCrosshair => "setCrosshair",
        /// Refresh the status bar. Emits nothing.
        UpdateStatusbar => "updateStatusbar",
        /// Begin a rotation or swivel. Emits nothing.
        StartRotation => "startRotation",
        /// End a rotation or swivel. Emits nothing.
        EndRotation => "endRotation",
        /// Rotate. Emits nothing.
        Rotate => "rotate",
        /// Swivel. Emits nothing.
        Swivel => "swivel",
    }
}

/// A viewport transformation requested by the broadcast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DisplayAction {
    /// Pan by a 2D vector in plane millimetres.
    Move(Vec2),
    /// Scale the view by `factor` around `anchor` (plane millimetres).
    Zoom {
        /// Multiplicative zoom; greater than one zooms in.
        factor: f64,
        /// Fixed point of the zoom.
        anchor: Point,
    },
    /// Move through slices; positive is up.
    Scroll(i32),
    /// Move the crosshair to a world position.
    SetCrosshair(DVec3),
}

/// An emitted [`DisplayAction`] with the input event that caused it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DisplayActionEvent {
    /// The triggering input event.
    pub origin: InteractionEvent,
    /// What to do.
    pub action: DisplayAction,
}
