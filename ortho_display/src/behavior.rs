// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The default mouse and keyboard mapping.

use ortho_interaction::event::{
    EventClass, EventPattern, Key, Modifiers, MouseButtons, WheelDirection,
};
use ortho_interaction::state_machine::{Behavior, StateId, Transition};

use crate::action::{ActionId, ConditionId};

/// A behavior over the broadcast's conditions and actions.
pub type DisplayBehavior = Behavior<ConditionId, ActionId>;

/// The standard slice-viewer mapping.
///
/// | Input | Effect |
/// | --- | --- |
/// | left press, left drag | set crosshair |
/// | middle drag | pan |
/// | right drag | zoom |
/// | ctrl + left drag | scroll through slices |
/// | wheel, up/down arrow | scroll one slice |
/// | shift + left drag on a crossing line | rotate, otherwise pan |
/// | ctrl + shift + left drag away from the crossing point | swivel, otherwise pan |
///
/// State names: `start`, `crosshair`, `move`, `zoom`, `scroll`, `rotate`, `swivel`.
pub fn standard_behavior() -> DisplayBehavior {
    let mut b = DisplayBehavior::new("start");
    let start = b.start();
    let crosshair = b.add_state("crosshair");
    let pan = b.add_state("move");
    let zoom = b.add_state("zoom");
    let scroll = b.add_state("scroll");
    let rotate = b.add_state("rotate");
    let swivel = b.add_state("swivel");

    let left = MouseButtons::LEFT;
    let press = |button, modifiers| {
        EventPattern::new(EventClass::MousePress)
            .button(button)
            .modifiers(modifiers)
    };

    // Guarded presses come before their fallbacks.
    b.add_transition(
        start,
        Transition::new(press(left, Modifiers::SHIFT), rotate)
            .guarded(ConditionId::CheckCanRotate, true)
            .with_actions([ActionId::StartRotation]),
    );
    b.add_transition(
        start,
        Transition::new(press(left, Modifiers::SHIFT), pan).with_actions([ActionId::Init]),
    );
    b.add_transition(
        start,
        Transition::new(press(left, Modifiers::CONTROL | Modifiers::SHIFT), swivel)
            .guarded(ConditionId::CheckCanSwivel, true)
            .with_actions([ActionId::StartRotation]),
    );
    b.add_transition(
        start,
        Transition::new(press(left, Modifiers::CONTROL | Modifiers::SHIFT), pan)
            .with_actions([ActionId::Init]),
    );
    b.add_transition(
        start,
        Transition::new(press(left, Modifiers::CONTROL), scroll).with_actions([ActionId::Init]),
    );
    b.add_transition(
        start,
        Transition::new(press(left, Modifiers::empty()), crosshair)
            .with_actions([ActionId::SetCrosshair]),
    );
    b.add_transition(
        start,
        Transition::new(press(MouseButtons::MIDDLE, Modifiers::empty()), pan)
            .with_actions([ActionId::Init]),
    );
    b.add_transition(
        start,
        Transition::new(press(MouseButtons::RIGHT, Modifiers::empty()), zoom)
            .with_actions([ActionId::Init]),
    );

    for (wheel, key, action) in [
        (WheelDirection::Up, Key::Up, ActionId::ScrollOneUp),
        (WheelDirection::Down, Key::Down, ActionId::ScrollOneDown),
    ] {
        b.add_transition(
            start,
            Transition::new(EventPattern::new(EventClass::MouseWheel).wheel(wheel), start)
                .with_actions([action]),
        );
        b.add_transition(
            start,
            Transition::new(EventPattern::new(EventClass::KeyPress).key(key), start)
                .with_actions([action]),
        );
    }
    b.add_transition(
        start,
        Transition::new(
            EventPattern::new(EventClass::MouseMove).modifiers(Modifiers::empty()),
            start,
        )
        .with_actions([ActionId::UpdateStatusbar]),
    );

    drag(&mut b, crosshair, left, ActionId::SetCrosshair, None);
    drag(&mut b, pan, MouseButtons::MIDDLE, ActionId::Move, None);
    // Shift or ctrl+shift presses that could not rotate pan with the left button.
    drag(&mut b, pan, left, ActionId::Move, None);
    drag(&mut b, zoom, MouseButtons::RIGHT, ActionId::Zoom, None);
    drag(&mut b, scroll, left, ActionId::Scroll, None);
    drag(&mut b, rotate, left, ActionId::Rotate, Some(ActionId::EndRotation));
    drag(&mut b, swivel, left, ActionId::Swivel, Some(ActionId::EndRotation));

    b
}

/// Moves with `button` held repeat `action`; releasing it returns to the start state.
fn drag(
    b: &mut DisplayBehavior,
    state: StateId,
    button: MouseButtons,
    action: ActionId,
    on_release: Option<ActionId>,
) {
    let start = b.start();
    b.add_transition(
        state,
        Transition::new(EventPattern::new(EventClass::MouseMove).button(button), state)
            .with_actions([action]),
    );
    b.add_transition(
        state,
        Transition::new(EventPattern::new(EventClass::MouseRelease).button(button), start)
            .with_actions(on_release),
    );
}
