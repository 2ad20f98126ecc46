// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display action broadcast.
//!
//! ## Overview
//!
//! [`DisplayActionBroadcast`] turns raw pointer and key events into
//! [`DisplayActionEvent`]s: pan, zoom, slice scrolling and crosshair placement. A
//! [`Behavior`] decides which action runs for which event; the broadcast provides the
//! conditions and actions that behavior refers to by name.
//!
//! ## Gestures
//!
//! A drag gesture starts with [`ActionId::Init`], which records the start position in
//! [`GestureState`]. Later actions of the same gesture read and update that state. A new
//! `Init` overwrites it unconditionally.
//!
//! Zoom and scroll keep two display samples (last and current), so each step measures
//! the motion of the previous sample pair.
//!
//! ## Rotation and swivel
//!
//! [`ConditionId::CheckCanRotate`] decides whether a press grabs a single plane crossing
//! line. Lines within [`ROTATION_GRAB_DISTANCE`] of the cursor are candidates; two distinct
//! candidates make the grab ambiguous. At least one farther crossing must exist to
//! anchor the center of rotation.
//!
//! [`ConditionId::CheckCanSwivel`] requires the clicked plane and two others, and rejects
//! presses within [`SWIVEL_GRAB_DISTANCE`] of their common crossing point.
//!
//! Both record what they found in [`GestureState`]; the transforms themselves are left
//! to subscribers.

use std::fmt;

use glam::DVec3;
use kurbo::Point;
use ortho_geometry::{EPS, Line3, PlaneGeometry};
use ortho_interaction::dispatcher::{Interactor, InteractorMode, Listener};
use ortho_interaction::event::InteractionEvent;
use ortho_interaction::state_machine::{Behavior, DEFAULT_JURISDICTION, StateMachine};
use tracing::{debug, trace};

use crate::action::{ActionId, ConditionId, DisplayAction, DisplayActionEvent};
use crate::behavior::standard_behavior;
use crate::config::{DisplayActionConfig, DragAxis, PropertySource};
use crate::viewport::{ControllerId, MapperKind, Renderer, RenderingManager};

/// Crossing lines closer than this (in spacing units) can be grabbed for rotation.
pub const ROTATION_GRAB_DISTANCE: f64 = 12.0;

/// Presses closer than this (world units) to the crossing point do not swivel.
pub const SWIVEL_GRAB_DISTANCE: f64 = 6.0;

/// Per-gesture state recorded by conditions and actions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureState {
    /// Gesture start on the sender's plane, in millimetres.
    pub start_coordinate_mm: Point,
    /// Most recent plane coordinate, in millimetres.
    pub last_coordinate_mm: Point,
    /// Older of the two display samples.
    pub last_display: Point,
    /// Newer of the two display samples.
    pub current_display: Point,
    /// Cursor projected onto the grabbed crossing line.
    pub last_cursor_position: DVec3,
    /// Fixed point of a rotation or swivel.
    pub center_of_rotation: DVec3,
    /// Display position where a swivel started.
    pub reference_cursor: Point,
    /// Unit normal of the swivelled plane.
    pub rotation_plane_normal: DVec3,
    /// Unit right axis of the swivelled plane.
    pub rotation_plane_x: DVec3,
    /// Unit down axis of the swivelled plane.
    pub rotation_plane_y: DVec3,
    /// Axis of the last applied swivel step.
    pub previous_rotation_axis: DVec3,
    /// Angle of the last applied swivel step.
    pub previous_rotation_angle: f64,
    /// Controllers whose planes take part in the rotation.
    pub controllers_to_rotate: Vec<ControllerId>,
}

/// Handle returned by [`DisplayActionBroadcast::subscribe`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&DisplayActionEvent)>;

/// Emits display actions for events its behavior accepts.
///
/// Register it with a [`Dispatcher`](ortho_interaction::dispatcher::Dispatcher) as an
/// interactor, as a listener, or drive it directly through
/// [`handle_event`](Interactor::handle_event).
pub struct DisplayActionBroadcast<R> {
    machine: StateMachine<ConditionId, ActionId>,
    core: Core<R>,
}

/// Everything except the state machine, so guards can borrow it while the machine steps.
struct Core<R> {
    rendering: R,
    config: DisplayActionConfig,
    gesture: GestureState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<R> fmt::Debug for DisplayActionBroadcast<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayActionBroadcast")
            .field("state", &self.machine.current_state_name())
            .field("config", &self.core.config)
            .field("gesture", &self.core.gesture)
            .field("subscribers", &self.core.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<R: RenderingManager> DisplayActionBroadcast<R> {
    /// Create a broadcast running `behavior` over the render targets of `rendering`.
    pub fn new(rendering: R, behavior: Behavior<ConditionId, ActionId>) -> Self {
        Self {
            machine: StateMachine::new(behavior),
            core: Core {
                rendering,
                config: DisplayActionConfig::default(),
                gesture: GestureState::default(),
                subscribers: Vec::new(),
                next_subscription: 0,
            },
        }
    }

    /// Create a broadcast running [`standard_behavior`].
    pub fn with_standard_behavior(rendering: R) -> Self {
        Self::new(rendering, standard_behavior())
    }

    /// The render targets.
    pub fn rendering(&self) -> &R {
        &self.core.rendering
    }

    /// Re-read configuration properties.
    pub fn configure<P: PropertySource + ?Sized>(&mut self, source: &P) {
        self.core.config.apply(source);
        debug!(config = ?self.core.config, "configuration changed");
    }

    /// Current configuration.
    pub fn config(&self) -> &DisplayActionConfig {
        &self.core.config
    }

    /// Replace the configuration.
    ///
    /// A non-positive `pixel_per_slice` or `zoom_factor` falls back to its default.
    pub fn set_config(&mut self, config: DisplayActionConfig) {
        self.core.config = config.sanitized();
        debug!(config = ?self.core.config, "configuration changed");
    }

    /// State recorded by the current or last gesture.
    pub fn gesture(&self) -> &GestureState {
        &self.core.gesture
    }

    /// Name of the behavior state the broadcast is in.
    pub fn current_state_name(&self) -> &str {
        self.machine.current_state_name()
    }

    /// Abandon any gesture in progress.
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Receive every emitted [`DisplayActionEvent`].
    pub fn subscribe(&mut self, f: impl FnMut(&DisplayActionEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.core.next_subscription);
        self.core.next_subscription += 1;
        self.core.subscribers.push((id, Box::new(f)));
        id
    }

    /// Stop delivering to `id`. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.core.subscribers.len();
        self.core.subscribers.retain(|(s, _)| *s != id);
        self.core.subscribers.len() != before
    }

    /// Whether the broadcast considers `event` at all.
    ///
    /// Events without a known sender and events from 3D render targets are ignored.
    pub fn filter_event(&self, event: &InteractionEvent) -> bool {
        self.core.sender(event).is_some()
    }

    /// Evaluate a named condition.
    pub fn check_condition(&mut self, condition: ConditionId, event: &InteractionEvent) -> bool {
        self.core.check_condition(condition, event)
    }

    /// Run a named action.
    pub fn execute_action(&mut self, action: ActionId, event: &InteractionEvent) {
        self.core.execute_action(action, event);
    }
}

impl<R: RenderingManager> Interactor for DisplayActionBroadcast<R> {
    fn jurisdiction(&self, event: &InteractionEvent) -> f32 {
        if self.filter_event(event) && self.machine.can_handle(event) {
            DEFAULT_JURISDICTION
        } else {
            0.0
        }
    }

    fn handle_event(&mut self, event: &InteractionEvent) -> bool {
        if !self.filter_event(event) {
            return false;
        }
        let Self { machine, core } = self;
        let Some(actions) = machine.step(event, |c| core.check_condition(c, event)) else {
            return false;
        };
        for action in actions {
            core.execute_action(action, event);
        }
        true
    }

    fn mode(&self) -> InteractorMode {
        if self.machine.is_idle() {
            InteractorMode::Deselected
        } else {
            InteractorMode::Selected
        }
    }
}

impl<R: RenderingManager> Listener for DisplayActionBroadcast<R> {
    fn notify(&mut self, event: &InteractionEvent, handled: bool) {
        if !handled || self.core.config.always_react {
            self.handle_event(event);
        }
    }
}

impl<R: RenderingManager> Core<R> {
    /// The sender, if it is a known 2D render target.
    fn sender(&self, event: &InteractionEvent) -> Option<&dyn Renderer> {
        let renderer = self.rendering.renderer(event.sender?)?;
        (renderer.mapper_kind() != MapperKind::Volume3D).then_some(renderer)
    }

    fn check_condition(&mut self, condition: ConditionId, event: &InteractionEvent) -> bool {
        let ok = match condition {
            ConditionId::CheckPositionEvent => event.position().is_some(),
            ConditionId::CheckCanRotate => self.check_rotation_possible(event),
            ConditionId::CheckCanSwivel => self.check_swivel_possible(event),
        };
        trace!(%condition, ok, "condition");
        ok
    }

    fn execute_action(&mut self, action: ActionId, event: &InteractionEvent) {
        trace!(%action, "action");
        match action {
            ActionId::Init => self.init(event),
            ActionId::Move => self.pan(event),
            ActionId::Zoom => self.zoom(event),
            ActionId::Scroll => self.scroll(event),
            ActionId::ScrollOneUp => self.scroll_one(event, 1),
            ActionId::ScrollOneDown => self.scroll_one(event, -1),
            ActionId::SetCrosshair => {
                if let Some(pos) = event.position() {
                    self.emit(event, DisplayAction::SetCrosshair(pos.world));
                }
            }
            ActionId::LevelWindow
            | ActionId::UpdateStatusbar
            | ActionId::StartRotation
            | ActionId::EndRotation
            | ActionId::Rotate
            | ActionId::Swivel => {}
        }
    }

    fn emit(&mut self, origin: &InteractionEvent, action: DisplayAction) {
        let event = DisplayActionEvent {
            origin: *origin,
            action,
        };
        debug!(?action, "display action");
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }

    fn check_rotation_possible(&mut self, event: &InteractionEvent) -> bool {
        self.gesture.controllers_to_rotate.clear();
        let Some(pos) = event.position() else {
            return false;
        };
        let Some(clicked) = self.sender(event).and_then(|r| r.current_plane()) else {
            return false;
        };
        let cursor = pos.world;
        let spacing = clicked.spacing();
        let link_planes = self.config.link_planes;

        let mut rotated = Vec::new();
        let mut target: Option<Line3> = None;
        let mut any_other: Option<PlaneGeometry> = None;
        let mut hit_multiple_lines = false;

        for renderer in self.rendering.renderers() {
            if renderer.mapper_kind() == MapperKind::Volume3D {
                continue;
            }
            let Some(plane) = renderer.current_plane() else {
                continue;
            };
            // Parallel planes, including the clicked plane itself, have no crossing line.
            let Some(line) = clicked.intersection_line(&plane) else {
                continue;
            };
            let distance = line.distance(cursor) / spacing[renderer.view_direction().spacing_axis()];

            if distance > ROTATION_GRAB_DISTANCE {
                // With several far crossings the last one anchors the center.
                any_other = Some(plane);
                if link_planes {
                    rotated.push(renderer.controller());
                }
            } else {
                match target {
                    None => {
                        target = Some(line);
                        rotated.push(renderer.controller());
                    }
                    Some(t) if line.is_parallel(&t) && line.distance(t.point1()) < EPS => {
                        rotated.push(renderer.controller());
                    }
                    Some(_) => hit_multiple_lines = true,
                }
            }
        }

        let (Some(target), Some(other)) = (target, any_other) else {
            return false;
        };
        if hit_multiple_lines {
            debug!("cursor is near more than one crossing line, not rotating");
            return false;
        }
        let Some(center) = other.intersection_point(&target) else {
            debug!("crossing line does not meet the anchoring plane, not rotating");
            return false;
        };
        self.gesture.last_cursor_position = target.project(cursor);
        self.gesture.center_of_rotation = center;
        self.gesture.controllers_to_rotate = rotated;
        true
    }

    fn check_swivel_possible(&mut self, event: &InteractionEvent) -> bool {
        let (Some(pos), Some(sender_controller)) = (
            event.position(),
            event
                .sender
                .and_then(|id| self.rendering.renderer(id))
                .map(|r| r.controller()),
        ) else {
            return false;
        };
        self.gesture.controllers_to_rotate.clear();
        let cursor = pos.world;
        let link_planes = self.config.link_planes;

        let mut rotated = Vec::new();
        let mut clicked: Option<PlaneGeometry> = None;
        let mut other1: Option<PlaneGeometry> = None;
        let mut other2: Option<PlaneGeometry> = None;

        for renderer in self.rendering.renderers() {
            if renderer.mapper_kind() == MapperKind::Volume3D {
                continue;
            }
            let Some(plane) = renderer.current_plane() else {
                continue;
            };
            if renderer.controller() == sender_controller {
                clicked = Some(plane);
                rotated.push(renderer.controller());
            } else {
                if other1.is_none() {
                    other1 = Some(plane);
                } else {
                    other2 = Some(plane);
                }
                if link_planes {
                    rotated.push(renderer.controller());
                }
            }
        }
        self.gesture.controllers_to_rotate = rotated;

        let (Some(clicked), Some(other1), Some(other2)) = (clicked, other1, other2) else {
            return false;
        };
        let Some(center) = clicked
            .intersection_line(&other1)
            .and_then(|line| other2.intersection_point(&line))
        else {
            return false;
        };
        self.gesture.center_of_rotation = center;
        if center.distance(cursor) < SWIVEL_GRAB_DISTANCE {
            debug!("cursor is too close to the crossing point to swivel");
            return false;
        }

        let g = &mut self.gesture;
        g.reference_cursor = pos.screen;
        g.rotation_plane_normal = clicked.normal();
        g.rotation_plane_x = clicked.index_to_world_vector(DVec3::X).normalize_or_zero();
        g.rotation_plane_y = clicked.index_to_world_vector(DVec3::Y).normalize_or_zero();
        g.previous_rotation_axis = DVec3::Z;
        g.previous_rotation_angle = 0.0;
        true
    }

    fn init(&mut self, event: &InteractionEvent) {
        let Some(pos) = event.position() else {
            return;
        };
        let Some(start) = self.sender(event).map(|r| r.display_to_plane(pos.screen)) else {
            return;
        };
        let g = &mut self.gesture;
        g.last_display = pos.screen;
        g.current_display = pos.screen;
        g.start_coordinate_mm = start;
        g.last_coordinate_mm = start;
    }

    fn pan(&mut self, event: &InteractionEvent) {
        let Some(pos) = event.position() else {
            return;
        };
        let Some(scale) = self.sender(event).map(|r| r.scale_factor_mm_per_display_unit()) else {
            return;
        };
        let mut delta = self.gesture.last_display - pos.screen;
        if self.config.invert_move {
            delta = -delta;
        }
        delta *= scale;
        self.gesture.last_display = pos.screen;
        self.emit(event, DisplayAction::Move(delta));
    }

    fn zoom(&mut self, event: &InteractionEvent) {
        let Some(pos) = event.position() else {
            return;
        };
        let g = &mut self.gesture;
        let motion = g.current_display - g.last_display;
        let mut distance = match self.config.zoom_direction {
            DragAxis::UpDown => motion.y,
            DragAxis::LeftRight => motion.x,
        };
        if self.config.invert_zoom {
            distance = -distance;
        }
        let factor = if distance < 0.0 {
            1.0 / self.config.zoom_factor
        } else if distance > 0.0 {
            self.config.zoom_factor
        } else {
            1.0
        };
        g.last_display = g.current_display;
        g.current_display = pos.screen;
        let anchor = g.start_coordinate_mm;
        self.emit(event, DisplayAction::Zoom { factor, anchor });
    }

    fn scroll(&mut self, event: &InteractionEvent) {
        let Some(pos) = event.position() else {
            return;
        };
        let g = &mut self.gesture;
        let motion = g.last_display - pos.screen;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Slice deltas count whole display units."
        )]
        let mut delta = match self.config.scroll_direction {
            DragAxis::UpDown => motion.y,
            DragAxis::LeftRight => motion.x,
        } as i32;
        if self.config.invert_scroll {
            delta = delta.saturating_neg();
        }
        let step = self.config.pixel_per_slice;
        if delta > 0 && delta < step {
            delta = step;
        } else if delta < 0 && delta > -step {
            delta = -step;
        }
        delta /= step;
        g.last_display = g.current_display;
        g.current_display = pos.screen;
        self.emit(event, DisplayAction::Scroll(delta));
    }

    fn scroll_one(&mut self, event: &InteractionEvent, delta: i32) {
        let delta = if self.config.invert_scroll { -delta } else { delta };
        self.emit(event, DisplayAction::Scroll(delta));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::viewport::{SliceViewport, ViewDirection, ViewportSet};
    use kurbo::Vec2;
    use ortho_interaction::event::{
        EventKind, Key, Modifiers, MouseButtons, PointerPosition, RendererId,
    };

    const AXIAL: RendererId = RendererId(1);
    const SAGITTAL: RendererId = RendererId(2);
    const CORONAL: RendererId = RendererId(3);
    const VOLUME: RendererId = RendererId(4);

    /// Axial, sagittal and coronal views crossing at the origin, plus a 3D view.
    fn ortho_views() -> ViewportSet {
        let mut set: ViewportSet = SliceViewport::standard_triple(1, DVec3::ZERO, DVec3::ONE)
            .into_iter()
            .collect();
        set.insert(SliceViewport::volume(VOLUME));
        set
    }

    fn recorded(
        b: &mut DisplayActionBroadcast<ViewportSet>,
    ) -> Rc<RefCell<Vec<DisplayAction>>> {
        let out = Rc::new(RefCell::new(Vec::new()));
        let sink = out.clone();
        b.subscribe(move |e| sink.borrow_mut().push(e.action));
        out
    }

    fn at(
        sender: RendererId,
        kind: impl FnOnce(PointerPosition) -> EventKind,
        screen: (f64, f64),
        world: DVec3,
    ) -> InteractionEvent {
        InteractionEvent::new(
            Some(sender),
            kind(PointerPosition::new(Point::new(screen.0, screen.1), world)),
        )
    }

    /// An event on the axial view whose world position matches the screen position.
    fn on_axial(kind: impl FnOnce(PointerPosition) -> EventKind, x: f64, y: f64) -> InteractionEvent {
        at(AXIAL, kind, (x, y), DVec3::new(x, y, 0.0))
    }

    fn press(button: MouseButtons, x: f64, y: f64) -> InteractionEvent {
        on_axial(|position| EventKind::MousePress { button, position }, x, y)
    }

    fn drag(button: MouseButtons, x: f64, y: f64) -> InteractionEvent {
        on_axial(|position| EventKind::MouseMove { position }, x, y).with_buttons(button)
    }

    fn release(button: MouseButtons, x: f64, y: f64) -> InteractionEvent {
        on_axial(|position| EventKind::MouseRelease { button, position }, x, y)
    }

    /// A shift+left press on the axial view at `world`.
    fn clicked_at(world: DVec3) -> InteractionEvent {
        press(MouseButtons::LEFT, world.x, world.y).with_modifiers(Modifiers::SHIFT)
    }

    #[test]
    fn filter_rejects_missing_and_volume_senders() {
        let b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        let mut ev = press(MouseButtons::LEFT, 0.0, 0.0);
        assert!(b.filter_event(&ev));
        ev.sender = None;
        assert!(!b.filter_event(&ev));
        ev.sender = Some(VOLUME);
        assert!(!b.filter_event(&ev));
        ev.sender = Some(RendererId(77));
        assert!(!b.filter_event(&ev));
        assert_eq!(b.jurisdiction(&ev), 0.0);
    }

    #[test]
    fn position_condition_is_a_shape_check() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        assert!(b.check_condition(ConditionId::CheckPositionEvent, &press(MouseButtons::LEFT, 1.0, 1.0)));
        let key = InteractionEvent::new(Some(AXIAL), EventKind::KeyPress { key: Key::Up });
        assert!(!b.check_condition(ConditionId::CheckPositionEvent, &key));
    }

    #[test]
    fn rotation_grabs_near_line_and_anchors_on_far_plane() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        // Sagittal crossing (x = 0) is 5 away, coronal crossing (y = 0) is 20 away.
        let ev = clicked_at(DVec3::new(5.0, 20.0, 0.0));
        assert!(b.check_condition(ConditionId::CheckCanRotate, &ev));
        let g = b.gesture();
        assert!(g.last_cursor_position.distance(DVec3::new(0.0, 20.0, 0.0)) < 1e-9);
        assert!(g.center_of_rotation.distance(DVec3::ZERO) < 1e-9);
        assert_eq!(
            g.controllers_to_rotate,
            vec![ControllerId(SAGITTAL.0), ControllerId(CORONAL.0)]
        );
    }

    #[test]
    fn rotation_without_coupling_moves_only_grabbed_planes() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        b.configure(&[("coupled", "false")][..]);
        assert!(b.check_condition(ConditionId::CheckCanRotate, &clicked_at(DVec3::new(5.0, 20.0, 0.0))));
        assert_eq!(b.gesture().controllers_to_rotate, vec![ControllerId(SAGITTAL.0)]);
    }

    #[test]
    fn rotation_needs_a_far_crossing() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        // Both crossings are near: no anchor and ambiguous.
        assert!(!b.check_condition(ConditionId::CheckCanRotate, &clicked_at(DVec3::new(3.0, 4.0, 0.0))));
        // Both far: nothing grabbed.
        assert!(!b.check_condition(ConditionId::CheckCanRotate, &clicked_at(DVec3::new(30.0, 40.0, 0.0))));
    }

    #[test]
    fn rotation_rejects_two_distinct_near_lines() {
        let mut views = ortho_views();
        views.insert(SliceViewport::new(
            RendererId(5),
            ViewDirection::Sagittal,
            PlaneGeometry::sagittal(DVec3::new(40.0, 0.0, 0.0), DVec3::ONE),
        ));
        let mut b = DisplayActionBroadcast::with_standard_behavior(views);
        // Sagittal (3 away) and coronal (4 away) are both near; x = 40 is far.
        assert!(!b.check_condition(ConditionId::CheckCanRotate, &clicked_at(DVec3::new(3.0, 4.0, 0.0))));
    }

    #[test]
    fn rotation_accepts_coincident_near_lines() {
        let mut views = ortho_views();
        views.insert(
            SliceViewport::new(
                RendererId(5),
                ViewDirection::Sagittal,
                PlaneGeometry::sagittal(DVec3::ZERO, DVec3::ONE),
            )
            .with_controller(ControllerId(50)),
        );
        let mut b = DisplayActionBroadcast::with_standard_behavior(views);
        b.configure(&[("coupled", "false")][..]);
        assert!(b.check_condition(ConditionId::CheckCanRotate, &clicked_at(DVec3::new(5.0, 20.0, 0.0))));
        assert_eq!(
            b.gesture().controllers_to_rotate,
            vec![ControllerId(SAGITTAL.0), ControllerId(50)]
        );
    }

    #[test]
    fn rotation_distance_uses_spacing() {
        let views: ViewportSet = SliceViewport::standard_triple(1, DVec3::ZERO, DVec3::splat(0.5))
            .into_iter()
            .collect();
        let mut b = DisplayActionBroadcast::with_standard_behavior(views);
        // 8 world units at spacing 0.5 is 16 units away: too far to grab.
        assert!(!b.check_condition(ConditionId::CheckCanRotate, &clicked_at(DVec3::new(8.0, 40.0, 0.0))));
        assert!(b.check_condition(ConditionId::CheckCanRotate, &clicked_at(DVec3::new(5.0, 40.0, 0.0))));
    }

    #[test]
    fn swivel_rejected_near_crossing_point() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        assert!(!b.check_condition(ConditionId::CheckCanSwivel, &clicked_at(DVec3::new(3.0, 0.0, 0.0))));
        assert!(b.check_condition(ConditionId::CheckCanSwivel, &clicked_at(DVec3::new(6.0, 8.0, 0.0))));
        let g = b.gesture();
        assert!(g.center_of_rotation.distance(DVec3::ZERO) < 1e-9);
        assert_eq!(g.reference_cursor, Point::new(6.0, 8.0));
        assert_eq!(g.rotation_plane_normal, DVec3::Z);
        assert_eq!(g.rotation_plane_x, DVec3::X);
        assert_eq!(g.rotation_plane_y, DVec3::Y);
        assert_eq!(g.previous_rotation_axis, DVec3::Z);
        assert_eq!(g.previous_rotation_angle, 0.0);
        assert_eq!(g.controllers_to_rotate.len(), 3);
    }

    #[test]
    fn swivel_needs_three_planes() {
        let views: ViewportSet = SliceViewport::standard_triple(1, DVec3::ZERO, DVec3::ONE)
            .into_iter()
            .take(2)
            .collect();
        let mut b = DisplayActionBroadcast::with_standard_behavior(views);
        assert!(!b.check_condition(ConditionId::CheckCanSwivel, &clicked_at(DVec3::new(30.0, 30.0, 0.0))));
    }

    #[test]
    fn scroll_clamps_small_drags_to_one_slice() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        let out = recorded(&mut b);
        b.execute_action(ActionId::Init, &press(MouseButtons::LEFT, 0.0, 100.0));
        b.execute_action(ActionId::Scroll, &drag(MouseButtons::LEFT, 0.0, 98.0));
        b.execute_action(ActionId::Init, &press(MouseButtons::LEFT, 0.0, 100.0));
        b.execute_action(ActionId::Scroll, &drag(MouseButtons::LEFT, 0.0, 91.0));
        b.execute_action(ActionId::Init, &press(MouseButtons::LEFT, 0.0, 100.0));
        b.execute_action(ActionId::Scroll, &drag(MouseButtons::LEFT, 0.0, 101.0));
        assert_eq!(
            *out.borrow(),
            vec![
                DisplayAction::Scroll(1),
                DisplayAction::Scroll(2),
                DisplayAction::Scroll(-1)
            ]
        );
    }

    #[test]
    fn scroll_honors_axis_and_inversion() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        b.configure(&[
            ("scrollDirection", "leftright"),
            ("invertScrollDirection", "true"),
            ("pixelPerSlice", "2"),
        ][..]);
        let out = recorded(&mut b);
        b.execute_action(ActionId::Init, &press(MouseButtons::LEFT, 10.0, 0.0));
        b.execute_action(ActionId::Scroll, &drag(MouseButtons::LEFT, 4.0, 50.0));
        b.execute_action(ActionId::ScrollOneUp, &press(MouseButtons::LEFT, 0.0, 0.0));
        assert_eq!(
            *out.borrow(),
            vec![DisplayAction::Scroll(-3), DisplayAction::Scroll(-1)]
        );
    }

    #[test]
    fn zoom_factor_follows_drag_direction() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        b.configure(&[("zoomFactor", "20")][..]);
        let out = recorded(&mut b);

        b.execute_action(ActionId::Init, &press(MouseButtons::RIGHT, 0.0, 100.0));
        for y in [110.0, 120.0] {
            b.execute_action(ActionId::Zoom, &drag(MouseButtons::RIGHT, 0.0, y));
        }
        b.execute_action(ActionId::Init, &press(MouseButtons::RIGHT, 0.0, 100.0));
        for y in [90.0, 80.0] {
            b.execute_action(ActionId::Zoom, &drag(MouseButtons::RIGHT, 0.0, y));
        }

        let factors: Vec<f64> = out
            .borrow()
            .iter()
            .map(|a| match a {
                DisplayAction::Zoom { factor, anchor } => {
                    assert_eq!(*anchor, Point::new(0.0, 100.0));
                    *factor
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(factors.len(), 4);
        assert_eq!(factors[0], 1.0);
        assert!((factors[1] - 1.2).abs() < 1e-12);
        assert_eq!(factors[2], 1.0);
        assert!((factors[3] - 1.0 / 1.2).abs() < 1e-12);
    }

    #[test]
    fn move_scales_and_inverts() {
        let mut views = ortho_views();
        if let Some(v) = views.get_mut(AXIAL) {
            *v = v.clone().with_scale(2.0);
        }
        let mut b = DisplayActionBroadcast::with_standard_behavior(views);
        let out = recorded(&mut b);
        b.execute_action(ActionId::Init, &press(MouseButtons::MIDDLE, 10.0, 10.0));
        b.execute_action(ActionId::Move, &drag(MouseButtons::MIDDLE, 13.0, 6.0));
        b.configure(&[("invertMoveDirection", "true")][..]);
        b.execute_action(ActionId::Move, &drag(MouseButtons::MIDDLE, 14.0, 6.0));
        assert_eq!(
            *out.borrow(),
            vec![
                DisplayAction::Move(Vec2::new(-6.0, 8.0)),
                DisplayAction::Move(Vec2::new(2.0, 0.0))
            ]
        );
    }

    #[test]
    fn standard_behavior_drives_a_middle_drag() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        let out = recorded(&mut b);
        assert_eq!(b.jurisdiction(&press(MouseButtons::MIDDLE, 0.0, 0.0)), DEFAULT_JURISDICTION);
        assert!(b.handle_event(&press(MouseButtons::MIDDLE, 0.0, 0.0)));
        assert_eq!(b.mode(), InteractorMode::Selected);
        assert!(b.handle_event(&drag(MouseButtons::MIDDLE, 1.0, 0.0)));
        assert!(b.handle_event(&release(MouseButtons::MIDDLE, 1.0, 0.0)));
        assert_eq!(b.mode(), InteractorMode::Deselected);
        assert_eq!(*out.borrow(), vec![DisplayAction::Move(Vec2::new(-1.0, 0.0))]);
    }

    #[test]
    fn shift_press_falls_back_to_move_when_rotation_is_impossible() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        assert!(b.handle_event(&clicked_at(DVec3::new(30.0, 40.0, 0.0))));
        assert_eq!(b.current_state_name(), "move");
        b.reset();
        assert!(b.handle_event(&clicked_at(DVec3::new(5.0, 20.0, 0.0))));
        assert_eq!(b.current_state_name(), "rotate");
    }

    #[test]
    fn listener_respects_always_react() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        let out = recorded(&mut b);
        let click = press(MouseButtons::LEFT, 2.0, 3.0);
        b.notify(&click, true);
        assert!(out.borrow().is_empty());
        let mut props = HashMap::new();
        props.insert("alwaysReact".to_owned(), "true".to_owned());
        b.configure(&props);
        b.notify(&click, true);
        assert_eq!(
            *out.borrow(),
            vec![DisplayAction::SetCrosshair(DVec3::new(2.0, 3.0, 0.0))]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        let hits = Rc::new(RefCell::new(0));
        let sink = hits.clone();
        let id = b.subscribe(move |_| *sink.borrow_mut() += 1);
        let wheel = on_axial(|position| EventKind::MouseWheel { delta: 1, position }, 0.0, 0.0);
        assert!(b.handle_event(&wheel));
        assert!(b.unsubscribe(id));
        assert!(!b.unsubscribe(id));
        assert!(b.handle_event(&wheel));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn missing_planes_block_rotation_and_swivel() {
        let mut views = ortho_views();
        if let Some(v) = views.get_mut(AXIAL) {
            v.set_plane(None);
        }
        let mut b = DisplayActionBroadcast::with_standard_behavior(views);
        let ev = clicked_at(DVec3::new(5.0, 20.0, 0.0));
        assert!(b.filter_event(&ev));
        assert!(!b.check_condition(ConditionId::CheckCanRotate, &ev));
        assert!(!b.check_condition(ConditionId::CheckCanSwivel, &ev));

        let mut views = ortho_views();
        if let Some(v) = views.get_mut(CORONAL) {
            v.set_plane(None);
        }
        let mut b = DisplayActionBroadcast::with_standard_behavior(views);
        // The sagittal crossing is still near, but nothing is left to anchor the center.
        assert!(!b.check_condition(ConditionId::CheckCanRotate, &ev));
        assert!(b.gesture().controllers_to_rotate.is_empty());
        assert!(!b.check_condition(ConditionId::CheckCanSwivel, &clicked_at(DVec3::new(30.0, 30.0, 0.0))));
    }

    #[test]
    fn rotation_rejected_when_line_misses_anchoring_plane() {
        let mut views = ortho_views();
        // Registered last, so this far plane anchors the center. It is parallel to the
        // grabbed sagittal crossing line, which never meets it.
        views.insert(SliceViewport::new(
            RendererId(5),
            ViewDirection::Sagittal,
            PlaneGeometry::sagittal(DVec3::new(40.0, 0.0, 0.0), DVec3::ONE),
        ));
        let mut b = DisplayActionBroadcast::with_standard_behavior(views);
        assert!(!b.check_condition(ConditionId::CheckCanRotate, &clicked_at(DVec3::new(5.0, 20.0, 0.0))));
        assert!(b.gesture().controllers_to_rotate.is_empty());
    }

    #[test]
    fn zoom_honors_axis_and_inversion() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        b.configure(&[
            ("zoomFactor", "20"),
            ("zoomDirection", "leftright"),
            ("invertZoomDirection", "true"),
        ][..]);
        let out = recorded(&mut b);

        // Rightward drag, inverted: zoom out.
        b.execute_action(ActionId::Init, &press(MouseButtons::RIGHT, 100.0, 0.0));
        b.execute_action(ActionId::Zoom, &drag(MouseButtons::RIGHT, 110.0, 50.0));
        b.execute_action(ActionId::Zoom, &drag(MouseButtons::RIGHT, 120.0, 50.0));
        // Vertical drag only: no horizontal motion, no zoom.
        b.execute_action(ActionId::Init, &press(MouseButtons::RIGHT, 100.0, 0.0));
        b.execute_action(ActionId::Zoom, &drag(MouseButtons::RIGHT, 100.0, 30.0));
        b.execute_action(ActionId::Zoom, &drag(MouseButtons::RIGHT, 100.0, 60.0));

        let factors: Vec<f64> = out
            .borrow()
            .iter()
            .filter_map(|a| match a {
                DisplayAction::Zoom { factor, .. } => Some(*factor),
                _ => None,
            })
            .collect();
        assert_eq!(factors.len(), 4);
        assert_eq!(factors[0], 1.0);
        assert!((factors[1] - 1.0 / 1.2).abs() < 1e-12);
        assert_eq!(factors[2], 1.0);
        assert_eq!(factors[3], 1.0);
    }

    #[test]
    fn scroll_one_down_plain_and_inverted() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        let out = recorded(&mut b);
        let down = InteractionEvent::new(Some(AXIAL), EventKind::KeyPress { key: Key::Down });
        assert!(b.handle_event(&down));
        b.configure(&[("invertScrollDirection", "true")][..]);
        b.execute_action(ActionId::ScrollOneDown, &down);
        assert_eq!(
            *out.borrow(),
            vec![DisplayAction::Scroll(-1), DisplayAction::Scroll(1)]
        );
    }

    #[test]
    fn structured_config_keeps_fallbacks() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        let config: DisplayActionConfig =
            serde_json::from_str(r#"{ "zoomFactor": 0, "pixelPerSlice": 0 }"#).unwrap();
        b.set_config(config);
        assert_eq!(b.config().zoom_factor, crate::config::FALLBACK_ZOOM_FACTOR);
        b.set_config(DisplayActionConfig {
            pixel_per_slice: -2,
            zoom_factor: 0.0,
            ..b.config().clone()
        });
        assert_eq!(b.config().pixel_per_slice, 4);
        let out = recorded(&mut b);

        b.execute_action(ActionId::Init, &press(MouseButtons::RIGHT, 0.0, 100.0));
        b.execute_action(ActionId::Zoom, &drag(MouseButtons::RIGHT, 0.0, 110.0));
        b.execute_action(ActionId::Zoom, &drag(MouseButtons::RIGHT, 0.0, 120.0));
        b.execute_action(ActionId::Init, &press(MouseButtons::LEFT, 0.0, 100.0));
        b.execute_action(ActionId::Scroll, &drag(MouseButtons::LEFT, 0.0, 98.0));

        let anchor = Point::new(0.0, 100.0);
        assert_eq!(
            *out.borrow(),
            vec![
                DisplayAction::Zoom { factor: 1.0, anchor },
                DisplayAction::Zoom {
                    factor: crate::config::FALLBACK_ZOOM_FACTOR,
                    anchor
                },
                DisplayAction::Scroll(1),
            ]
        );
    }

    #[test]
    fn inverted_scroll_saturates_on_huge_drags() {
        let mut b = DisplayActionBroadcast::with_standard_behavior(ortho_views());
        b.configure(&[("invertScrollDirection", "true")][..]);
        let out = recorded(&mut b);
        b.execute_action(ActionId::Init, &press(MouseButtons::LEFT, 0.0, 0.0));
        b.execute_action(ActionId::Scroll, &drag(MouseButtons::LEFT, 0.0, 1e12));
        assert_eq!(*out.borrow(), vec![DisplayAction::Scroll(i32::MAX / 4)]);
    }
}
