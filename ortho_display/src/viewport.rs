// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What the broadcast needs to know about render targets.
//!
//! The rendering layer implements [`RenderingManager`] and [`Renderer`]. [`SliceViewport`]
//! and [`ViewportSet`] are plain-data implementations for applications that keep their
//! viewport state outside of a renderer, and for tests.

use std::rc::Rc;

use glam::DVec3;
use kurbo::Point;
use ortho_geometry::PlaneGeometry;
use ortho_interaction::event::RendererId;

/// Identity of the slice navigation controller that drives a render target's plane.
///
/// Several render targets may share one controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub u32);

/// How a render target draws its data.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum MapperKind {
    /// A 2D slice through the volume.
    #[default]
    Slice2D,
    /// A 3D rendering; excluded from slice-plane reasoning.
    Volume3D,
}

/// The standard view a render target was set up with.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ViewDirection {
    /// Looking along z.
    Axial,
    /// Looking along x.
    Sagittal,
    /// Looking along y.
    Coronal,
}

impl ViewDirection {
    /// Index into a plane's spacing used to convert world distances for this view.
    pub const fn spacing_axis(self) -> usize {
        match self {
            Self::Axial => 0,
            Self::Sagittal => 1,
            Self::Coronal => 2,
        }
    }
}

/// A single render target.
pub trait Renderer {
    /// Identity, matching [`InteractionEvent::sender`](ortho_interaction::event::InteractionEvent::sender).
    fn id(&self) -> RendererId;

    /// How this target draws.
    fn mapper_kind(&self) -> MapperKind;

    /// The controller driving this target's plane.
    fn controller(&self) -> ControllerId;

    /// The standard view this target was set up with.
    fn view_direction(&self) -> ViewDirection;

    /// The currently displayed plane, if any.
    fn current_plane(&self) -> Option<PlaneGeometry>;

    /// World millimetres per display unit at the current zoom.
    fn scale_factor_mm_per_display_unit(&self) -> f64;

    /// Map a display coordinate to 2D millimetres on the current plane.
    fn display_to_plane(&self, display: Point) -> Point;
}

/// The set of render targets an application shows.
pub trait RenderingManager {
    /// All registered render targets, in registration order.
    fn renderers(&self) -> Vec<&dyn Renderer>;

    /// Look up a render target by id.
    fn renderer(&self, id: RendererId) -> Option<&dyn Renderer> {
        self.renderers().into_iter().find(|r| r.id() == id)
    }
}

impl<T: RenderingManager + ?Sized> RenderingManager for Rc<T> {
    fn renderers(&self) -> Vec<&dyn Renderer> {
        (**self).renderers()
    }

    fn renderer(&self, id: RendererId) -> Option<&dyn Renderer> {
        (**self).renderer(id)
    }
}

impl<T: RenderingManager + ?Sized> RenderingManager for &T {
    fn renderers(&self) -> Vec<&dyn Renderer> {
        (**self).renderers()
    }

    fn renderer(&self, id: RendererId) -> Option<&dyn Renderer> {
        (**self).renderer(id)
    }
}

/// A render target described by plain data.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceViewport {
    id: RendererId,
    controller: ControllerId,
    mapper: MapperKind,
    view_direction: ViewDirection,
    plane: Option<PlaneGeometry>,
    mm_per_display_unit: f64,
    display_origin_mm: Point,
}

impl SliceViewport {
    /// A 2D viewport showing `plane`, with its own controller and one millimetre per
    /// display unit.
    pub fn new(id: RendererId, view_direction: ViewDirection, plane: PlaneGeometry) -> Self {
        Self {
            id,
            controller: ControllerId(id.0),
            mapper: MapperKind::Slice2D,
            view_direction,
            plane: Some(plane),
            mm_per_display_unit: 1.0,
            display_origin_mm: Point::ZERO,
        }
    }

    /// The three standard views crossing at `center`, with ids `first`, `first + 1`, `first + 2`.
    pub fn standard_triple(first: u32, center: DVec3, spacing: DVec3) -> [Self; 3] {
        [
            Self::new(
                RendererId(first),
                ViewDirection::Axial,
                PlaneGeometry::axial(center, spacing),
            ),
            Self::new(
                RendererId(first + 1),
                ViewDirection::Sagittal,
                PlaneGeometry::sagittal(center, spacing),
            ),
            Self::new(
                RendererId(first + 2),
                ViewDirection::Coronal,
                PlaneGeometry::coronal(center, spacing),
            ),
        ]
    }

    /// A 3D viewport.
    pub fn volume(id: RendererId) -> Self {
        Self {
            id,
            controller: ControllerId(id.0),
            mapper: MapperKind::Volume3D,
            view_direction: ViewDirection::Axial,
            plane: None,
            mm_per_display_unit: 1.0,
            display_origin_mm: Point::ZERO,
        }
    }

    /// Drive this viewport from `controller`.
    #[must_use]
    pub fn with_controller(mut self, controller: ControllerId) -> Self {
        self.controller = controller;
        self
    }

    /// Set the zoom as millimetres per display unit.
    #[must_use]
    pub fn with_scale(mut self, mm_per_display_unit: f64) -> Self {
        self.mm_per_display_unit = mm_per_display_unit;
        self
    }

    /// Set the plane coordinate of the display origin.
    #[must_use]
    pub fn with_display_origin(mut self, origin_mm: Point) -> Self {
        self.display_origin_mm = origin_mm;
        self
    }

    /// Replace the displayed plane.
    pub fn set_plane(&mut self, plane: Option<PlaneGeometry>) {
        self.plane = plane;
    }
}

impl Renderer for SliceViewport {
    fn id(&self) -> RendererId {
        self.id
    }

    fn mapper_kind(&self) -> MapperKind {
        self.mapper
    }

    fn controller(&self) -> ControllerId {
        self.controller
    }

    fn view_direction(&self) -> ViewDirection {
        self.view_direction
    }

    fn current_plane(&self) -> Option<PlaneGeometry> {
        self.plane
    }

    fn scale_factor_mm_per_display_unit(&self) -> f64 {
        self.mm_per_display_unit
    }

    fn display_to_plane(&self, display: Point) -> Point {
        self.display_origin_mm + display.to_vec2() * self.mm_per_display_unit
    }
}

/// An ordered collection of [`SliceViewport`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewportSet {
    viewports: Vec<SliceViewport>,
}

impl ViewportSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self {
            viewports: Vec::new(),
        }
    }

    /// Add a viewport, replacing any with the same id.
    pub fn insert(&mut self, viewport: SliceViewport) {
        match self.viewports.iter_mut().find(|v| v.id == viewport.id) {
            Some(slot) => *slot = viewport,
            None => self.viewports.push(viewport),
        }
    }

    /// Remove a viewport by id.
    pub fn remove(&mut self, id: RendererId) -> Option<SliceViewport> {
        let i = self.viewports.iter().position(|v| v.id == id)?;
        Some(self.viewports.remove(i))
    }

    /// A viewport by id.
    pub fn get(&self, id: RendererId) -> Option<&SliceViewport> {
        self.viewports.iter().find(|v| v.id == id)
    }

    /// Mutable access to a viewport by id.
    pub fn get_mut(&mut self, id: RendererId) -> Option<&mut SliceViewport> {
        self.viewports.iter_mut().find(|v| v.id == id)
    }

    /// Number of viewports.
    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }
}

impl FromIterator<SliceViewport> for ViewportSet {
    fn from_iter<I: IntoIterator<Item = SliceViewport>>(iter: I) -> Self {
        let mut set = Self::new();
        for v in iter {
            set.insert(v);
        }
        set
    }
}

impl RenderingManager for ViewportSet {
    fn renderers(&self) -> Vec<&dyn Renderer> {
        self.viewports.iter().map(|v| v as &dyn Renderer).collect()
    }

    fn renderer(&self, id: RendererId) -> Option<&dyn Renderer> {
        self.get(id).map(|v| v as &dyn Renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_and_replacement() {
        let mut set: ViewportSet = SliceViewport::standard_triple(1, DVec3::ZERO, DVec3::ONE)
            .into_iter()
            .collect();
        set.insert(SliceViewport::volume(RendererId(4)));
        assert_eq!(set.len(), 4);
        assert_eq!(
            set.renderer(RendererId(2)).map(|r| r.view_direction()),
            Some(ViewDirection::Sagittal)
        );
        assert_eq!(
            set.renderer(RendererId(4)).map(|r| r.mapper_kind()),
            Some(MapperKind::Volume3D)
        );
        set.insert(SliceViewport::volume(RendererId(2)));
        assert_eq!(set.len(), 4);
        assert!(set.renderer(RendererId(2)).is_some_and(|r| r.current_plane().is_none()));
        assert!(set.remove(RendererId(9)).is_none());
        assert!(set.renderer(RendererId(9)).is_none());
        assert_eq!(set.get(RendererId(3)).map(|v| v.id()), Some(RendererId(3)));
    }

    #[test]
    fn display_to_plane_applies_scale_and_origin() {
        let v = SliceViewport::new(
            RendererId(1),
            ViewDirection::Axial,
            PlaneGeometry::axial(DVec3::ZERO, DVec3::ONE),
        )
        .with_scale(0.5)
        .with_display_origin(Point::new(10.0, 20.0));
        assert_eq!(v.display_to_plane(Point::new(4.0, 8.0)), Point::new(12.0, 24.0));
    }

    #[test]
    fn shared_manager_delegates() {
        let set = Rc::new(ViewportSet::from_iter(SliceViewport::standard_triple(
            0,
            DVec3::ZERO,
            DVec3::ONE,
        )));
        assert_eq!(set.renderers().len(), 3);
        assert_eq!(
            set.renderer(RendererId(0)).map(|r| r.controller()),
            Some(ControllerId(0))
        );
    }
}
