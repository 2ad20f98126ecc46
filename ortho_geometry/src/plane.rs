// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Oriented cutting planes with spacing.

use glam::{DMat3, DVec3};

use crate::{EPS, Line3};

/// A viewport's cutting plane in world space.
///
/// The plane is described by an origin and an index-to-world matrix whose columns are
/// the right axis, the down axis and the normal, each scaled by the spacing along that
/// axis. Index coordinates `(i, j, k)` map to `origin + i * right + j * down + k * normal`.
///
/// ## Orientation
///
/// The normal is always `right × down`, normalized. The three standard orientations
/// follow the usual radiological convention:
///
/// | Constructor | right | down | normal |
/// | --- | --- | --- | --- |
/// | [`axial`](Self::axial) | +x | +y | +z |
/// | [`sagittal`](Self::sagittal) | +y | +z | +x |
/// | [`coronal`](Self::coronal) | +x | +z | -y |
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneGeometry {
    origin: DVec3,
    normal: DVec3,
    index_to_world: DMat3,
}

impl PlaneGeometry {
    /// Create a plane from an origin, two in-plane directions and a per-axis spacing.
    ///
    /// `right` and `down` are normalized before use. Returns `None` when they are
    /// parallel (or zero) or when any spacing component is not strictly positive.
    pub fn new(origin: DVec3, right: DVec3, down: DVec3, spacing: DVec3) -> Option<Self> {
        if spacing.min_element() <= 0.0 || !spacing.is_finite() {
            return None;
        }
        let right = right.try_normalize()?;
        let down = down.try_normalize()?;
        let cross = right.cross(down);
        if cross.length() < EPS {
            return None;
        }
        let normal = cross.normalize();
        Some(Self {
            origin,
            normal,
            index_to_world: DMat3::from_cols(
                right * spacing.x,
                down * spacing.y,
                normal * spacing.z,
            ),
        })
    }

    /// Axial (transversal) plane through `origin`: normal along +z.
    pub fn axial(origin: DVec3, spacing: DVec3) -> Self {
        Self::standard(origin, DVec3::X, DVec3::Y, DVec3::Z, spacing)
    }

    /// Sagittal plane through `origin`: normal along +x.
    pub fn sagittal(origin: DVec3, spacing: DVec3) -> Self {
        Self::standard(origin, DVec3::Y, DVec3::Z, DVec3::X, spacing)
    }

    /// Coronal (frontal) plane through `origin`: normal along -y.
    pub fn coronal(origin: DVec3, spacing: DVec3) -> Self {
        Self::standard(origin, DVec3::X, DVec3::Z, DVec3::NEG_Y, spacing)
    }

    fn standard(origin: DVec3, right: DVec3, down: DVec3, normal: DVec3, spacing: DVec3) -> Self {
        let spacing = spacing.abs().max(DVec3::splat(EPS));
        Self {
            origin,
            normal,
            index_to_world: DMat3::from_cols(
                right * spacing.x,
                down * spacing.y,
                normal * spacing.z,
            ),
        }
    }

    /// World position of index `(0, 0, 0)`.
    pub const fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Unit normal of the plane.
    pub const fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Spacing along the right, down and normal axes.
    pub fn spacing(&self) -> DVec3 {
        DVec3::new(
            self.index_to_world.x_axis.length(),
            self.index_to_world.y_axis.length(),
            self.index_to_world.z_axis.length(),
        )
    }

    /// Map an index-space point to world space.
    pub fn index_to_world_point(&self, index: DVec3) -> DVec3 {
        self.origin + self.index_to_world * index
    }

    /// Map an index-space vector to world space (no translation).
    pub fn index_to_world_vector(&self, index: DVec3) -> DVec3 {
        self.index_to_world * index
    }

    /// Map a world-space point to index space.
    pub fn world_to_index_point(&self, world: DVec3) -> DVec3 {
        self.index_to_world.inverse() * (world - self.origin)
    }

    /// Signed distance of `p` from the plane, positive on the normal side.
    pub fn signed_distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p - self.origin)
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn project(&self, p: DVec3) -> DVec3 {
        p - self.normal * self.signed_distance(p)
    }

    /// Whether the two planes have parallel normals.
    pub fn is_parallel(&self, other: &Self) -> bool {
        self.normal.cross(other.normal).length() < EPS
    }

    /// The line along which this plane and `other` cross.
    ///
    /// Returns `None` for parallel planes. The direction is `self.normal × other.normal`,
    /// normalized.
    pub fn intersection_line(&self, other: &Self) -> Option<Line3> {
        let direction = self.normal.cross(other.normal);
        let len_sq = direction.length_squared();
        if len_sq.sqrt() < EPS {
            return None;
        }
        let d1 = self.normal.dot(self.origin);
        let d2 = other.normal.dot(other.origin);
        // Solves n1·x = d1 and n2·x = d2 for the point closest to the world origin.
        let point = (other.normal.cross(direction) * d1 + direction.cross(self.normal) * d2)
            / len_sq;
        Some(Line3::new(point, direction / len_sq.sqrt()))
    }

    /// The point where `line` pierces this plane.
    ///
    /// Returns `None` when the line runs parallel to the plane (including lines lying in it).
    pub fn intersection_point(&self, line: &Line3) -> Option<DVec3> {
        let direction = line.direction();
        let denom = self.normal.dot(direction);
        if denom.abs() < EPS * direction.length().max(1.0) {
            return None;
        }
        let t = self.normal.dot(self.origin - line.point1()) / denom;
        Some(line.point1() + direction * t)
    }
}
