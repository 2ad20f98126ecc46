// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Infinite lines in world space.

use glam::DVec3;

use crate::EPS;

/// An infinite line through [`point1`](Self::point1) along [`direction`](Self::direction).
///
/// The direction is stored as given; it need not be unit length. A zero direction
/// degenerates to a single point, and distance queries then measure to that point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line3 {
    point: DVec3,
    direction: DVec3,
}

impl Line3 {
    /// Create a line through `point` along `direction`.
    pub const fn new(point: DVec3, direction: DVec3) -> Self {
        Self { point, direction }
    }

    /// Create the line through two points.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        Self::new(a, b - a)
    }

    /// The anchor point of the line.
    pub const fn point1(&self) -> DVec3 {
        self.point
    }

    /// The anchor point advanced by one direction vector.
    pub fn point2(&self) -> DVec3 {
        self.point + self.direction
    }

    /// The (not necessarily normalized) direction of the line.
    pub const fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Closest point on the line to `p`.
    pub fn project(&self, p: DVec3) -> DVec3 {
        let len_sq = self.direction.length_squared();
        if len_sq < EPS * EPS {
            return self.point;
        }
        let t = (p - self.point).dot(self.direction) / len_sq;
        self.point + self.direction * t
    }

    /// Perpendicular distance from `p` to the line.
    pub fn distance(&self, p: DVec3) -> f64 {
        p.distance(self.project(p))
    }

    /// Whether both lines run in the same (or opposite) direction.
    ///
    /// Degenerate lines are never parallel to anything.
    pub fn is_parallel(&self, other: &Self) -> bool {
        let (Some(a), Some(b)) = (
            self.direction.try_normalize(),
            other.direction.try_normalize(),
        ) else {
            return false;
        };
        a.cross(b).length() < EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_perpendicular() {
        let line = Line3::new(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0));
        assert!((line.distance(DVec3::new(7.0, 3.0, 4.0)) - 5.0).abs() < 1e-12);
        assert!(line.distance(DVec3::new(-100.0, 0.0, 0.0)) < 1e-12);
    }

    #[test]
    fn project_lands_on_line() {
        let line = Line3::from_points(DVec3::new(1.0, 1.0, 0.0), DVec3::new(1.0, 5.0, 0.0));
        let p = line.project(DVec3::new(9.0, 3.0, 2.0));
        assert_eq!(p, DVec3::new(1.0, 3.0, 0.0));
        assert_eq!(line.point2(), DVec3::new(1.0, 5.0, 0.0));
    }

    #[test]
    fn parallel_ignores_length_and_sign() {
        let a = Line3::new(DVec3::ZERO, DVec3::Y);
        let b = Line3::new(DVec3::X, DVec3::new(0.0, -3.0, 0.0));
        let c = Line3::new(DVec3::ZERO, DVec3::new(0.0, 1.0, 0.1));
        assert!(a.is_parallel(&b));
        assert!(!a.is_parallel(&c));
    }

    #[test]
    fn degenerate_line_acts_as_point() {
        let line = Line3::new(DVec3::new(1.0, 2.0, 3.0), DVec3::ZERO);
        assert_eq!(line.project(DVec3::ZERO), DVec3::new(1.0, 2.0, 3.0));
        assert!(!line.is_parallel(&line));
    }
}
