// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=ortho_geometry --heading-base-level=0

//! Ortho Geometry: plane and line primitives for multi-planar slice viewers.
//!
//! ## Overview
//!
//! Each 2D viewport of a slice viewer shows one cutting plane through a 3D volume.
//! Interaction code reasons about how those planes relate to each other: where two
//! planes cross, how far the cursor is from a crossing line, and where three planes
//! meet. This crate provides exactly those queries and nothing more.
//!
//! - [`PlaneGeometry`]: an oriented plane with per-axis spacing and an index-to-world mapping.
//! - [`Line3`]: an infinite 3D line given by a point and a direction.
//! - [`EPS`]: the shared tolerance for parallelism and coincidence tests.
//!
//! Degenerate configurations (parallel planes, a line parallel to a plane) are
//! reported as `None` rather than as errors. Callers treat them as ordinary
//! negative outcomes.
//!
//! ## Example
//!
//! ```
//! use glam::DVec3;
//! use ortho_geometry::PlaneGeometry;
//!
//! let axial = PlaneGeometry::axial(DVec3::new(0.0, 0.0, 10.0), DVec3::ONE);
//! let sagittal = PlaneGeometry::sagittal(DVec3::new(5.0, 0.0, 0.0), DVec3::ONE);
//!
//! let line = axial.intersection_line(&sagittal).unwrap();
//! // The crossing line runs along y at x = 5, z = 10.
//! assert!(line.distance(DVec3::new(5.0, 42.0, 10.0)) < 1e-9);
//! assert!((line.distance(DVec3::new(8.0, 0.0, 10.0)) - 3.0).abs() < 1e-9);
//! ```
//!
//! This crate requires `std`.

mod line;
mod plane;

pub use line::Line3;
pub use plane::PlaneGeometry;

/// Tolerance used for parallelism and coincidence tests.
///
/// This is one hundred times the single-precision machine epsilon, small enough to
/// separate distinct slice lines and large enough to absorb round-off from
/// intersecting double-precision planes.
pub const EPS: f64 = 100.0 * f32::EPSILON as f64;
