// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lattice Geom: D-dimensional primitives and predicate dispatch.
//!
//! Lattice Geom is the geometry layer underneath `lattice_grid`.
//!
//! - Primitives generic over a floating [`Scalar`] and a const dimension `D`:
//!   [`Point`], [`Aabb`], [`Sphere`], [`Triangle`], [`Plane`], [`Segment`].
//! - Collaborator traits [`Positioned`] (vertex-like values) and [`Bounded`]
//!   (anything with an axis-aligned bounding box).
//! - Compile-time predicate dispatch: [`Intersects`] and [`Distance`] are
//!   implemented per primitive pair, in both argument orders.
//!
//! # Example
//!
//! ```rust
//! use lattice_geom::{Aabb, Point, Triangle, intersects, distance};
//!
//! let face = Triangle::new(
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//! );
//! let cell = Aabb::new(Point::new([0.2, 0.2, -0.1]), Point::new([0.3, 0.3, 0.1]));
//! assert!(intersects(&face, &cell));
//! assert_eq!(distance(&Point::new([0.25, 0.25, 2.0]), &face), 2.0);
//! ```
//!
//! ## Features
//!
//! - `kurbo` (default): conversions from `kurbo::Point`, `kurbo::Rect` and
//!   `kurbo::Circle`, and [`Positioned`]/[`Bounded`] impls for them.
//!
//! ### Float semantics
//!
//! Coordinates are assumed to be free of NaNs. Boxes and spheres are closed:
//! touching shapes intersect.

pub mod aabb;
pub mod point;
pub mod predicates;
pub mod scalar;
pub mod shapes;
pub mod traits;

#[cfg(feature = "kurbo")]
mod kurbo_interop;

pub use aabb::Aabb;
pub use point::{Point, Point2, Point3};
pub use predicates::{
    Distance, Intersects, distance, distance_opt, intersects, intersects_opt,
    plane_segment_intersection,
};
pub use scalar::Scalar;
pub use shapes::{Plane, Segment, Sphere, Triangle};
pub use traits::{Bounded, Positioned};
