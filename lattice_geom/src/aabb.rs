// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes in `D` dimensions.

use crate::point::Point;
use crate::scalar::Scalar;

/// Axis-aligned bounding box.
///
/// Bounds are closed on both ends: a point on the boundary is contained.
/// An inverted box (some `max < min`) is empty; [`Aabb::empty`] returns the
/// canonical empty box that acts as the identity for [`Aabb::union`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb<T, const D: usize> {
    /// Minimum corner.
    pub min: Point<T, D>,
    /// Maximum corner.
    pub max: Point<T, D>,
}

impl<T, const D: usize> Aabb<T, D> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min: Point<T, D>, max: Point<T, D>) -> Self {
        Self { min, max }
    }
}

impl<T: Scalar, const D: usize> Aabb<T, D> {
    /// The empty box: `min = +MAX`, `max = -MAX`.
    pub fn empty() -> Self {
        Self {
            min: Point::splat(T::MAX),
            max: Point::splat(-T::MAX),
        }
    }

    /// Box around a single point (zero volume).
    pub fn from_point(p: Point<T, D>) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box enclosing all `points`. Empty if there are none.
    pub fn from_points<I: IntoIterator<Item = Point<T, D>>>(points: I) -> Self {
        points.into_iter().fold(Self::empty(), |acc, p| acc.with_point(p))
    }

    /// Box from a center and per-axis half extents.
    pub fn from_center_half_extents(center: Point<T, D>, half: Point<T, D>) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Return true if the AABB is empty or inverted on any axis.
    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.max[i] < self.min[i])
    }

    /// Whether this AABB contains the point (boundary included).
    pub fn contains_point(&self, p: &Point<T, D>) -> bool {
        (0..D).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    /// Whether this AABB and `other` share at least one point.
    pub fn intersects_aabb(&self, other: &Self) -> bool {
        (0..D).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    /// The intersection of two AABBs (possibly empty).
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Grow to include `p`.
    #[must_use]
    pub fn with_point(self, p: Point<T, D>) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Union of two AABBs.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow the box by `margin` on every side.
    #[must_use]
    pub fn inflate(self, margin: T) -> Self {
        Self {
            min: self.min.map(|c| c - margin),
            max: self.max.map(|c| c + margin),
        }
    }

    /// Center point.
    pub fn center(&self) -> Point<T, D> {
        let half = T::from_f64(0.5);
        (self.min + self.max) * half
    }

    /// Per-axis half extents.
    pub fn half_extents(&self) -> Point<T, D> {
        (self.max - self.min) * T::from_f64(0.5)
    }

    /// Per-axis extents (`max - min`).
    pub fn size(&self) -> Point<T, D> {
        self.max - self.min
    }

    /// Largest per-axis extent.
    pub fn max_extent(&self) -> T {
        let size = self.size();
        size.0.iter().fold(T::ZERO, |m, &s| m.max_s(s))
    }

    /// Closest point of the box to `p` (`p` itself when inside).
    pub fn closest_point(&self, p: &Point<T, D>) -> Point<T, D> {
        let mut out = *p;
        for i in 0..D {
            out[i] = p[i].clamp_s(self.min[i], self.max[i]);
        }
        out
    }

    /// Squared distance from `p` to the box; zero when inside.
    pub fn distance_squared_to_point(&self, p: &Point<T, D>) -> T {
        self.closest_point(p).distance_squared(p)
    }

    /// Whether every coordinate of both corners is finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}
