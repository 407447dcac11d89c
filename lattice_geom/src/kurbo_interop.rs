// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between Kurbo's 2D types and the `f64` 2D primitives.

use crate::aabb::Aabb;
use crate::point::Point;
use crate::shapes::Sphere;
use crate::traits::{Bounded, Positioned};

impl From<kurbo::Point> for Point<f64, 2> {
    fn from(p: kurbo::Point) -> Self {
        Self([p.x, p.y])
    }
}

impl From<Point<f64, 2>> for kurbo::Point {
    fn from(p: Point<f64, 2>) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<kurbo::Rect> for Aabb<f64, 2> {
    /// Kurbo rectangles may have negative width or height; the box is normalized.
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        Self::new(Point([r.x0, r.y0]), Point([r.x1, r.y1]))
    }
}

impl From<Aabb<f64, 2>> for kurbo::Rect {
    fn from(b: Aabb<f64, 2>) -> Self {
        Self::new(b.min[0], b.min[1], b.max[0], b.max[1])
    }
}

impl From<kurbo::Circle> for Sphere<f64, 2> {
    fn from(c: kurbo::Circle) -> Self {
        Self::new(c.center.into(), c.radius)
    }
}

impl Positioned<f64, 2> for kurbo::Point {
    fn position(&self) -> Point<f64, 2> {
        (*self).into()
    }
}

impl Bounded<f64, 2> for kurbo::Rect {
    fn bounding_box(&self) -> Aabb<f64, 2> {
        (*self).into()
    }
}

impl Bounded<f64, 2> for kurbo::Circle {
    fn bounding_box(&self) -> Aabb<f64, 2> {
        Sphere::from(*self).bounding_box()
    }
}
