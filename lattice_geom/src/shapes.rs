// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spheres, triangles, planes, and segments.

use crate::aabb::Aabb;
use crate::point::Point;
use crate::scalar::Scalar;

/// A closed ball: every point at distance `<= radius` from `center`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere<T, const D: usize> {
    /// Center.
    pub center: Point<T, D>,
    /// Radius (non-negative).
    pub radius: T,
}

impl<T: Scalar, const D: usize> Sphere<T, D> {
    /// Create a sphere.
    pub const fn new(center: Point<T, D>, radius: T) -> Self {
        Self { center, radius }
    }

    /// Whether the radius is negative, so the sphere holds no point.
    pub fn is_empty(&self) -> bool {
        self.radius < T::ZERO
    }

    /// Whether `p` lies inside or on the sphere.
    pub fn contains(&self, p: &Point<T, D>) -> bool {
        self.radius >= T::ZERO && self.center.distance_squared(p) <= self.radius * self.radius
    }

    /// Whether the sphere overlaps `aabb`.
    pub fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool {
        self.radius >= T::ZERO
            && aabb.distance_squared_to_point(&self.center) <= self.radius * self.radius
    }

    /// Tight axis-aligned bounds.
    pub fn bounding_box(&self) -> Aabb<T, D> {
        Aabb::from_center_half_extents(self.center, Point::splat(self.radius))
    }
}

/// A triangle (mesh face) with vertices `a`, `b`, `c`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle<T, const D: usize> {
    /// First vertex.
    pub a: Point<T, D>,
    /// Second vertex.
    pub b: Point<T, D>,
    /// Third vertex.
    pub c: Point<T, D>,
}

impl<T: Scalar, const D: usize> Triangle<T, D> {
    /// Create a triangle.
    pub const fn new(a: Point<T, D>, b: Point<T, D>, c: Point<T, D>) -> Self {
        Self { a, b, c }
    }

    /// Vertices in order.
    pub fn vertices(&self) -> [Point<T, D>; 3] {
        [self.a, self.b, self.c]
    }

    /// Tight axis-aligned bounds.
    pub fn bounding_box(&self) -> Aabb<T, D> {
        Aabb::from_points(self.vertices())
    }

    /// Closest point of the triangle (interior included) to `p`.
    ///
    /// Voronoi-region walk over the vertices, edges, and face; only dot
    /// products are used, so this works in any dimension.
    pub fn closest_point(&self, p: &Point<T, D>) -> Point<T, D> {
        let (a, b, c) = (self.a, self.b, self.c);
        let ab = b - a;
        let ac = c - a;
        let ap = *p - a;

        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= T::ZERO && d2 <= T::ZERO {
            return a;
        }

        let bp = *p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= T::ZERO && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= T::ZERO && d1 >= T::ZERO && d3 <= T::ZERO {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = *p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= T::ZERO && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= T::ZERO && d2 >= T::ZERO && d6 <= T::ZERO {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= T::ZERO && (d4 - d3) >= T::ZERO && (d5 - d6) >= T::ZERO {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = T::ONE / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }
}

impl<T: Scalar> Triangle<T, 3> {
    /// Unnormalized face normal (`(b - a) x (c - a)`).
    pub fn normal(&self) -> Point<T, 3> {
        (self.b - self.a).cross(&(self.c - self.a))
    }
}

/// A hyperplane `{ x : normal . x = offset }`.
///
/// The normal does not have to be unit length; signed distances are scaled
/// by its length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane<T, const D: usize> {
    /// Plane normal.
    pub normal: Point<T, D>,
    /// Offset along the normal.
    pub offset: T,
}

impl<T: Scalar, const D: usize> Plane<T, D> {
    /// Create a plane from a normal and offset.
    pub const fn new(normal: Point<T, D>, offset: T) -> Self {
        Self { normal, offset }
    }

    /// Plane through `point` with the given `normal`.
    pub fn from_point_normal(point: Point<T, D>, normal: Point<T, D>) -> Self {
        Self {
            normal,
            offset: normal.dot(&point),
        }
    }

    /// Copy with a unit-length normal. Degenerate normals are kept as-is.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.normal.norm();
        if len > T::ZERO {
            Self {
                normal: self.normal * (T::ONE / len),
                offset: self.offset / len,
            }
        } else {
            self
        }
    }

    /// Signed distance of `p` (positive on the normal side).
    pub fn signed_distance(&self, p: &Point<T, D>) -> T {
        self.normal.dot(p) - self.offset
    }
}

/// A closed line segment from `p0` to `p1`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment<T, const D: usize> {
    /// Start point.
    pub p0: Point<T, D>,
    /// End point.
    pub p1: Point<T, D>,
}

impl<T: Scalar, const D: usize> Segment<T, D> {
    /// Create a segment.
    pub const fn new(p0: Point<T, D>, p1: Point<T, D>) -> Self {
        Self { p0, p1 }
    }

    /// Tight axis-aligned bounds.
    pub fn bounding_box(&self) -> Aabb<T, D> {
        Aabb::from_points([self.p0, self.p1])
    }

    /// Closest point of the segment to `p`.
    pub fn closest_point(&self, p: &Point<T, D>) -> Point<T, D> {
        let d = self.p1 - self.p0;
        let len2 = d.norm_squared();
        if len2 <= T::ZERO {
            return self.p0;
        }
        let t = (d.dot(&(*p - self.p0)) / len2).clamp_s(T::ZERO, T::ONE);
        self.p0 + d * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Triangle<f64, 3> {
        Triangle::new(
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
        )
    }

    #[test]
    fn negative_radius_holds_nothing() {
        let s = Sphere::new(Point::new([0.0, 0.0, 0.0]), -1.0);
        assert!(s.is_empty());
        assert!(!s.contains(&Point::new([0.0, 0.0, 0.0])));
        assert!(!s.intersects_aabb(&Aabb::new(Point::splat(-1.0), Point::splat(1.0))));
        assert!(s.bounding_box().is_empty());
        let zero = Sphere::new(Point::new([0.0, 0.0, 0.0]), 0.0);
        assert!(!zero.is_empty());
        assert!(zero.contains(&Point::new([0.0, 0.0, 0.0])));
    }

    #[test]
    fn closest_point_regions() {
        let t = tri();
        // Face interior: projection onto the plane.
        assert_eq!(
            t.closest_point(&Point::new([0.25, 0.25, 3.0])),
            Point::new([0.25, 0.25, 0.0])
        );
        // Vertex region.
        assert_eq!(t.closest_point(&Point::new([-1.0, -1.0, 0.0])), t.a);
        // Edge region (hypotenuse).
        let q = t.closest_point(&Point::new([1.0, 1.0, 0.0]));
        assert!((q[0] - 0.5).abs() < 1e-12 && (q[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn sphere_contains_boundary() {
        let s = Sphere::new(Point::new([0.0_f64, 0.0]), 1.0);
        assert!(s.contains(&Point::new([1.0, 0.0])));
        assert!(!s.contains(&Point::new([1.0, 0.1])));
    }

    #[test]
    fn plane_signed_distance() {
        let p = Plane::from_point_normal(Point::new([0.0_f64, 0.0, 2.0]), Point::new([0.0, 0.0, 2.0]))
            .normalized();
        assert_eq!(p.signed_distance(&Point::new([5.0, 5.0, 3.0])), 1.0);
        assert_eq!(p.signed_distance(&Point::new([5.0, 5.0, 0.0])), -2.0);
    }

    #[test]
    fn segment_closest_point_clamps() {
        let s = Segment::new(Point::new([0.0_f64, 0.0]), Point::new([2.0, 0.0]));
        assert_eq!(s.closest_point(&Point::new([-1.0, 1.0])), Point::new([0.0, 0.0]));
        assert_eq!(s.closest_point(&Point::new([1.0, 1.0])), Point::new([1.0, 0.0]));
    }
}
