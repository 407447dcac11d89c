// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance and intersection predicates over pairs of primitives.
//!
//! Dispatch is resolved at compile time: each supported pair implements
//! [`Intersects`] and/or [`Distance`], and an unsupported pair is a trait-bound
//! error at the call site. Every pair is implemented in both argument orders
//! and the mirrored impl forwards to the primary one, so `(a, b)` and `(b, a)`
//! always agree.
//!
//! Nullable forms go through [`intersects_opt`] and [`distance_opt`]: a `None`
//! on either side yields `false` / `None`.
//!
//! ```
//! use lattice_geom::{Aabb, Point, Sphere, intersects, distance};
//!
//! let b = Aabb::new(Point::new([0.0, 0.0]), Point::new([1.0, 1.0]));
//! let s = Sphere::new(Point::new([2.0, 0.5]), 1.0);
//! assert!(intersects(&s, &b));
//! assert!(intersects(&b, &s));
//! assert_eq!(distance(&Point::new([3.0, 0.5]), &b), 2.0);
//! ```

use crate::aabb::Aabb;
use crate::point::Point;
use crate::scalar::Scalar;
use crate::shapes::{Plane, Segment, Sphere, Triangle};

/// Boolean overlap test between `Self` and `Rhs`.
pub trait Intersects<Rhs: ?Sized = Self> {
    /// Whether the two shapes share at least one point.
    fn intersects(&self, other: &Rhs) -> bool;
}

/// Euclidean distance between `Self` and `Rhs` (zero when they overlap).
pub trait Distance<Rhs: ?Sized = Self> {
    /// Scalar type of the distance.
    type Output;

    /// Distance between the closest points of the two shapes.
    fn distance(&self, other: &Rhs) -> Self::Output;
}

/// Whether `a` and `b` intersect.
#[inline]
pub fn intersects<A: Intersects<B> + ?Sized, B: ?Sized>(a: &A, b: &B) -> bool {
    a.intersects(b)
}

/// Distance between `a` and `b`.
#[inline]
pub fn distance<A: Distance<B> + ?Sized, B: ?Sized>(a: &A, b: &B) -> A::Output {
    a.distance(b)
}

/// Nullable form of [`intersects`]; `false` when either side is `None`.
#[inline]
pub fn intersects_opt<A: Intersects<B> + ?Sized, B: ?Sized>(a: Option<&A>, b: Option<&B>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.intersects(b),
        _ => false,
    }
}

/// Nullable form of [`distance`]; `None` when either side is `None`.
#[inline]
pub fn distance_opt<A: Distance<B> + ?Sized, B: ?Sized>(
    a: Option<&A>,
    b: Option<&B>,
) -> Option<A::Output> {
    Some(a?.distance(b?))
}

/// Point where `segment` crosses `plane`, if it does.
///
/// The point is found by interpolating the signed distances of the two
/// endpoints. A segment lying in the plane reports its start point.
pub fn plane_segment_intersection<T: Scalar, const D: usize>(
    plane: &Plane<T, D>,
    segment: &Segment<T, D>,
) -> Option<Point<T, D>> {
    let d0 = plane.signed_distance(&segment.p0);
    let d1 = plane.signed_distance(&segment.p1);
    if (d0 > T::ZERO && d1 > T::ZERO) || (d0 < T::ZERO && d1 < T::ZERO) {
        return None;
    }
    if d0 == d1 {
        return Some(segment.p0);
    }
    let t = d0 / (d0 - d1);
    Some(segment.p0 + (segment.p1 - segment.p0) * t)
}

macro_rules! mirror_intersects {
    ([$($gen:tt)*] $a:ty => $b:ty) => {
        impl<$($gen)*> Intersects<$a> for $b {
            #[inline]
            fn intersects(&self, other: &$a) -> bool {
                <$a as Intersects<$b>>::intersects(other, self)
            }
        }
    };
}

macro_rules! mirror_distance {
    ([$($gen:tt)*] $a:ty => $b:ty) => {
        impl<$($gen)*> Distance<$a> for $b {
            type Output = T;

            #[inline]
            fn distance(&self, other: &$a) -> T {
                <$a as Distance<$b>>::distance(other, self)
            }
        }
    };
}

// Intersections.

impl<T: Scalar, const D: usize> Intersects<Aabb<T, D>> for Point<T, D> {
    fn intersects(&self, other: &Aabb<T, D>) -> bool {
        other.contains_point(self)
    }
}
mirror_intersects!([T: Scalar, const D: usize] Point<T, D> => Aabb<T, D>);

impl<T: Scalar, const D: usize> Intersects<Sphere<T, D>> for Point<T, D> {
    fn intersects(&self, other: &Sphere<T, D>) -> bool {
        other.contains(self)
    }
}
mirror_intersects!([T: Scalar, const D: usize] Point<T, D> => Sphere<T, D>);

impl<T: Scalar, const D: usize> Intersects for Aabb<T, D> {
    fn intersects(&self, other: &Self) -> bool {
        self.intersects_aabb(other)
    }
}

impl<T: Scalar, const D: usize> Intersects for Sphere<T, D> {
    fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let r = self.radius + other.radius;
        self.center.distance_squared(&other.center) <= r * r
    }
}

impl<T: Scalar, const D: usize> Intersects<Aabb<T, D>> for Sphere<T, D> {
    fn intersects(&self, other: &Aabb<T, D>) -> bool {
        self.intersects_aabb(other)
    }
}
mirror_intersects!([T: Scalar, const D: usize] Sphere<T, D> => Aabb<T, D>);

impl<T: Scalar, const D: usize> Intersects<Sphere<T, D>> for Triangle<T, D> {
    fn intersects(&self, other: &Sphere<T, D>) -> bool {
        other.contains(&self.closest_point(&other.center))
    }
}
mirror_intersects!([T: Scalar, const D: usize] Triangle<T, D> => Sphere<T, D>);

impl<T: Scalar, const D: usize> Intersects<Sphere<T, D>> for Segment<T, D> {
    fn intersects(&self, other: &Sphere<T, D>) -> bool {
        other.contains(&self.closest_point(&other.center))
    }
}
mirror_intersects!([T: Scalar, const D: usize] Segment<T, D> => Sphere<T, D>);

impl<T: Scalar, const D: usize> Intersects<Aabb<T, D>> for Plane<T, D> {
    fn intersects(&self, other: &Aabb<T, D>) -> bool {
        let center = other.center();
        let half = other.half_extents();
        let mut r = T::ZERO;
        for i in 0..D {
            r += half[i] * self.normal[i].abs();
        }
        self.signed_distance(&center).abs() <= r
    }
}
mirror_intersects!([T: Scalar, const D: usize] Plane<T, D> => Aabb<T, D>);

impl<T: Scalar, const D: usize> Intersects<Segment<T, D>> for Plane<T, D> {
    fn intersects(&self, other: &Segment<T, D>) -> bool {
        plane_segment_intersection(self, other).is_some()
    }
}
mirror_intersects!([T: Scalar, const D: usize] Plane<T, D> => Segment<T, D>);

impl<T: Scalar> Intersects<Aabb<T, 3>> for Triangle<T, 3> {
    /// Separating-axis test: the three box axes, the triangle normal, and the
    /// nine cross products of box axes with triangle edges.
    fn intersects(&self, other: &Aabb<T, 3>) -> bool {
        let c = other.center();
        let h = other.half_extents();
        let v = [self.a - c, self.b - c, self.c - c];

        // Box face normals: compare the triangle's bounds with the box.
        for i in 0..3 {
            let lo = v[0][i].min_s(v[1][i]).min_s(v[2][i]);
            let hi = v[0][i].max_s(v[1][i]).max_s(v[2][i]);
            if lo > h[i] || hi < -h[i] {
                return false;
            }
        }

        let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];
        let mut unit = [Point::origin(); 3];
        for (i, u) in unit.iter_mut().enumerate() {
            u[i] = T::ONE;
        }
        for u in &unit {
            for e in &edges {
                if separated_on_axis(&u.cross(e), &v, &h) {
                    return false;
                }
            }
        }

        // Triangle plane against the box.
        let n = edges[0].cross(&edges[1]);
        !separated_on_axis(&n, &v, &h)
    }
}
mirror_intersects!([T: Scalar] Triangle<T, 3> => Aabb<T, 3>);

/// Whether projecting the (box-centered) triangle `v` and the box with half
/// extents `h` onto `axis` gives disjoint intervals.
fn separated_on_axis<T: Scalar>(axis: &Point<T, 3>, v: &[Point<T, 3>; 3], h: &Point<T, 3>) -> bool {
    let p0 = axis.dot(&v[0]);
    let p1 = axis.dot(&v[1]);
    let p2 = axis.dot(&v[2]);
    let r = h[0] * axis[0].abs() + h[1] * axis[1].abs() + h[2] * axis[2].abs();
    let lo = p0.min_s(p1).min_s(p2);
    let hi = p0.max_s(p1).max_s(p2);
    lo > r || hi < -r
}

// Distances.

impl<T: Scalar, const D: usize> Distance for Point<T, D> {
    type Output = T;

    fn distance(&self, other: &Self) -> T {
        Self::distance(self, other)
    }
}

impl<T: Scalar, const D: usize> Distance<Aabb<T, D>> for Point<T, D> {
    type Output = T;

    fn distance(&self, other: &Aabb<T, D>) -> T {
        other.distance_squared_to_point(self).sqrt()
    }
}
mirror_distance!([T: Scalar, const D: usize] Point<T, D> => Aabb<T, D>);

impl<T: Scalar, const D: usize> Distance<Sphere<T, D>> for Point<T, D> {
    type Output = T;

    fn distance(&self, other: &Sphere<T, D>) -> T {
        (Self::distance(self, &other.center) - other.radius).max_s(T::ZERO)
    }
}
mirror_distance!([T: Scalar, const D: usize] Point<T, D> => Sphere<T, D>);

impl<T: Scalar, const D: usize> Distance<Triangle<T, D>> for Point<T, D> {
    type Output = T;

    fn distance(&self, other: &Triangle<T, D>) -> T {
        Self::distance(self, &other.closest_point(self))
    }
}
mirror_distance!([T: Scalar, const D: usize] Point<T, D> => Triangle<T, D>);

impl<T: Scalar, const D: usize> Distance<Segment<T, D>> for Point<T, D> {
    type Output = T;

    fn distance(&self, other: &Segment<T, D>) -> T {
        Self::distance(self, &other.closest_point(self))
    }
}
mirror_distance!([T: Scalar, const D: usize] Point<T, D> => Segment<T, D>);

impl<T: Scalar, const D: usize> Distance<Plane<T, D>> for Point<T, D> {
    type Output = T;

    fn distance(&self, other: &Plane<T, D>) -> T {
        let len = other.normal.norm();
        if len > T::ZERO {
            other.signed_distance(self).abs() / len
        } else {
            T::ZERO
        }
    }
}
mirror_distance!([T: Scalar, const D: usize] Point<T, D> => Plane<T, D>);

#[cfg(test)]
mod tests {
    use super::*;

    fn p3(x: f64, y: f64, z: f64) -> Point<f64, 3> {
        Point::new([x, y, z])
    }

    fn unit_box() -> Aabb<f64, 3> {
        Aabb::new(p3(0.0, 0.0, 0.0), p3(1.0, 1.0, 1.0))
    }

    #[test]
    fn symmetric_results() {
        let b = unit_box();
        let s = Sphere::new(p3(1.5, 0.5, 0.5), 0.6);
        let t = Triangle::new(p3(0.5, 0.5, -1.0), p3(0.5, 0.5, 2.0), p3(3.0, 3.0, 0.5));
        assert_eq!(intersects(&b, &s), intersects(&s, &b));
        assert_eq!(intersects(&t, &b), intersects(&b, &t));
        assert_eq!(intersects(&t, &s), intersects(&s, &t));
        let p = p3(2.0, 2.0, 2.0);
        assert_eq!(distance(&p, &t), distance(&t, &p));
        assert_eq!(distance(&p, &b), distance(&b, &p));
    }

    #[test]
    fn triangle_box_sat() {
        let b = unit_box();
        // Crossing the box with no vertex inside it.
        let crossing = Triangle::new(p3(-1.0, 0.5, -1.0), p3(2.0, 0.5, -1.0), p3(0.5, 0.5, 3.0));
        assert!(intersects(&crossing, &b));
        // Parallel to a face, just above it.
        let above = Triangle::new(p3(0.0, 0.0, 1.5), p3(1.0, 0.0, 1.5), p3(0.0, 1.0, 1.5));
        assert!(!intersects(&above, &b));
        // Bounding boxes overlap but the triangle passes beside the corner.
        let diagonal = Triangle::new(p3(1.5, 0.0, 0.5), p3(0.0, 1.5, 0.5), p3(1.5, 1.5, 0.5));
        assert!(intersects(&diagonal.bounding_box(), &b));
        assert!(intersects(&diagonal, &b));
        let beside = Triangle::new(p3(2.5, 0.0, 0.5), p3(0.0, 2.5, 0.5), p3(2.5, 2.5, 0.5));
        assert!(intersects(&beside.bounding_box(), &b));
        assert!(!intersects(&beside, &b));
    }

    #[test]
    fn triangle_sphere_uses_closest_point() {
        let t = Triangle::new(p3(0.0, 0.0, 0.0), p3(1.0, 0.0, 0.0), p3(0.0, 1.0, 0.0));
        assert!(intersects(&t, &Sphere::new(p3(0.2, 0.2, 0.5), 0.5)));
        assert!(!intersects(&t, &Sphere::new(p3(0.2, 0.2, 0.5), 0.49)));
        assert!(!intersects(&t, &Sphere::new(p3(1.0, 1.0, 0.0), 0.7)));
        assert!(intersects(&t, &Sphere::new(p3(1.0, 1.0, 0.0), 0.71)));
    }

    #[test]
    fn negative_radius_spheres_meet_nothing() {
        let neg = Sphere::new(p3(0.2, 0.2, 0.0), -0.5);
        let t = Triangle::new(p3(0.0, 0.0, 0.0), p3(1.0, 0.0, 0.0), p3(0.0, 1.0, 0.0));
        let seg = Segment::new(p3(0.0, 0.0, 0.0), p3(1.0, 1.0, 0.0));
        assert!(!intersects(&p3(0.2, 0.2, 0.0), &neg));
        assert!(!intersects(&neg, &unit_box()));
        assert!(!intersects(&t, &neg));
        assert!(!intersects(&seg, &neg));
        // The radii would sum to a positive reach.
        assert!(!intersects(&neg, &Sphere::new(p3(0.2, 0.2, 0.0), 2.0)));
    }

    #[test]
    fn plane_box_support_radius() {
        let b = unit_box();
        let diag = Plane::from_point_normal(p3(0.0, 0.0, 0.0), p3(1.0, 1.0, 1.0));
        assert!(intersects(&diag, &b));
        let beyond = Plane::from_point_normal(p3(1.01, 1.01, 1.01), p3(1.0, 1.0, 1.0));
        assert!(!intersects(&b, &beyond));
        let face = Plane::new(p3(0.0, 0.0, 1.0), 1.0);
        assert!(intersects(&face, &b));
    }

    #[test]
    fn plane_segment_point() {
        let plane = Plane::new(p3(0.0, 0.0, 1.0), 1.0);
        let seg = Segment::new(p3(0.0, 0.0, 0.0), p3(2.0, 0.0, 4.0));
        let hit = plane_segment_intersection(&plane, &seg);
        assert_eq!(hit, Some(p3(0.5, 0.0, 1.0)));
        assert!(intersects(&seg, &plane));
        let miss = Segment::new(p3(0.0, 0.0, 2.0), p3(2.0, 0.0, 4.0));
        assert_eq!(plane_segment_intersection(&plane, &miss), None);
        assert!(!intersects(&plane, &miss));
    }

    #[test]
    fn nullable_forms() {
        let b = unit_box();
        let p = p3(0.5, 0.5, 0.5);
        assert!(intersects_opt(Some(&p), Some(&b)));
        assert!(!intersects_opt::<Point<f64, 3>, Aabb<f64, 3>>(None, Some(&b)));
        assert!(!intersects_opt::<Point<f64, 3>, Aabb<f64, 3>>(Some(&p), None));
        assert_eq!(distance_opt(Some(&p), Some(&b)), Some(0.0));
        assert_eq!(distance_opt::<Point<f64, 3>, Aabb<f64, 3>>(None, Some(&b)), None);
    }

    #[test]
    fn point_distances() {
        let p = p3(0.0, 0.0, 3.0);
        let s = Sphere::new(p3(0.0, 0.0, 0.0), 1.0);
        assert_eq!(distance(&p, &s), 2.0);
        assert_eq!(distance(&p3(0.0, 0.0, 0.5), &s), 0.0);
        let plane = Plane::new(p3(0.0, 0.0, 2.0), 2.0);
        assert_eq!(distance(&p, &plane), 2.0);
        let seg = Segment::new(p3(0.0, 0.0, 0.0), p3(0.0, 4.0, 0.0));
        assert_eq!(distance(&seg, &p), 3.0);
    }
}
