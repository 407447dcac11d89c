// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! D-dimensional points (also used as free vectors).

use core::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use crate::scalar::Scalar;

/// A point in `D`-dimensional space.
///
/// Differences of points are represented as `Point` too; there is no separate
/// vector type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point<T, const D: usize>(pub [T; D]);

/// 2D point alias.
pub type Point2<T> = Point<T, 2>;
/// 3D point alias.
pub type Point3<T> = Point<T, 3>;

impl<T, const D: usize> Point<T, D> {
    /// Create a point from its coordinates.
    pub const fn new(coords: [T; D]) -> Self {
        Self(coords)
    }

    /// Coordinates as an array reference.
    pub const fn coords(&self) -> &[T; D] {
        &self.0
    }
}

impl<T: Scalar, const D: usize> Point<T, D> {
    /// The origin.
    pub fn origin() -> Self {
        Self([T::ZERO; D])
    }

    /// Point with every coordinate set to `v`.
    pub fn splat(v: T) -> Self {
        Self([v; D])
    }

    /// Apply `f` component-wise with another point.
    #[inline]
    pub fn zip_with(self, other: Self, mut f: impl FnMut(T, T) -> T) -> Self {
        let mut out = self.0;
        for (o, b) in out.iter_mut().zip(other.0) {
            *o = f(*o, b);
        }
        Self(out)
    }

    /// Apply `f` to every coordinate.
    #[inline]
    pub fn map(self, mut f: impl FnMut(T) -> T) -> Self {
        let mut out = self.0;
        for o in &mut out {
            *o = f(*o);
        }
        Self(out)
    }

    /// Dot product, treating both points as vectors.
    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        let mut acc = T::ZERO;
        for (a, b) in self.0.iter().zip(&other.0) {
            acc += *a * *b;
        }
        acc
    }

    /// Squared length, treating the point as a vector.
    #[inline]
    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }

    /// Euclidean length, treating the point as a vector.
    #[inline]
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn distance_squared(&self, other: &Self) -> T {
        (*self - *other).norm_squared()
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(&self, other: &Self) -> T {
        self.distance_squared(other).sqrt()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        self.zip_with(other, T::min_s)
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        self.zip_with(other, T::max_s)
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl<T: Scalar> Point<T, 3> {
    /// Cross product of two 3D vectors.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = other.0;
        Self([ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx])
    }
}

impl<T: Scalar, const D: usize> Default for Point<T, D> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<T, const D: usize> From<[T; D]> for Point<T, D> {
    fn from(coords: [T; D]) -> Self {
        Self(coords)
    }
}

impl<T, const D: usize> Index<usize> for Point<T, D> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.0[i]
    }
}

impl<T, const D: usize> IndexMut<usize> for Point<T, D> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

impl<T: Scalar, const D: usize> Add for Point<T, D> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Scalar, const D: usize> Sub for Point<T, D> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Scalar, const D: usize> Mul<T> for Point<T, D> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        self.map(|a| a * rhs)
    }
}

impl<T: Scalar, const D: usize> Neg for Point<T, D> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_and_dot() {
        let a = Point::new([0.0_f64, 0.0, 0.0]);
        let b = Point::new([1.0, 2.0, 2.0]);
        assert_eq!(a.distance(&b), 3.0);
        assert_eq!(b.dot(&b), 9.0);
        assert_eq!((b - a) * 2.0, Point::new([2.0, 4.0, 4.0]));
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Point::new([1.0_f32, 0.0, 0.0]);
        let y = Point::new([0.0_f32, 1.0, 0.0]);
        assert_eq!(x.cross(&y), Point::new([0.0, 0.0, 1.0]));
    }

    #[test]
    fn component_min_max() {
        let a = Point::new([1.0_f64, 5.0]);
        let b = Point::new([3.0, -1.0]);
        assert_eq!(a.min(b), Point::new([1.0, -1.0]));
        assert_eq!(a.max(b), Point::new([3.0, 5.0]));
    }
}
