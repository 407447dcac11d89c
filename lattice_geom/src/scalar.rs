// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floating-point scalar abstraction shared by every primitive.

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Numeric scalar abstraction for coordinates.
///
/// This trait provides the minimal set of operations the primitives, the
/// predicates, and the grid need: field arithmetic, `sqrt`/`abs`, and a
/// floor-to-integer conversion for cell addressing. It is implemented for
/// `f32` and `f64`. Inputs are assumed to be free of NaNs.
pub trait Scalar:
    'static
    + Copy
    + PartialOrd
    + Debug
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
{
    /// Zero value for the scalar type.
    const ZERO: Self;

    /// One value for the scalar type.
    const ONE: Self;

    /// Largest finite value, used as the "no candidate yet" distance.
    const MAX: Self;

    /// Machine epsilon.
    const EPSILON: Self;

    /// Positive infinity, the bound of an unbounded search.
    const INFINITY: Self;

    /// Square root.
    fn sqrt(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Whether the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Floor to the nearest integer towards negative infinity.
    ///
    /// Values outside the `i64` range saturate.
    fn floor_to_i64(self) -> i64;

    /// Convert an integer to the scalar type.
    fn from_i64(v: i64) -> Self;

    /// Convert an `f64` to the scalar type (rounding for `f32`).
    fn from_f64(v: f64) -> Self;

    /// Widen the scalar to `f64`.
    fn to_f64(self) -> f64;

    /// Minimum of two values. Returns `self` when unordered.
    #[inline]
    fn min_s(self, other: Self) -> Self {
        if other < self { other } else { self }
    }

    /// Maximum of two values. Returns `self` when unordered.
    #[inline]
    fn max_s(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    /// Clamp into `[lo, hi]`.
    #[inline]
    fn clamp_s(self, lo: Self, hi: Self) -> Self {
        self.max_s(lo).min_s(hi)
    }
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const MAX: Self = Self::MAX;
    const EPSILON: Self = Self::EPSILON;
    const INFINITY: Self = Self::INFINITY;

    #[inline]
    fn sqrt(self) -> Self {
        Self::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        Self::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    #[inline]
    fn floor_to_i64(self) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Float to i64 casts saturate; cell coordinates beyond i64 are not meaningful."
        )]
        let i = self as i64;
        if (i as Self) > self { i.saturating_sub(1) } else { i }
    }

    #[inline]
    fn from_i64(v: i64) -> Self {
        v as Self
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Narrowing f64 constants to f32 coordinates is intended."
    )]
    fn from_f64(v: f64) -> Self {
        v as Self
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const MAX: Self = Self::MAX;
    const EPSILON: Self = Self::EPSILON;
    const INFINITY: Self = Self::INFINITY;

    #[inline]
    fn sqrt(self) -> Self {
        Self::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        Self::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    #[inline]
    fn floor_to_i64(self) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Float to i64 casts saturate; cell coordinates beyond i64 are not meaningful."
        )]
        let i = self as i64;
        if (i as Self) > self { i.saturating_sub(1) } else { i }
    }

    #[inline]
    fn from_i64(v: i64) -> Self {
        v as Self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}
