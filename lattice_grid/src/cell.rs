// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer cell coordinates and inclusive cell ranges.

use core::iter::FusedIterator;
use core::ops::Index;

/// Integer coordinate of a grid cell.
///
/// Coordinates are not clamped to the grid: a point outside the grid bounds
/// maps to a coordinate below zero or at/above the axis cell count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord<const D: usize>(pub [i64; D]);

impl<const D: usize> CellCoord<D> {
    /// Create a coordinate.
    pub const fn new(c: [i64; D]) -> Self {
        Self(c)
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].min(other.0[i])))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].max(other.0[i])))
    }

    /// Largest per-axis difference to `other`.
    pub fn chebyshev_distance(&self, other: &Self) -> u64 {
        (0..D)
            .map(|i| self.0[i].abs_diff(other.0[i]))
            .max()
            .unwrap_or(0)
    }
}

impl<const D: usize> From<[i64; D]> for CellCoord<D> {
    fn from(c: [i64; D]) -> Self {
        Self(c)
    }
}

impl<const D: usize> Index<usize> for CellCoord<D> {
    type Output = i64;

    fn index(&self, axis: usize) -> &i64 {
        &self.0[axis]
    }
}

/// Inclusive box of cell coordinates `[first, last]` on every axis.
///
/// A range is empty when `last < first` on some axis. Iteration is row-major
/// with the last axis varying fastest, and a range can be iterated any number
/// of times.
///
/// ```rust
/// use lattice_grid::{CellCoord, CellRange};
///
/// let r = CellRange::new(CellCoord([0, 0]), CellCoord([1, 2]));
/// assert_eq!(r.len(), 6);
/// let order: Vec<_> = r.iter().map(|c| c.0).collect();
/// assert_eq!(order[..3], [[0, 0], [0, 1], [0, 2]]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellRange<const D: usize> {
    /// Lowest corner (inclusive).
    pub first: CellCoord<D>,
    /// Highest corner (inclusive).
    pub last: CellCoord<D>,
}

impl<const D: usize> CellRange<D> {
    /// Create a range from its inclusive corners.
    pub const fn new(first: CellCoord<D>, last: CellCoord<D>) -> Self {
        Self { first, last }
    }

    /// Range holding exactly one cell.
    pub const fn single(cell: CellCoord<D>) -> Self {
        Self {
            first: cell,
            last: cell,
        }
    }

    /// Cube of cells within Chebyshev distance `radius` of `center`.
    pub fn around(center: CellCoord<D>, radius: u64) -> Self {
        let r = i64::try_from(radius).unwrap_or(i64::MAX);
        Self {
            first: CellCoord(center.0.map(|c| c.saturating_sub(r))),
            last: CellCoord(center.0.map(|c| c.saturating_add(r))),
        }
    }

    /// Whether the range holds no cell.
    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.last.0[i] < self.first.0[i])
    }

    /// Number of cells in the range (saturating at `usize::MAX`).
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (0..D).fold(1_usize, |acc, i| {
            let side = self.last.0[i].abs_diff(self.first.0[i]).saturating_add(1);
            acc.saturating_mul(usize::try_from(side).unwrap_or(usize::MAX))
        })
    }

    /// Whether `cell` lies in the range.
    pub fn contains(&self, cell: &CellCoord<D>) -> bool {
        (0..D).all(|i| self.first.0[i] <= cell.0[i] && cell.0[i] <= self.last.0[i])
    }

    /// Whether every cell of `other` lies in the range.
    pub fn contains_range(&self, other: &Self) -> bool {
        other.is_empty() || (self.contains(&other.first) && self.contains(&other.last))
    }

    /// Cells shared by both ranges (possibly empty).
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            first: self.first.max(other.first),
            last: self.last.min(other.last),
        }
    }

    /// Smallest range holding both ranges. Empty ranges are ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        }
    }

    /// Append disjoint ranges covering the cells of `self` outside `hole`.
    ///
    /// At most `2 * D` ranges are appended.
    pub fn subtract_into(&self, hole: &Self, out: &mut Vec<Self>) {
        if self.is_empty() {
            return;
        }
        let hole = hole.intersect(self);
        if hole.is_empty() {
            out.push(*self);
            return;
        }
        let mut rest = *self;
        for axis in 0..D {
            if rest.first.0[axis] < hole.first.0[axis] {
                let mut below = rest;
                below.last.0[axis] = hole.first.0[axis] - 1;
                out.push(below);
            }
            if hole.last.0[axis] < rest.last.0[axis] {
                let mut above = rest;
                above.first.0[axis] = hole.last.0[axis] + 1;
                out.push(above);
            }
            rest.first.0[axis] = hole.first.0[axis];
            rest.last.0[axis] = hole.last.0[axis];
        }
    }

    /// Nearest cell of the range to `cell`, axis by axis.
    pub fn clamp(&self, cell: &CellCoord<D>) -> CellCoord<D> {
        CellCoord(core::array::from_fn(|i| {
            cell.0[i].clamp(self.first.0[i], self.last.0[i].max(self.first.0[i]))
        }))
    }

    /// Chebyshev distance from `cell` to the nearest cell of the range.
    ///
    /// Zero when `cell` is inside.
    pub fn chebyshev_distance_to(&self, cell: &CellCoord<D>) -> u64 {
        cell.chebyshev_distance(&self.clamp(cell))
    }

    /// Iterate the range in row-major order.
    pub fn iter(&self) -> CellIter<D> {
        CellIter {
            range: *self,
            next: (!self.is_empty()).then_some(self.first),
        }
    }
}

impl<const D: usize> IntoIterator for CellRange<D> {
    type Item = CellCoord<D>;
    type IntoIter = CellIter<D>;

    fn into_iter(self) -> CellIter<D> {
        self.iter()
    }
}

impl<const D: usize> IntoIterator for &CellRange<D> {
    type Item = CellCoord<D>;
    type IntoIter = CellIter<D>;

    fn into_iter(self) -> CellIter<D> {
        self.iter()
    }
}

/// Row-major iterator over a [`CellRange`].
#[derive(Clone, Debug)]
pub struct CellIter<const D: usize> {
    range: CellRange<D>,
    next: Option<CellCoord<D>>,
}

impl<const D: usize> Iterator for CellIter<D> {
    type Item = CellCoord<D>;

    fn next(&mut self) -> Option<CellCoord<D>> {
        let current = self.next?;
        let mut advanced = current;
        self.next = None;
        for axis in (0..D).rev() {
            if advanced.0[axis] < self.range.last.0[axis] {
                advanced.0[axis] += 1;
                for reset in axis + 1..D {
                    advanced.0[reset] = self.range.first.0[reset];
                }
                self.next = Some(advanced);
                break;
            }
        }
        Some(current)
    }
}

impl<const D: usize> FusedIterator for CellIter<D> {}
