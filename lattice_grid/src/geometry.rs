// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid geometry: bounds, per-axis cell counts, and point-to-cell mapping.

use lattice_geom::{Aabb, Point, Scalar, Sphere};

use crate::cell::{CellCoord, CellRange};
use crate::error::GridError;
use crate::value::{GridValue, placement_of};

/// Fraction of the largest extent a degenerate axis is widened to.
const DEGENERATE_RATIO: f64 = 1e-3;

/// How finely a grid subdivides its bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Resolution<T, const D: usize> {
    /// Explicit cell count per axis.
    Counts([usize; D]),
    /// Roughly this many cells in total, with near-cubic cells.
    TargetCells(usize),
    /// Cubic cells of this side length; the bounds grow to a whole number of cells.
    CellSize(T),
}

impl<T, const D: usize> Resolution<T, D> {
    /// About one cell per stored value.
    pub fn for_population(n: usize) -> Self {
        Self::TargetCells(n.max(1))
    }
}

/// Immutable description of a uniform grid.
///
/// Invariants: every axis has at least one cell and a positive cell size.
/// Degenerate input (an axis with `min == max`, or a zero cell count) is
/// repaired on construction rather than rejected.
///
/// ```rust
/// use lattice_grid::{CellCoord, GridGeometry};
/// use lattice_geom::{Aabb, Point};
///
/// let g = GridGeometry::new(
///     Aabb::new(Point::new([0.0, 0.0]), Point::new([4.0, 2.0])),
///     [4, 2],
/// );
/// assert_eq!(g.cell(&Point::new([3.5, 0.5])), CellCoord([3, 0]));
/// // Points outside the bounds map outside `[0, count)`.
/// assert_eq!(g.cell(&Point::new([-0.5, 7.0])), CellCoord([-1, 7]));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridGeometry<T, const D: usize> {
    bounds: Aabb<T, D>,
    counts: [usize; D],
    cell_size: Point<T, D>,
}

impl<T: Scalar, const D: usize> GridGeometry<T, D> {
    /// Create a grid over `bounds` with `counts` cells per axis.
    ///
    /// Zero counts are raised to one and degenerate axes are widened.
    ///
    /// # Panics
    ///
    /// Panics if `bounds` is not finite or is inverted on some axis; use
    /// [`GridGeometry::try_new`] to get an error instead.
    pub fn new(bounds: Aabb<T, D>, counts: [usize; D]) -> Self {
        assert!(bounds.is_finite(), "grid bounds must be finite");
        assert!(
            !bounds.is_empty(),
            "grid bounds must not be inverted: {bounds:?}"
        );
        let mut counts = counts;
        for (axis, count) in counts.iter_mut().enumerate() {
            if *count == 0 {
                log::debug!("zero cell count on axis {axis}; using 1");
                *count = 1;
            }
        }
        let bounds = repair_degenerate(bounds);
        let cell_size = Point(core::array::from_fn(|i| {
            (bounds.max[i] - bounds.min[i]) / T::from_i64(count_to_i64(counts[i]))
        }));
        Self {
            bounds,
            counts,
            cell_size,
        }
    }

    /// Checked form of [`GridGeometry::new`].
    ///
    /// Degenerate axes are still widened; non-finite or inverted bounds and
    /// zero counts are rejected.
    pub fn try_new(bounds: Aabb<T, D>, counts: [usize; D]) -> Result<Self, GridError> {
        check_bounds(&bounds)?;
        if let Some(axis) = counts.iter().position(|&c| c == 0) {
            return Err(GridError::ZeroCellCount { axis });
        }
        Ok(Self::new(bounds, counts))
    }

    /// Create a grid over `bounds` at the given resolution.
    ///
    /// # Panics
    ///
    /// Panics on non-finite or inverted bounds, or a cell size that is not
    /// positive and finite.
    pub fn with_resolution(bounds: Aabb<T, D>, resolution: Resolution<T, D>) -> Self {
        match resolution {
            Resolution::Counts(counts) => Self::new(bounds, counts),
            Resolution::TargetCells(target) => {
                assert!(bounds.is_finite(), "grid bounds must be finite");
                assert!(!bounds.is_empty(), "grid bounds must not be inverted");
                let bounds = repair_degenerate(bounds);
                let counts = counts_for_target(&bounds, target.max(1));
                Self::new(bounds, counts)
            }
            Resolution::CellSize(side) => {
                assert!(
                    side > T::ZERO && side.is_finite(),
                    "cell size must be positive and finite"
                );
                assert!(bounds.is_finite(), "grid bounds must be finite");
                assert!(!bounds.is_empty(), "grid bounds must not be inverted");
                let bounds = repair_degenerate(bounds);
                let counts = core::array::from_fn(|i| {
                    let cells = ((bounds.max[i] - bounds.min[i]) / side).to_f64().ceil();
                    f64_to_count(cells)
                });
                let mut max = bounds.min;
                for i in 0..D {
                    max[i] += side * T::from_i64(count_to_i64(counts[i]));
                }
                Self::new(Aabb::new(bounds.min, max), counts)
            }
        }
    }

    /// Checked form of [`GridGeometry::with_resolution`].
    pub fn try_with_resolution(
        bounds: Aabb<T, D>,
        resolution: Resolution<T, D>,
    ) -> Result<Self, GridError> {
        check_bounds(&bounds)?;
        match resolution {
            Resolution::Counts(counts) => {
                if let Some(axis) = counts.iter().position(|&c| c == 0) {
                    return Err(GridError::ZeroCellCount { axis });
                }
            }
            Resolution::TargetCells(0) => return Err(GridError::InvalidCellSize),
            Resolution::TargetCells(_) => {}
            Resolution::CellSize(side) => {
                if !(side > T::ZERO && side.is_finite()) {
                    return Err(GridError::InvalidCellSize);
                }
            }
        }
        Ok(Self::with_resolution(bounds, resolution))
    }

    /// Grid over the bounding box of every placed value.
    ///
    /// Values without a placement are skipped; if none is placed the grid
    /// covers the unit box.
    pub fn enclosing<I>(values: I, resolution: Resolution<T, D>) -> Self
    where
        I: IntoIterator,
        I::Item: GridValue<T, D>,
    {
        let bounds = values
            .into_iter()
            .filter_map(|v| placement_of(&v))
            .fold(Aabb::empty(), |acc, p| acc.union(p.bounding_box()));
        let bounds = if bounds.is_empty() {
            Aabb::new(Point::origin(), Point::splat(T::ONE))
        } else {
            bounds
        };
        Self::with_resolution(bounds, resolution)
    }

    /// Cell containing `p`.
    ///
    /// The result is not clamped: points outside the bounds map to cells
    /// outside `[0, count)`. Points inside the bounds always map inside.
    pub fn cell(&self, p: &Point<T, D>) -> CellCoord<D> {
        CellCoord(core::array::from_fn(|i| {
            let c = ((p[i] - self.bounds.min[i]) / self.cell_size[i]).floor_to_i64();
            let last = count_to_i64(self.counts[i]) - 1;
            // Rounding can push a point just below `max` into the next cell.
            if c > last && p[i] < self.bounds.max[i] {
                last
            } else {
                c
            }
        }))
    }

    /// Every cell in the inclusive box `[first, last]`.
    pub fn cells(&self, first: CellCoord<D>, last: CellCoord<D>) -> CellRange<D> {
        CellRange::new(first, last)
    }

    /// Cells covered by the grid bounds, `[0, count - 1]` on every axis.
    pub fn all_cells(&self) -> CellRange<D> {
        CellRange::new(
            CellCoord([0; D]),
            CellCoord(self.counts.map(|c| count_to_i64(c) - 1)),
        )
    }

    /// Closed box of `cell`.
    pub fn cell_box(&self, cell: &CellCoord<D>) -> Aabb<T, D> {
        let lo = Point(core::array::from_fn(|i| {
            self.bounds.min[i] + T::from_i64(cell[i]) * self.cell_size[i]
        }));
        let hi = Point(core::array::from_fn(|i| {
            self.bounds.min[i] + T::from_i64(cell[i].saturating_add(1)) * self.cell_size[i]
        }));
        Aabb::new(lo, hi)
    }

    /// Cells overlapped by `aabb`.
    pub fn cell_range(&self, aabb: &Aabb<T, D>) -> CellRange<D> {
        CellRange::new(self.cell(&aabb.min), self.cell(&aabb.max))
    }

    /// Cells overlapped by the bounding box of `sphere`.
    pub fn sphere_range(&self, sphere: &Sphere<T, D>) -> CellRange<D> {
        self.cell_range(&sphere.bounding_box())
    }

    /// Grid bounds, after any degenerate-axis repair.
    pub fn bounds(&self) -> Aabb<T, D> {
        self.bounds
    }

    /// Cells per axis.
    pub fn counts(&self) -> [usize; D] {
        self.counts
    }

    /// Per-axis cell side length.
    pub fn cell_size(&self) -> Point<T, D> {
        self.cell_size
    }

    /// Total number of cells in the bounds (saturating).
    pub fn total_cells(&self) -> usize {
        self.counts.iter().fold(1_usize, |acc, &c| acc.saturating_mul(c))
    }

    /// Lower bound on the distance from `p` to anything outside the cells of `range`.
    ///
    /// `p` is expected to lie in `range`. The result is reduced by a small
    /// rounding slack so that values just outside are never missed.
    pub(crate) fn clearance(&self, p: &Point<T, D>, range: &CellRange<D>) -> T {
        let mut clearance = T::MAX;
        let mut scale = T::ZERO;
        for i in 0..D {
            let lo = self.bounds.min[i] + T::from_i64(range.first[i]) * self.cell_size[i];
            let hi = self.bounds.min[i]
                + T::from_i64(range.last[i].saturating_add(1)) * self.cell_size[i];
            clearance = clearance.min_s(p[i] - lo).min_s(hi - p[i]);
            scale = scale.max_s(lo.abs()).max_s(hi.abs()).max_s(p[i].abs());
        }
        let slack = scale * T::EPSILON * T::from_f64(32.0);
        (clearance - slack).max_s(T::ZERO)
    }
}

fn check_bounds<T: Scalar, const D: usize>(bounds: &Aabb<T, D>) -> Result<(), GridError> {
    if !bounds.is_finite() {
        return Err(GridError::NonFiniteBounds);
    }
    if let Some(axis) = (0..D).find(|&i| bounds.max[i] < bounds.min[i]) {
        return Err(GridError::InvertedBounds { axis });
    }
    Ok(())
}

/// Widen every axis with `min == max` symmetrically.
///
/// The new extent is a small fraction of the largest extent, or one when
/// every axis is degenerate.
fn repair_degenerate<T: Scalar, const D: usize>(bounds: Aabb<T, D>) -> Aabb<T, D> {
    let largest = bounds.max_extent();
    let extent = if largest > T::ZERO {
        largest * T::from_f64(DEGENERATE_RATIO)
    } else {
        T::ONE
    };
    let mut out = bounds;
    for axis in 0..D {
        if bounds.max[axis] > bounds.min[axis] {
            continue;
        }
        let c = bounds.min[axis];
        // Far from the origin a tiny extent may vanish below the coordinate's precision.
        let half = (extent * T::from_f64(0.5)).max_s(c.abs() * T::EPSILON * T::from_f64(4.0));
        out.min[axis] = c - half;
        out.max[axis] = c + half;
        log::debug!(
            "degenerate grid axis {axis} at {c:?}; widened to [{:?}, {:?}]",
            out.min[axis],
            out.max[axis]
        );
    }
    out
}

/// Near-cubic cell counts whose product approximates `target`.
fn counts_for_target<T: Scalar, const D: usize>(bounds: &Aabb<T, D>, target: usize) -> [usize; D] {
    let size = bounds.size();
    #[allow(
        clippy::cast_precision_loss,
        reason = "Cell targets are heuristics; precision beyond 2^53 is irrelevant."
    )]
    let target = target as f64;
    let volume: f64 = size.0.iter().map(|s| s.to_f64()).product();
    let exponent = 1.0 / f64::from(u32::try_from(D.max(1)).unwrap_or(u32::MAX));
    let side = (volume / target).powf(exponent);
    core::array::from_fn(|i| {
        if side > 0.0 && side.is_finite() {
            f64_to_count((size[i].to_f64() / side).round())
        } else {
            1
        }
    })
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Float to usize casts saturate; counts are clamped to at least one."
)]
fn f64_to_count(cells: f64) -> usize {
    (cells as usize).max(1)
}

fn count_to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube(n: usize) -> GridGeometry<f64, 3> {
        GridGeometry::new(
            Aabb::new(Point::new([0.0; 3]), Point::new([1.0; 3])),
            [n; 3],
        )
    }

    #[test]
    fn interior_points_map_into_range() {
        let g = GridGeometry::new(
            Aabb::new(Point::new([0.0, 0.0]), Point::new([1.0, 1.0])),
            [3, 7],
        );
        let all = g.all_cells();
        for i in 1..100 {
            let t = f64::from(i) / 100.0;
            let c = g.cell(&Point::new([t, 1.0 - t]));
            assert!(all.contains(&c), "{t} mapped to {c:?}");
        }
        let almost = Point::new([1.0 - f64::EPSILON, 1.0 - f64::EPSILON]);
        assert_eq!(g.cell(&almost), CellCoord([2, 6]));
    }

    #[test]
    fn cell_box_round_trips() {
        let g = unit_cube(2);
        let b = g.cell_box(&CellCoord([1, 0, 1]));
        assert_eq!(b.min, Point::new([0.5, 0.0, 0.5]));
        assert_eq!(b.max, Point::new([1.0, 0.5, 1.0]));
        assert_eq!(g.cell(&b.center()), CellCoord([1, 0, 1]));
    }

    #[test]
    fn degenerate_single_point_gets_unit_extent() {
        let p = Point::new([2.0, 2.0, 2.0]);
        let g = GridGeometry::new(Aabb::from_point(p), [4, 4, 4]);
        assert!(g.cell_size().0.iter().all(|&s| s > 0.0));
        assert_eq!(g.bounds().size(), Point::splat(1.0));
        assert!(g.all_cells().contains(&g.cell(&p)));
    }

    #[test]
    fn flat_axis_is_widened_relative_to_others() {
        let g = GridGeometry::new(
            Aabb::new(Point::new([0.0, 5.0]), Point::new([10.0, 5.0])),
            [10, 10],
        );
        let size = g.bounds().size();
        assert_eq!(size[0], 10.0);
        assert!(size[1] > 0.0 && size[1] < 0.1);
        assert!((g.bounds().center()[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn zero_counts_are_repaired_or_rejected() {
        let bounds = Aabb::new(Point::new([0.0_f32, 0.0]), Point::new([1.0, 1.0]));
        assert_eq!(GridGeometry::new(bounds, [0, 3]).counts(), [1, 3]);
        assert_eq!(
            GridGeometry::try_new(bounds, [2, 0]),
            Err(GridError::ZeroCellCount { axis: 1 })
        );
    }

    #[test]
    fn bad_bounds_are_rejected() {
        let inverted = Aabb::new(Point::new([0.0, 1.0]), Point::new([1.0, 0.0]));
        assert_eq!(
            GridGeometry::try_new(inverted, [1, 1]),
            Err(GridError::InvertedBounds { axis: 1 })
        );
        let infinite = Aabb::new(Point::new([0.0, 0.0]), Point::new([f64::INFINITY, 1.0]));
        assert_eq!(
            GridGeometry::try_new(infinite, [1, 1]),
            Err(GridError::NonFiniteBounds)
        );
        let ok = Aabb::new(Point::new([0.0, 0.0]), Point::new([1.0, 1.0]));
        assert_eq!(
            GridGeometry::try_with_resolution(ok, Resolution::CellSize(-1.0)),
            Err(GridError::InvalidCellSize)
        );
    }

    #[test]
    #[should_panic(expected = "grid bounds must be finite")]
    fn new_panics_on_nan() {
        let _ = GridGeometry::new(
            Aabb::new(Point::new([f64::NAN, 0.0]), Point::new([1.0, 1.0])),
            [1, 1],
        );
    }

    #[test]
    fn target_cells_gives_near_cubic_cells() {
        let bounds = Aabb::new(Point::new([0.0, 0.0]), Point::new([4.0, 1.0]));
        let g = GridGeometry::with_resolution(bounds, Resolution::TargetCells(100));
        assert_eq!(g.counts(), [20, 5]);
        let s = g.cell_size();
        assert!((s[0] - s[1]).abs() < 1e-12);
    }

    #[test]
    fn cell_size_extends_bounds_to_whole_cells() {
        let bounds = Aabb::new(Point::new([0.0, 0.0]), Point::new([1.0, 0.3]));
        let g = GridGeometry::with_resolution(bounds, Resolution::CellSize(0.25));
        assert_eq!(g.counts(), [4, 2]);
        assert_eq!(g.bounds().max, Point::new([1.0, 0.5]));
        assert_eq!(g.cell_size(), Point::splat(0.25));
    }

    #[test]
    fn enclosing_skips_unplaced_and_defaults_to_unit() {
        let none: [Option<Point<f64, 2>>; 2] = [None, None];
        let g = GridGeometry::enclosing(none, Resolution::Counts([1, 1]));
        assert_eq!(g.bounds().max, Point::new([1.0, 1.0]));

        let pts = [
            Some(Point::new([-1.0, 0.0])),
            None,
            Some(Point::new([3.0, 2.0])),
        ];
        let g = GridGeometry::enclosing(&pts, Resolution::for_population(2));
        assert_eq!(g.bounds().min, Point::new([-1.0, 0.0]));
        assert_eq!(g.bounds().max, Point::new([3.0, 2.0]));
    }

    #[test]
    fn clearance_is_distance_to_scanned_faces() {
        let g = unit_cube(4);
        let p = Point::new([0.3, 0.3, 0.3]);
        let c = g.cell(&p);
        let d = g.clearance(&p, &CellRange::single(c));
        assert!((d - 0.05).abs() < 1e-12);
        let d1 = g.clearance(&p, &CellRange::around(c, 1));
        assert!((d1 - 0.3).abs() < 1e-12);
    }
}
