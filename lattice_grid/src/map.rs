// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The operations shared by every sparse cell map.

use lattice_geom::{Aabb, Point, Scalar, Sphere};

use crate::cell::CellCoord;
use crate::geometry::GridGeometry;
use crate::query::Neighbor;
use crate::value::GridValue;

/// A sparse map from grid cells to the values overlapping them.
///
/// Implemented by [`HashGrid`](crate::HashGrid), which stores a copy of a
/// value per overlapped cell, and by [`DedupHashGrid`](crate::DedupHashGrid),
/// which stores each value once and links it from every overlapped cell.
///
/// Queries take `&self` and return references into storage, so the borrow
/// checker rules out mutation while results are alive.
pub trait CellMap<T: Scalar, const D: usize> {
    /// Stored value type.
    type Value: GridValue<T, D>;

    /// Geometry the map was built with.
    fn geometry(&self) -> &GridGeometry<T, D>;

    /// Insert `value` into every cell its placement overlaps.
    ///
    /// Returns `false` if nothing was stored: the value has no placement, or
    /// (for deduplicating maps) an equal value is already present.
    fn insert(&mut self, value: Self::Value) -> bool;

    /// Remove one stored value equal to `value` from every cell it overlaps.
    ///
    /// The cells are recomputed from `value`'s current placement, so a value
    /// whose placement changed since insertion is not found in its old cells.
    /// Returns whether anything was removed.
    fn erase(&mut self, value: &Self::Value) -> bool;

    /// Values stored in `cell` (empty for cells that hold nothing).
    fn values_in_cell<'a>(
        &'a self,
        cell: &CellCoord<D>,
    ) -> Box<dyn Iterator<Item = &'a Self::Value> + 'a>;

    /// Number of entries stored in `cell`.
    fn count_in_cell(&self, cell: &CellCoord<D>) -> usize;

    /// Whether `cell` holds nothing.
    fn cell_is_empty(&self, cell: &CellCoord<D>) -> bool {
        self.count_in_cell(cell) == 0
    }

    /// Every cell holding at least one entry, in unspecified order.
    fn non_empty_cells<'a>(&'a self) -> Box<dyn Iterator<Item = CellCoord<D>> + 'a>;

    /// Every stored value passing its sphere test, each reported once.
    fn values_in_sphere(&self, sphere: &Sphere<T, D>) -> Vec<&Self::Value>;

    /// Every stored value passing its box test, each reported once.
    fn values_in_box(&self, aabb: &Aabb<T, D>) -> Vec<&Self::Value>;

    /// Number of values [`values_in_sphere`](Self::values_in_sphere) would report.
    fn count_in_sphere(&self, sphere: &Sphere<T, D>) -> usize {
        self.values_in_sphere(sphere).len()
    }

    /// Erase every value [`values_in_sphere`](Self::values_in_sphere) reports.
    ///
    /// Returns the number of values erased.
    fn erase_in_sphere(&mut self, sphere: &Sphere<T, D>) -> usize;

    /// Up to `k` values nearest to `p` within `max_distance`, ascending by
    /// distance. Ties keep the order in which the search found them.
    fn k_nearest_within(
        &self,
        p: &Point<T, D>,
        k: usize,
        max_distance: T,
    ) -> Vec<Neighbor<'_, Self::Value, T>>;

    /// Up to `k` values nearest to `p`, ascending by distance.
    ///
    /// Asking for more values than are stored returns all of them.
    fn k_nearest(&self, p: &Point<T, D>, k: usize) -> Vec<Neighbor<'_, Self::Value, T>> {
        self.k_nearest_within(p, k, T::INFINITY)
    }

    /// The value nearest to `p`, if any.
    fn nearest(&self, p: &Point<T, D>) -> Option<Neighbor<'_, Self::Value, T>> {
        self.nearest_within(p, T::INFINITY)
    }

    /// The value nearest to `p` if it lies within `max_distance`.
    fn nearest_within(
        &self,
        p: &Point<T, D>,
        max_distance: T,
    ) -> Option<Neighbor<'_, Self::Value, T>> {
        self.k_nearest_within(p, 1, max_distance).into_iter().next()
    }

    /// Number of logical values stored.
    fn len(&self) -> usize;

    /// Whether nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove everything, keeping the geometry.
    fn clear(&mut self);
}
