// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct cell map: one copy of a value per overlapped cell.

use core::fmt::Debug;

use lattice_geom::{Aabb, Point, Scalar, Sphere};
use rustc_hash::FxHashMap;

use crate::cell::{CellCoord, CellRange};
use crate::geometry::{GridGeometry, Resolution};
use crate::map::CellMap;
use crate::query::{Neighbor, ring_search};
use crate::value::{GridValue, Placement, placement_of};

/// Sparse uniform grid storing values directly in their cells.
///
/// A value whose placement spans several cells is cloned into each of them.
/// Range queries still report it once: a multi-cell value is reported only
/// from its anchor cell, the first of its cells inside the query range.
///
/// ```rust
/// use lattice_geom::{Aabb, Point, Sphere};
/// use lattice_grid::{CellMap, GridGeometry, HashGrid};
///
/// let geometry = GridGeometry::new(
///     Aabb::new(Point::new([0.0, 0.0]), Point::new([10.0, 10.0])),
///     [10, 10],
/// );
/// let mut grid = HashGrid::new(geometry);
/// grid.insert(Point::new([1.0, 1.0]));
/// grid.insert(Point::new([8.5, 2.0]));
/// grid.insert(Point::new([1.5, 1.2]));
///
/// let near = grid.values_in_sphere(&Sphere::new(Point::new([1.0, 1.0]), 1.0));
/// assert_eq!(near.len(), 2);
///
/// let nearest = grid.nearest(&Point::new([9.0, 2.0])).unwrap();
/// assert_eq!(*nearest.value, Point::new([8.5, 2.0]));
/// ```
pub struct HashGrid<T, const D: usize, V> {
    geometry: GridGeometry<T, D>,
    cells: FxHashMap<CellCoord<D>, Vec<V>>,
    occupied: Option<CellRange<D>>,
    len: usize,
    entries: usize,
}

impl<T, const D: usize, V> HashGrid<T, D, V>
where
    T: Scalar,
    V: GridValue<T, D> + Clone + PartialEq,
{
    /// Create an empty grid.
    pub fn new(geometry: GridGeometry<T, D>) -> Self {
        Self {
            geometry,
            cells: FxHashMap::default(),
            occupied: None,
            len: 0,
            entries: 0,
        }
    }

    /// Build a grid enclosing `values` and insert all of them.
    pub fn from_values<I: IntoIterator<Item = V>>(values: I, resolution: Resolution<T, D>) -> Self {
        let values: Vec<V> = values.into_iter().collect();
        let mut grid = Self::new(GridGeometry::enclosing(&values, resolution));
        for value in values {
            grid.insert(value);
        }
        grid
    }

    /// Total number of (cell, value) entries.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Smallest cell range holding every entry, or `None` when empty.
    ///
    /// May be larger than necessary after erasures.
    pub fn occupied_range(&self) -> Option<CellRange<D>> {
        self.occupied
    }

    /// Whether `value`, found in `cell`, should be reported from there for a
    /// query covering `query`.
    fn is_range_anchor(&self, value: &V, cell: CellCoord<D>, query: &CellRange<D>) -> bool {
        match value.placement() {
            Some(Placement::Bounds(b)) => self.geometry.cell_range(&b).first.max(query.first) == cell,
            _ => true,
        }
    }

    /// Whether `value`, found in `cell`, should be scored from there for a
    /// nearest search centered on `center`.
    fn is_search_anchor(&self, value: &V, cell: CellCoord<D>, center: &CellCoord<D>) -> bool {
        match value.placement() {
            Some(Placement::Bounds(b)) => self.geometry.cell_range(&b).clamp(center) == cell,
            _ => true,
        }
    }

    /// Visit every entry in `range`, probing cells or scanning the map,
    /// whichever is smaller.
    fn for_each_in<'a>(&'a self, range: &CellRange<D>, mut f: impl FnMut(CellCoord<D>, &'a V)) {
        let Some(occupied) = self.occupied else {
            return;
        };
        let range = range.intersect(&occupied);
        if range.is_empty() {
            return;
        }
        if range.len() <= self.cells.len() {
            for cell in &range {
                if let Some(bucket) = self.cells.get(&cell) {
                    bucket.iter().for_each(|v| f(cell, v));
                }
            }
        } else {
            for (cell, bucket) in &self.cells {
                if range.contains(cell) {
                    bucket.iter().for_each(|v| f(*cell, v));
                }
            }
        }
    }
}

impl<T, const D: usize, V> CellMap<T, D> for HashGrid<T, D, V>
where
    T: Scalar,
    V: GridValue<T, D> + Clone + PartialEq,
{
    type Value = V;

    fn geometry(&self) -> &GridGeometry<T, D> {
        &self.geometry
    }

    fn insert(&mut self, value: V) -> bool {
        let Some(placement) = placement_of(&value) else {
            return false;
        };
        let range = placement.cell_range(&self.geometry);
        for cell in &range {
            self.cells.entry(cell).or_default().push(value.clone());
        }
        self.entries += range.len();
        self.len += 1;
        self.occupied = Some(match self.occupied {
            Some(occupied) => occupied.union(&range),
            None => range,
        });
        true
    }

    fn erase(&mut self, value: &V) -> bool {
        let Some(placement) = placement_of(value) else {
            return false;
        };
        let mut removed = false;
        for cell in &placement.cell_range(&self.geometry) {
            let Some(bucket) = self.cells.get_mut(&cell) else {
                continue;
            };
            if let Some(pos) = bucket.iter().position(|v| v == value) {
                bucket.remove(pos);
                self.entries -= 1;
                removed = true;
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
        if !removed {
            log::debug!("erase found no entry for placement {placement:?}");
            return false;
        }
        self.len -= 1;
        if self.cells.is_empty() {
            self.occupied = None;
        }
        true
    }

    fn values_in_cell<'a>(&'a self, cell: &CellCoord<D>) -> Box<dyn Iterator<Item = &'a V> + 'a> {
        Box::new(self.cells.get(cell).into_iter().flatten())
    }

    fn count_in_cell(&self, cell: &CellCoord<D>) -> usize {
        self.cells.get(cell).map_or(0, Vec::len)
    }

    fn non_empty_cells<'a>(&'a self) -> Box<dyn Iterator<Item = CellCoord<D>> + 'a> {
        Box::new(self.cells.keys().copied())
    }

    fn values_in_sphere(&self, sphere: &Sphere<T, D>) -> Vec<&V> {
        let query = self.geometry.sphere_range(sphere);
        let mut out = Vec::new();
        self.for_each_in(&query, |cell, v| {
            if v.in_sphere(sphere) && self.is_range_anchor(v, cell, &query) {
                out.push(v);
            }
        });
        out
    }

    fn values_in_box(&self, aabb: &Aabb<T, D>) -> Vec<&V> {
        let query = self.geometry.cell_range(aabb);
        let mut out = Vec::new();
        self.for_each_in(&query, |cell, v| {
            if v.in_box(aabb) && self.is_range_anchor(v, cell, &query) {
                out.push(v);
            }
        });
        out
    }

    fn erase_in_sphere(&mut self, sphere: &Sphere<T, D>) -> usize {
        let found: Vec<V> = self.values_in_sphere(sphere).into_iter().cloned().collect();
        found.iter().filter(|v| self.erase(v)).count()
    }

    fn k_nearest_within(
        &self,
        p: &Point<T, D>,
        k: usize,
        max_distance: T,
    ) -> Vec<Neighbor<'_, V, T>> {
        let center = self.geometry.cell(p);
        let cells = self.cells.len();
        ring_search(&self.geometry, self.occupied, cells, p, k, max_distance, |piece, heap| {
            self.for_each_in(piece, |cell, v| {
                if !self.is_search_anchor(v, cell, &center) {
                    return;
                }
                if let Some(d) = v.distance_to(p) {
                    heap.offer(v, d);
                }
            });
        })
        .into_iter()
        .map(|(value, distance)| Neighbor { value, distance })
        .collect()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.occupied = None;
        self.len = 0;
        self.entries = 0;
    }
}

impl<T: Debug, const D: usize, V> Debug for HashGrid<T, D, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashGrid")
            .field("geometry", &self.geometry)
            .field("len", &self.len)
            .field("entries", &self.entries)
            .field("cells", &self.cells.len())
            .field("occupied", &self.occupied)
            .finish_non_exhaustive()
    }
}
