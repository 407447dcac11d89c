// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deduplicated cell map: each value stored once, cells hold slot indices.

use core::fmt::Debug;

use lattice_geom::{Aabb, Point, Scalar, Sphere};
use rustc_hash::FxHashMap;

use crate::cell::{CellCoord, CellRange};
use crate::geometry::{GridGeometry, Resolution};
use crate::map::CellMap;
use crate::marks::VisitMarks;
use crate::query::{Neighbor, ring_search};
use crate::value::{GridValue, placement_of};

/// Sparse uniform grid storing each distinct value once.
///
/// Values live in a slot array with a free list; cells hold slot indices.
/// Inserting a value equal to one already stored is refused. Queries that
/// can meet a value in several cells deduplicate with [`VisitMarks`]; the
/// `_with` variants take a caller-owned scratch to avoid allocating it.
///
/// ```rust
/// use lattice_geom::{Aabb, Point, Sphere};
/// use lattice_grid::{CellMap, DedupHashGrid, GridGeometry, VisitMarks};
///
/// let geometry = GridGeometry::new(
///     Aabb::new(Point::new([0.0, 0.0]), Point::new([4.0, 4.0])),
///     [4, 4],
/// );
/// let mut grid = DedupHashGrid::new(geometry);
/// let room = Aabb::new(Point::new([0.5, 0.5]), Point::new([2.5, 2.5]));
/// assert!(grid.insert(room));
/// assert!(!grid.insert(room));
///
/// let mut marks = VisitMarks::new();
/// let hits = grid.values_in_sphere_with(&Sphere::new(Point::new([2.0, 2.0]), 1.0), &mut marks);
/// assert_eq!(hits, vec![&room]);
/// ```
pub struct DedupHashGrid<T, const D: usize, V> {
    geometry: GridGeometry<T, D>,
    slots: Vec<Option<V>>,
    free_list: Vec<usize>,
    cells: FxHashMap<CellCoord<D>, Vec<usize>>,
    occupied: Option<CellRange<D>>,
    len: usize,
}

impl<T, const D: usize, V> DedupHashGrid<T, D, V>
where
    T: Scalar,
    V: GridValue<T, D> + PartialEq,
{
    /// Create an empty grid.
    pub fn new(geometry: GridGeometry<T, D>) -> Self {
        Self {
            geometry,
            slots: Vec::new(),
            free_list: Vec::new(),
            cells: FxHashMap::default(),
            occupied: None,
            len: 0,
        }
    }

    /// Build a grid enclosing `values` and insert all of them.
    pub fn from_values<I: IntoIterator<Item = V>>(values: I, resolution: Resolution<T, D>) -> Self {
        let values: Vec<V> = values.into_iter().collect();
        let mut grid = Self::new(GridGeometry::enclosing(&values, resolution));
        grid.slots.reserve(values.len());
        for value in values {
            grid.insert(value);
        }
        grid
    }

    /// Value stored in `slot`, if the slot is live.
    pub fn get(&self, slot: usize) -> Option<&V> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Slot holding a value equal to `value`, if one is stored.
    pub fn slot_of(&self, value: &V) -> Option<usize> {
        let cell = placement_of(value)?.cell_range(&self.geometry).first;
        self.find_in_cell(&cell, value)
    }

    /// Every stored value with its slot, in slot order.
    pub fn values(&self) -> impl Iterator<Item = (usize, &V)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, v)| Some((slot, v.as_ref()?)))
    }

    /// Size of the slot array, live and free slots included.
    pub fn slot_capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots of the values passing their sphere test.
    pub fn slots_in_sphere(&self, sphere: &Sphere<T, D>) -> Vec<usize> {
        self.slots_in_sphere_with(sphere, &mut VisitMarks::new())
    }

    /// [`slots_in_sphere`](Self::slots_in_sphere) with caller-owned marks.
    pub fn slots_in_sphere_with(&self, sphere: &Sphere<T, D>, marks: &mut VisitMarks) -> Vec<usize> {
        let query = self.geometry.sphere_range(sphere);
        let mut out = Vec::new();
        marks.begin(self.slots.len());
        self.for_each_slot_in(&query, |slot, v| {
            if marks.mark(slot) && v.in_sphere(sphere) {
                out.push(slot);
            }
        });
        out
    }

    /// [`values_in_sphere`](CellMap::values_in_sphere) with caller-owned marks.
    pub fn values_in_sphere_with(&self, sphere: &Sphere<T, D>, marks: &mut VisitMarks) -> Vec<&V> {
        self.slots_in_sphere_with(sphere, marks)
            .into_iter()
            .filter_map(|slot| self.get(slot))
            .collect()
    }

    /// [`values_in_box`](CellMap::values_in_box) with caller-owned marks.
    pub fn values_in_box_with(&self, aabb: &Aabb<T, D>, marks: &mut VisitMarks) -> Vec<&V> {
        let query = self.geometry.cell_range(aabb);
        let mut out = Vec::new();
        marks.begin(self.slots.len());
        self.for_each_slot_in(&query, |slot, v| {
            if marks.mark(slot) && v.in_box(aabb) {
                out.push(v);
            }
        });
        out
    }

    /// Up to `k` nearest values as `(slot, distance)`, ascending by distance.
    pub fn k_nearest_slots(&self, p: &Point<T, D>, k: usize) -> Vec<(usize, T)> {
        self.k_nearest_slots_with(p, k, T::INFINITY, &mut VisitMarks::new())
    }

    /// [`k_nearest_slots`](Self::k_nearest_slots) bounded by `max_distance`,
    /// with caller-owned marks.
    pub fn k_nearest_slots_with(
        &self,
        p: &Point<T, D>,
        k: usize,
        max_distance: T,
        marks: &mut VisitMarks,
    ) -> Vec<(usize, T)> {
        marks.begin(self.slots.len());
        let cells = self.cells.len();
        ring_search(&self.geometry, self.occupied, cells, p, k, max_distance, |piece, heap| {
            self.for_each_slot_in(piece, |slot, v| {
                if !marks.mark(slot) {
                    return;
                }
                if let Some(d) = v.distance_to(p) {
                    heap.offer(slot, d);
                }
            });
        })
    }

    fn find_in_cell(&self, cell: &CellCoord<D>, value: &V) -> Option<usize> {
        self.cells
            .get(cell)?
            .iter()
            .copied()
            .find(|&slot| self.get(slot) == Some(value))
    }

    fn for_each_slot_in<'a>(&'a self, range: &CellRange<D>, mut f: impl FnMut(usize, &'a V)) {
        let Some(occupied) = self.occupied else {
            return;
        };
        let range = range.intersect(&occupied);
        if range.is_empty() {
            return;
        }
        let mut visit_bucket = |bucket: &[usize]| {
            for &slot in bucket {
                if let Some(v) = self.get(slot) {
                    f(slot, v);
                }
            }
        };
        if range.len() <= self.cells.len() {
            for cell in &range {
                if let Some(bucket) = self.cells.get(&cell) {
                    visit_bucket(bucket.as_slice());
                }
            }
        } else {
            for (cell, bucket) in &self.cells {
                if range.contains(cell) {
                    visit_bucket(bucket.as_slice());
                }
            }
        }
    }

    /// Unlink and free `slot`. Returns whether it was live.
    fn erase_slot(&mut self, slot: usize) -> bool {
        let Some(value) = self.slots.get_mut(slot).and_then(Option::take) else {
            return false;
        };
        if let Some(placement) = value.placement() {
            for cell in &placement.cell_range(&self.geometry) {
                let Some(bucket) = self.cells.get_mut(&cell) else {
                    continue;
                };
                if let Some(pos) = bucket.iter().position(|&s| s == slot) {
                    bucket.remove(pos);
                }
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
        self.free_list.push(slot);
        self.len -= 1;
        if self.len == 0 {
            self.occupied = None;
        }
        true
    }
}

impl<T, const D: usize, V> CellMap<T, D> for DedupHashGrid<T, D, V>
where
    T: Scalar,
    V: GridValue<T, D> + PartialEq,
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
        if self.find_in_cell(&range.first, &value).is_some() {
            return false;
        }
        let slot = if let Some(slot) = self.free_list.pop() {
            self.slots[slot] = Some(value);
            slot
        } else {
            self.slots.push(Some(value));
            self.slots.len() - 1
        };
        for cell in &range {
            self.cells.entry(cell).or_default().push(slot);
        }
        self.len += 1;
        self.occupied = Some(match self.occupied {
            Some(occupied) => occupied.union(&range),
            None => range,
        });
        true
    }

    fn erase(&mut self, value: &V) -> bool {
        match self.slot_of(value) {
            Some(slot) => self.erase_slot(slot),
            None => {
                log::debug!("erase found no entry for placement {:?}", value.placement());
                false
            }
        }
    }

    fn values_in_cell<'a>(&'a self, cell: &CellCoord<D>) -> Box<dyn Iterator<Item = &'a V> + 'a> {
        Box::new(
            self.cells
                .get(cell)
                .into_iter()
                .flatten()
                .filter_map(|&slot| self.get(slot)),
        )
    }

    fn count_in_cell(&self, cell: &CellCoord<D>) -> usize {
        self.cells.get(cell).map_or(0, Vec::len)
    }

    fn non_empty_cells<'a>(&'a self) -> Box<dyn Iterator<Item = CellCoord<D>> + 'a> {
        Box::new(self.cells.keys().copied())
    }

    fn values_in_sphere(&self, sphere: &Sphere<T, D>) -> Vec<&V> {
        self.values_in_sphere_with(sphere, &mut VisitMarks::new())
    }

    fn values_in_box(&self, aabb: &Aabb<T, D>) -> Vec<&V> {
        self.values_in_box_with(aabb, &mut VisitMarks::new())
    }

    fn count_in_sphere(&self, sphere: &Sphere<T, D>) -> usize {
        self.slots_in_sphere(sphere).len()
    }

    fn erase_in_sphere(&mut self, sphere: &Sphere<T, D>) -> usize {
        let slots = self.slots_in_sphere(sphere);
        slots.into_iter().filter(|&slot| self.erase_slot(slot)).count()
    }

    fn k_nearest_within(
        &self,
        p: &Point<T, D>,
        k: usize,
        max_distance: T,
    ) -> Vec<Neighbor<'_, V, T>> {
        self.k_nearest_slots_with(p, k, max_distance, &mut VisitMarks::new())
            .into_iter()
            .filter_map(|(slot, distance)| {
                Some(Neighbor {
                    value: self.get(slot)?,
                    distance,
                })
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.cells.clear();
        self.occupied = None;
        self.len = 0;
    }
}

impl<T: Debug, const D: usize, V> Debug for DedupHashGrid<T, D, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DedupHashGrid")
            .field("geometry", &self.geometry)
            .field("len", &self.len)
            .field("total_slots", &self.slots.len())
            .field("free_slots", &self.free_list.len())
            .field("cells", &self.cells.len())
            .field("occupied", &self.occupied)
            .finish_non_exhaustive()
    }
}
