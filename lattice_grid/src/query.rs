// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-neighbor search: bounded candidate heap and ring expansion.

use core::cmp::Ordering;
use std::collections::BinaryHeap;

use lattice_geom::{Point, Scalar};

use crate::cell::{CellCoord, CellRange};
use crate::geometry::GridGeometry;

/// A value found by a nearest-neighbor query.
#[derive(Debug, PartialEq)]
pub struct Neighbor<'a, V, T> {
    /// The stored value.
    pub value: &'a V,
    /// Distance from the query point.
    pub distance: T,
}

impl<V, T: Copy> Clone for Neighbor<'_, V, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, T: Copy> Copy for Neighbor<'_, V, T> {}

struct Candidate<C, T> {
    distance: T,
    seq: u64,
    item: C,
}

impl<C, T: PartialOrd> Ord for Candidate<C, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then(self.seq.cmp(&other.seq))
    }
}

impl<C, T: PartialOrd> PartialOrd for Candidate<C, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C, T: PartialOrd> PartialEq for Candidate<C, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C, T: PartialOrd> Eq for Candidate<C, T> {}

/// The `k` best candidates seen so far, worst on top.
///
/// Candidates farther than `max_distance` are dropped. Equal distances keep
/// the earlier-offered candidate.
pub(crate) struct KnnHeap<C, T> {
    k: usize,
    max_distance: T,
    heap: BinaryHeap<Candidate<C, T>>,
    seq: u64,
}

impl<C, T: Scalar> KnnHeap<C, T> {
    pub(crate) fn new(k: usize, max_distance: T) -> Self {
        Self {
            k,
            max_distance,
            heap: BinaryHeap::with_capacity(k.min(1024) + 1),
            seq: 0,
        }
    }

    pub(crate) fn offer(&mut self, item: C, distance: T) {
        let within = matches!(
            distance.partial_cmp(&self.max_distance),
            Some(Ordering::Less | Ordering::Equal)
        );
        if self.k == 0 || !within {
            return;
        }
        let candidate = Candidate {
            distance,
            seq: self.seq,
            item,
        };
        self.seq += 1;
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if self.heap.peek().is_some_and(|top| candidate < *top) {
            self.heap.pop();
            self.heap.push(candidate);
        }
    }

    /// Distance of the k-th best candidate once the heap is full.
    pub(crate) fn worst(&self) -> Option<T> {
        if self.heap.len() < self.k {
            return None;
        }
        self.heap.peek().map(|c| c.distance)
    }

    /// Number of candidates offered so far.
    pub(crate) fn offered(&self) -> u64 {
        self.seq
    }

    /// Candidates ascending by distance, ties in offer order.
    pub(crate) fn into_sorted(self) -> Vec<(C, T)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| (c.item, c.distance))
            .collect()
    }
}

/// Concentric shells of cells around a center cell.
///
/// Shells are clipped to the range of occupied cells, and expansion starts
/// at the first shell that reaches it. Each shell is split into disjoint
/// boxes so no cell is visited twice.
///
/// A shell whose box would leave the `i64` cell space is never built:
/// expansion then hands out the rest of the occupied range at once.
#[derive(Debug)]
pub(crate) struct RingExpansion<const D: usize> {
    center: CellCoord<D>,
    occupied: CellRange<D>,
    radius: u64,
    scanned: Option<CellRange<D>>,
    exhausted: bool,
}

impl<const D: usize> RingExpansion<D> {
    pub(crate) fn new(center: CellCoord<D>, occupied: CellRange<D>) -> Self {
        Self {
            center,
            occupied,
            radius: occupied.chebyshev_distance_to(&center),
            scanned: None,
            exhausted: occupied.is_empty(),
        }
    }

    /// Box of cells within the current radius, if it fits in `i64`.
    fn shell_box(&self) -> Option<CellRange<D>> {
        let r = i64::try_from(self.radius).ok()?;
        let mut first = [0_i64; D];
        let mut last = [0_i64; D];
        for i in 0..D {
            first[i] = self.center.0[i].checked_sub(r)?;
            last[i] = self.center.0[i].checked_add(r)?;
        }
        Some(CellRange::new(CellCoord(first), CellCoord(last)))
    }

    /// Fill `pieces` with the next shell and return the box scanned so far.
    pub(crate) fn next_ring(&mut self, pieces: &mut Vec<CellRange<D>>) -> Option<CellRange<D>> {
        if self.exhausted {
            return None;
        }
        let Some(scanned) = self.shell_box() else {
            return self.finish(pieces);
        };
        pieces.clear();
        let r = i64::try_from(self.radius).unwrap_or(i64::MAX);
        let c = self.center.0;
        if r == 0 {
            pieces.push(CellRange::single(self.center));
        } else {
            for axis in 0..D {
                for side in [-r, r] {
                    let mut first = [0_i64; D];
                    let mut last = [0_i64; D];
                    for j in 0..D {
                        let reach = match j.cmp(&axis) {
                            Ordering::Less => r - 1,
                            Ordering::Equal => {
                                first[j] = c[j] + side;
                                last[j] = first[j];
                                continue;
                            }
                            Ordering::Greater => r,
                        };
                        first[j] = c[j] - reach;
                        last[j] = c[j] + reach;
                    }
                    pieces.push(CellRange::new(CellCoord(first), CellCoord(last)));
                }
            }
        }
        pieces.retain_mut(|piece| {
            *piece = piece.intersect(&self.occupied);
            !piece.is_empty()
        });
        if scanned.contains_range(&self.occupied) {
            self.exhausted = true;
        }
        self.scanned = Some(scanned);
        self.radius = self.radius.saturating_add(1);
        Some(scanned)
    }

    /// Fill `pieces` with every occupied cell not handed out yet and stop.
    ///
    /// Returns the occupied range, which is then fully scanned.
    pub(crate) fn finish(&mut self, pieces: &mut Vec<CellRange<D>>) -> Option<CellRange<D>> {
        if self.exhausted {
            return None;
        }
        pieces.clear();
        match self.scanned {
            Some(hole) => self.occupied.subtract_into(&hole, pieces),
            None => pieces.push(self.occupied),
        }
        self.exhausted = true;
        Some(self.occupied)
    }

    /// Whether every occupied cell has been handed out.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Cells a search may walk shell by shell before it takes the rest of the
/// occupied range in one pass, per non-empty cell.
const CELLS_PER_OCCUPIED_CELL: usize = 4;

/// Ring-expansion k-nearest search over a sparse grid.
///
/// `visit` is called once per disjoint range of candidate cells and offers
/// the values stored there to the heap. The search stops once the k-th best
/// distance is no larger than the distance from `p` to the unscanned region,
/// once that region is farther than `max_distance`, or once every occupied
/// cell was scanned.
///
/// Shells that walk many more cells than the map holds (a far query, or
/// values scattered over a huge range) give way to a single pass over the
/// remaining occupied cells.
pub(crate) fn ring_search<T, const D: usize, C>(
    geometry: &GridGeometry<T, D>,
    occupied: Option<CellRange<D>>,
    non_empty_cells: usize,
    p: &Point<T, D>,
    k: usize,
    max_distance: T,
    mut visit: impl FnMut(&CellRange<D>, &mut KnnHeap<C, T>),
) -> Vec<(C, T)>
where
    T: Scalar,
{
    let Some(occupied) = occupied.filter(|_| k > 0) else {
        return Vec::new();
    };
    let budget = non_empty_cells.saturating_mul(CELLS_PER_OCCUPIED_CELL).max(64);
    let mut heap = KnnHeap::new(k, max_distance);
    let mut rings = RingExpansion::new(geometry.cell(p), occupied);
    let mut pieces = Vec::new();
    let mut ring_count = 0_usize;
    let mut cell_count = 0_usize;
    loop {
        let next = if cell_count > budget {
            rings.finish(&mut pieces)
        } else {
            rings.next_ring(&mut pieces)
        };
        let Some(scanned) = next else {
            break;
        };
        ring_count += 1;
        for piece in &pieces {
            cell_count = cell_count.saturating_add(piece.len());
            visit(piece, &mut heap);
        }
        if rings.is_exhausted() {
            break;
        }
        let clearance = geometry.clearance(p, &scanned);
        if clearance > max_distance || heap.worst().is_some_and(|worst| worst <= clearance) {
            break;
        }
    }
    log::trace!(
        "k-nearest search: k={k}, rings={ring_count}, cells={cell_count}, candidates={}",
        heap.offered()
    );
    heap.into_sorted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn heap_keeps_k_smallest_in_order() {
        let mut heap = KnnHeap::new(3, f64::MAX);
        for (i, d) in [5.0, 1.0, 4.0, 2.0, 3.0].into_iter().enumerate() {
            heap.offer(i, d);
        }
        assert_eq!(heap.worst(), Some(3.0));
        let sorted: Vec<_> = heap.into_sorted();
        assert_eq!(sorted, vec![(1, 1.0), (3, 2.0), (4, 3.0)]);
    }

    #[test]
    fn heap_ties_keep_discovery_order() {
        let mut heap = KnnHeap::new(2, f64::MAX);
        heap.offer('a', 1.0);
        heap.offer('b', 1.0);
        heap.offer('c', 1.0);
        heap.offer('d', 0.5);
        let items: Vec<_> = heap.into_sorted().into_iter().map(|(c, _)| c).collect();
        assert_eq!(items, vec!['d', 'a']);
    }

    #[test]
    fn heap_respects_max_distance_and_zero_k() {
        let mut heap = KnnHeap::new(4, 1.0);
        heap.offer(0, 1.0);
        heap.offer(1, 1.5);
        assert_eq!(heap.into_sorted(), vec![(0, 1.0)]);
        let mut empty = KnnHeap::new(0, f64::MAX);
        empty.offer(0, 0.0);
        assert_eq!(empty.worst(), None);
        assert!(empty.into_sorted().is_empty());
    }

    #[test]
    fn rings_partition_the_occupied_range() {
        let occupied = CellRange::new(CellCoord([-3, -1, 0]), CellCoord([4, 5, 2]));
        let mut rings = RingExpansion::new(CellCoord([0, 0, 1]), occupied);
        let mut pieces = Vec::new();
        let mut seen = HashSet::new();
        let mut radius = 0;
        while let Some(scanned) = rings.next_ring(&mut pieces) {
            for cell in pieces.iter().flat_map(|p| p.iter()) {
                assert_eq!(cell.chebyshev_distance(&CellCoord([0, 0, 1])), radius);
                assert!(scanned.contains(&cell), "cell outside scanned box");
                assert!(seen.insert(cell), "cell {cell:?} visited twice");
            }
            radius += 1;
        }
        assert_eq!(seen.len(), occupied.len());
    }

    #[test]
    fn rings_start_at_the_occupied_range() {
        let occupied = CellRange::new(CellCoord([10, 10]), CellCoord([11, 11]));
        let mut rings = RingExpansion::new(CellCoord([0, 10]), occupied);
        let mut pieces = Vec::new();
        let scanned = rings.next_ring(&mut pieces).unwrap();
        assert_eq!(scanned, CellRange::around(CellCoord([0, 10]), 10));
        let cells: Vec<_> = pieces.iter().flat_map(|p| p.iter()).collect();
        assert_eq!(cells, vec![CellCoord([10, 10]), CellCoord([10, 11])]);
        assert!(!rings.is_exhausted());
        rings.next_ring(&mut pieces).unwrap();
        assert!(rings.is_exhausted());
        assert!(rings.next_ring(&mut pieces).is_none());
    }

    #[test]
    fn rings_past_the_cell_space_hand_out_the_rest_at_once() {
        let occupied = CellRange::new(CellCoord([0, 0]), CellCoord([3, 3]));
        let centers = [
            CellCoord([i64::MIN, 0]),
            CellCoord([i64::MAX, 2]),
            CellCoord([1, i64::MIN]),
        ];
        for center in centers {
            let mut rings = RingExpansion::new(center, occupied);
            let mut pieces = Vec::new();
            assert_eq!(rings.next_ring(&mut pieces), Some(occupied));
            assert_eq!(pieces, vec![occupied]);
            assert!(rings.is_exhausted());
            assert!(rings.next_ring(&mut pieces).is_none());
        }
    }

    #[test]
    fn rings_near_the_cell_space_edge_still_partition() {
        let occupied = CellRange::new(CellCoord([i64::MAX - 6, -2]), CellCoord([i64::MAX, 3]));
        let center = CellCoord([i64::MAX - 2, 0]);
        let mut rings = RingExpansion::new(center, occupied);
        let mut pieces = Vec::new();
        let mut seen = HashSet::new();
        while rings.next_ring(&mut pieces).is_some() {
            for cell in pieces.iter().flat_map(|p| p.iter()) {
                assert!(occupied.contains(&cell));
                assert!(seen.insert(cell), "cell {cell:?} visited twice");
            }
        }
        assert_eq!(seen.len(), occupied.len());
    }

    #[test]
    fn finish_skips_cells_already_scanned() {
        let occupied = CellRange::new(CellCoord([-3, -1]), CellCoord([4, 5]));
        let mut rings = RingExpansion::new(CellCoord([0, 0]), occupied);
        let mut pieces = Vec::new();
        rings.next_ring(&mut pieces).unwrap();
        rings.next_ring(&mut pieces).unwrap();
        assert_eq!(rings.finish(&mut pieces), Some(occupied));
        let rest: HashSet<_> = pieces.iter().flat_map(|p| p.iter()).collect();
        assert_eq!(rest.len(), occupied.len() - 9);
        assert!(rest.iter().all(|c| c.chebyshev_distance(&CellCoord([0, 0])) > 1));
        assert!(rings.is_exhausted());
        assert!(rings.finish(&mut pieces).is_none());
    }

    #[test]
    fn search_from_a_saturated_cell_terminates() {
        let geometry = GridGeometry::new(
            lattice_geom::Aabb::new(Point::new([0.0, 0.0]), Point::new([4.0, 4.0])),
            [4, 4],
        );
        let occupied = Some(CellRange::new(CellCoord([0, 0]), CellCoord([3, 3])));
        let mut visited = 0;
        let found = ring_search(
            &geometry,
            occupied,
            2,
            &Point::new([-1e19, 0.5]),
            1,
            f64::INFINITY,
            |piece: &CellRange<2>, heap| {
                visited += piece.len();
                heap.offer((), 1.0);
            },
        );
        assert_eq!(visited, 16);
        assert_eq!(found.len(), 1);
    }
}
