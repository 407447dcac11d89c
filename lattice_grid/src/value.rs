// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! How stored values are placed in the grid and tested against queries.
//!
//! A grid stores any `V: GridValue<T, D>`. The category of a value is fixed
//! at compile time by its type:
//!
//! - raw points ([`Point`]) and position-bearing values ([`ByPosition`])
//!   occupy the single cell containing their position;
//! - bounded values ([`Aabb`], [`Sphere`], [`Triangle`], [`Segment`], and
//!   anything wrapped in [`ByBounds`]) occupy every cell their bounding box
//!   overlaps;
//! - references and boxes delegate to their referent, and `Option<V>` places
//!   `None` nowhere.

use lattice_geom::{
    Aabb, Bounded, Point, Positioned, Scalar, Segment, Sphere, Triangle, distance, intersects,
};

use crate::cell::CellRange;
use crate::geometry::GridGeometry;

/// Where a value sits in space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Placement<T, const D: usize> {
    /// A single position.
    Point(Point<T, D>),
    /// An axis-aligned extent.
    Bounds(Aabb<T, D>),
}

impl<T: Scalar, const D: usize> Placement<T, D> {
    /// Bounding box of the placement (zero-volume for points).
    pub fn bounding_box(&self) -> Aabb<T, D> {
        match self {
            Self::Point(p) => Aabb::from_point(*p),
            Self::Bounds(b) => *b,
        }
    }

    /// Whether the placement covers no space at all (an inverted box).
    ///
    /// Grids treat such a value like a null handle.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::Bounds(b) => b.is_empty(),
        }
    }

    /// Cells of `geometry` this placement occupies.
    pub fn cell_range(&self, geometry: &GridGeometry<T, D>) -> CellRange<D> {
        match self {
            Self::Point(p) => CellRange::single(geometry.cell(p)),
            Self::Bounds(b) => geometry.cell_range(b),
        }
    }
}

/// Placement of a value a grid can store: `None` for null handles and for
/// empty boxes.
pub(crate) fn placement_of<T, const D: usize, V>(value: &V) -> Option<Placement<T, D>>
where
    T: Scalar,
    V: GridValue<T, D> + ?Sized,
{
    value.placement().filter(|p| !p.is_empty())
}

/// A value that can be stored in a grid.
///
/// Only [`placement`](GridValue::placement) is required. The query tests
/// default to working on the placement: exact for points, bounding-box based
/// for extents, so an extent passes whenever its box does.
///
/// The built-in [`Sphere`], [`Triangle`] and [`Segment`] impls override the
/// tests with exact ones. [`Aabb`], [`ByBounds`] and any impl keeping the
/// defaults use the bounding-box tests. A placement with an empty box is
/// never stored.
pub trait GridValue<T: Scalar, const D: usize> {
    /// Current placement, or `None` for a null handle.
    fn placement(&self) -> Option<Placement<T, D>>;

    /// Inclusion test used by sphere range queries.
    ///
    /// The default is bounding-box based for extents, so false positives
    /// are expected there.
    fn in_sphere(&self, sphere: &Sphere<T, D>) -> bool {
        match self.placement() {
            Some(Placement::Point(p)) => intersects(&p, sphere),
            Some(Placement::Bounds(b)) => intersects(sphere, &b),
            None => false,
        }
    }

    /// Inclusion test used by box range queries.
    fn in_box(&self, aabb: &Aabb<T, D>) -> bool {
        match self.placement() {
            Some(Placement::Point(p)) => intersects(&p, aabb),
            Some(Placement::Bounds(b)) => intersects(&b, aabb),
            None => false,
        }
    }

    /// Distance from `p`, used to rank nearest-neighbor candidates.
    fn distance_to(&self, p: &Point<T, D>) -> Option<T> {
        Some(match self.placement()? {
            Placement::Point(q) => distance(p, &q),
            Placement::Bounds(b) => distance(p, &b),
        })
    }
}

impl<T: Scalar, const D: usize> GridValue<T, D> for Point<T, D> {
    fn placement(&self) -> Option<Placement<T, D>> {
        Some(Placement::Point(*self))
    }
}

impl<T: Scalar, const D: usize> GridValue<T, D> for Aabb<T, D> {
    fn placement(&self) -> Option<Placement<T, D>> {
        Some(Placement::Bounds(*self))
    }
}

impl<T: Scalar, const D: usize> GridValue<T, D> for Sphere<T, D> {
    fn placement(&self) -> Option<Placement<T, D>> {
        Some(Placement::Bounds(self.bounding_box()))
    }

    fn in_sphere(&self, sphere: &Sphere<T, D>) -> bool {
        intersects(self, sphere)
    }

    fn in_box(&self, aabb: &Aabb<T, D>) -> bool {
        intersects(self, aabb)
    }

    fn distance_to(&self, p: &Point<T, D>) -> Option<T> {
        Some(distance(p, self))
    }
}

impl<T: Scalar, const D: usize> GridValue<T, D> for Triangle<T, D> {
    fn placement(&self) -> Option<Placement<T, D>> {
        Some(Placement::Bounds(self.bounding_box()))
    }

    fn in_sphere(&self, sphere: &Sphere<T, D>) -> bool {
        intersects(self, sphere)
    }

    fn distance_to(&self, p: &Point<T, D>) -> Option<T> {
        Some(distance(p, self))
    }
}

impl<T: Scalar, const D: usize> GridValue<T, D> for Segment<T, D> {
    fn placement(&self) -> Option<Placement<T, D>> {
        Some(Placement::Bounds(self.bounding_box()))
    }

    fn in_sphere(&self, sphere: &Sphere<T, D>) -> bool {
        intersects(self, sphere)
    }

    fn distance_to(&self, p: &Point<T, D>) -> Option<T> {
        Some(distance(p, self))
    }
}

impl<T: Scalar, const D: usize, V: GridValue<T, D> + ?Sized> GridValue<T, D> for &V {
    fn placement(&self) -> Option<Placement<T, D>> {
        (**self).placement()
    }

    fn in_sphere(&self, sphere: &Sphere<T, D>) -> bool {
        (**self).in_sphere(sphere)
    }

    fn in_box(&self, aabb: &Aabb<T, D>) -> bool {
        (**self).in_box(aabb)
    }

    fn distance_to(&self, p: &Point<T, D>) -> Option<T> {
        (**self).distance_to(p)
    }
}

impl<T: Scalar, const D: usize, V: GridValue<T, D> + ?Sized> GridValue<T, D> for Box<V> {
    fn placement(&self) -> Option<Placement<T, D>> {
        (**self).placement()
    }

    fn in_sphere(&self, sphere: &Sphere<T, D>) -> bool {
        (**self).in_sphere(sphere)
    }

    fn in_box(&self, aabb: &Aabb<T, D>) -> bool {
        (**self).in_box(aabb)
    }

    fn distance_to(&self, p: &Point<T, D>) -> Option<T> {
        (**self).distance_to(p)
    }
}

/// `None` is a null handle: it has no placement and matches no query.
impl<T: Scalar, const D: usize, V: GridValue<T, D>> GridValue<T, D> for Option<V> {
    fn placement(&self) -> Option<Placement<T, D>> {
        self.as_ref()?.placement()
    }

    fn in_sphere(&self, sphere: &Sphere<T, D>) -> bool {
        self.as_ref().is_some_and(|v| v.in_sphere(sphere))
    }

    fn in_box(&self, aabb: &Aabb<T, D>) -> bool {
        self.as_ref().is_some_and(|v| v.in_box(aabb))
    }

    fn distance_to(&self, p: &Point<T, D>) -> Option<T> {
        self.as_ref()?.distance_to(p)
    }
}

/// Store a [`Positioned`] value by its position (a single cell).
///
/// ```rust
/// use lattice_geom::{Point, Positioned};
/// use lattice_grid::{ByPosition, GridValue, Placement};
///
/// #[derive(Clone, PartialEq)]
/// struct Vertex { id: u32, pos: [f64; 3] }
///
/// impl Positioned<f64, 3> for Vertex {
///     fn position(&self) -> Point<f64, 3> { Point::new(self.pos) }
/// }
///
/// let v = ByPosition(Vertex { id: 7, pos: [1.0, 2.0, 3.0] });
/// let placed: Option<Placement<f64, 3>> = v.placement();
/// assert_eq!(placed, Some(Placement::Point(Point::new([1.0, 2.0, 3.0]))));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByPosition<V>(pub V);

impl<T: Scalar, const D: usize, V: Positioned<T, D>> GridValue<T, D> for ByPosition<V> {
    fn placement(&self) -> Option<Placement<T, D>> {
        Some(Placement::Point(self.0.position()))
    }
}

/// Store a [`Bounded`] value in every cell its bounding box overlaps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByBounds<V>(pub V);

impl<T: Scalar, const D: usize, V: Bounded<T, D>> GridValue<T, D> for ByBounds<V> {
    fn placement(&self) -> Option<Placement<T, D>> {
        Some(Placement::Bounds(self.0.bounding_box()))
    }
}

#[cfg(feature = "kurbo")]
impl GridValue<f64, 2> for kurbo::Point {
    fn placement(&self) -> Option<Placement<f64, 2>> {
        Some(Placement::Point((*self).into()))
    }
}

#[cfg(feature = "kurbo")]
impl GridValue<f64, 2> for kurbo::Rect {
    fn placement(&self) -> Option<Placement<f64, 2>> {
        Some(Placement::Bounds((*self).into()))
    }
}
