// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lattice Grid: uniform-grid spatial hashing with range and nearest queries.
//!
//! A [`GridGeometry`] subdivides a bounding box into `count` cells per axis.
//! Values are hashed into the cells their placement overlaps, and only
//! non-empty cells are stored. Two storage variants implement [`CellMap`]:
//!
//! - [`HashGrid`]: each cell holds its own copy of every value overlapping it.
//! - [`DedupHashGrid`]: each value is stored once; cells hold slot indices and
//!   queries deduplicate with generation-stamped [`VisitMarks`].
//!
//! Queries:
//!
//! - Sphere range queries ([`CellMap::values_in_sphere`]) scan the cells
//!   under the sphere's bounding box and report each value once.
//! - k-nearest search ([`CellMap::k_nearest`]) expands rings of cells around
//!   the query point and stops once the k-th best distance is no larger than
//!   the distance to any unscanned cell. Results equal a brute-force scan.
//! - Point location ([`GridGeometry::cell`], [`CellMap::values_in_cell`]).
//!
//! What a value is, and how it is tested, is decided at compile time by
//! [`GridValue`]: points and [`ByPosition`] values occupy one cell, bounded
//! shapes and [`ByBounds`] values occupy every cell their box overlaps,
//! references and boxes delegate, and `Option::None` is stored nowhere.
//!
//! # Example
//!
//! ```rust
//! use lattice_geom::{Point, Sphere};
//! use lattice_grid::{CellMap, HashGrid, Resolution};
//!
//! let points: Vec<Point<f64, 3>> = (0..100)
//!     .map(|i| {
//!         let t = f64::from(i);
//!         Point::new([t % 10.0, (t / 10.0).floor(), 0.5])
//!     })
//!     .collect();
//! let grid = HashGrid::from_values(points, Resolution::for_population(100));
//!
//! let hits = grid.values_in_sphere(&Sphere::new(Point::new([4.0, 4.0, 0.5]), 1.0));
//! assert_eq!(hits.len(), 5);
//!
//! let knn = grid.k_nearest(&Point::new([0.2, 0.1, 0.5]), 3);
//! assert_eq!(*knn[0].value, Point::new([0.0, 0.0, 0.5]));
//! assert!(knn.windows(2).all(|w| w[0].distance <= w[1].distance));
//! ```
//!
//! ## Features
//!
//! - `kurbo` (default): store `kurbo::Point` and `kurbo::Rect` directly in
//!   `f64` 2D grids.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: geometry
//! repairs and unmatched erasures at `debug`, a per-search summary of
//! nearest-neighbor work at `trace`.

mod cell;
mod dedup_grid;
mod error;
mod geometry;
mod hash_grid;
mod map;
mod marks;
mod query;
mod value;

pub use cell::{CellCoord, CellIter, CellRange};
pub use dedup_grid::DedupHashGrid;
pub use error::GridError;
pub use geometry::{GridGeometry, Resolution};
pub use hash_grid::HashGrid;
pub use map::CellMap;
pub use marks::VisitMarks;
pub use query::Neighbor;
pub use value::{ByBounds, ByPosition, GridValue, Placement};
