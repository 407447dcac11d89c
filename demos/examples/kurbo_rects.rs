// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D layout boxes with kurbo.
//!
//! Store `kurbo::Rect` values directly, then query by region and by point.
//!
//! Run:
//! - `cargo run -p lattice_demos --example kurbo_rects`

use kurbo::{Point, Rect};
use lattice_geom::Aabb;
use lattice_grid::{CellMap, GridGeometry, HashGrid, Resolution};

fn main() {
    let page = Rect::new(0.0, 0.0, 800.0, 600.0);
    let geometry = GridGeometry::with_resolution(Aabb::from(page), Resolution::CellSize(50.0));
    let mut grid: HashGrid<f64, 2, Rect> = HashGrid::new(geometry);

    let widgets = [
        Rect::new(10.0, 10.0, 200.0, 40.0),
        Rect::new(10.0, 60.0, 390.0, 580.0),
        Rect::new(410.0, 60.0, 790.0, 300.0),
        Rect::new(410.0, 320.0, 790.0, 580.0),
    ];
    for w in widgets {
        grid.insert(w);
    }
    println!("{} widgets, {} cell entries", grid.len(), grid.entry_count());

    // Region query: what does the right column overlap?
    let column = Aabb::from(Rect::new(400.0, 0.0, 800.0, 600.0));
    let hits = grid.values_in_box(&column);
    println!("right column: {hits:?}");
    assert_eq!(hits.len(), 2);

    // The widget nearest to a click in the gutter
    let click = Point::new(400.0, 200.0);
    if let Some(n) = grid.nearest(&click.into()) {
        println!("nearest to {click:?}: {:?} at {}", n.value, n.distance);
    }
}
