// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mesh faces in a deduplicated grid.
//!
//! Store the faces of a triangulated height field once each, find the face
//! closest to a probe, and cut a hole with a sphere.
//!
//! Run:
//! - `cargo run -p lattice_demos --example mesh_faces`

use lattice_geom::{Point, Sphere, Triangle};
use lattice_grid::{CellMap, DedupHashGrid, Resolution, VisitMarks};

fn height(x: f64, y: f64) -> f64 {
    0.25 * (x * 0.8).sin() * (y * 0.6).cos()
}

fn main() {
    let n = 24;
    let vertex = |i: usize, j: usize| {
        let (x, y) = (i as f64 * 0.5, j as f64 * 0.5);
        Point::new([x, y, height(x, y)])
    };
    let mut faces = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let (a, b, c, d) = (vertex(i, j), vertex(i + 1, j), vertex(i, j + 1), vertex(i + 1, j + 1));
            faces.push(Triangle::new(a, b, d));
            faces.push(Triangle::new(a, d, c));
        }
    }

    let mut grid = DedupHashGrid::from_values(faces.clone(), Resolution::CellSize(1.0));
    println!("{} faces, {} non-empty cells", grid.len(), grid.non_empty_cells().count());

    // Inserting an existing face is refused
    assert!(!grid.insert(faces[0]));

    let probe = Point::new([3.1, 4.2, 2.0]);
    let (slot, distance) = grid.k_nearest_slots(&probe, 1)[0];
    println!("closest face to {:?}: slot {slot} at {distance:.4}", probe.coords());
    if let Some(face) = grid.get(slot) {
        println!("  vertices {:?}", face.vertices().map(|v| v.0));
    }

    // Reuse one set of marks across several probes
    let mut marks = VisitMarks::new();
    for r in [0.5, 1.0, 2.0] {
        let touching = grid.values_in_sphere_with(&Sphere::new(Point::new([6.0, 6.0, 0.0]), r), &mut marks);
        println!("faces near the center within {r}: {}", touching.len());
    }

    let removed = grid.erase_in_sphere(&Sphere::new(Point::new([6.0, 6.0, 0.0]), 1.0));
    println!("cut {removed} faces; {} left", grid.len());
    assert_eq!(grid.len(), faces.len() - removed);
}
