// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point cloud queries.
//!
//! Hash a random point cloud into a grid, then run sphere and k-nearest
//! queries and check them against a linear scan.
//!
//! Run:
//! - `cargo run -p lattice_demos --example point_cloud`

use lattice_geom::{Point, Sphere};
use lattice_grid::{CellMap, GridValue, HashGrid, Resolution};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn main() {
    let mut rng = ChaCha8Rng::seed_from_u64(2025);
    let cloud: Vec<Point<f64, 3>> = (0..5_000)
        .map(|_| {
            Point::new([
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-0.1..0.1),
            ])
        })
        .collect();

    let grid = HashGrid::from_values(cloud.clone(), Resolution::for_population(cloud.len()));
    println!(
        "{} points in {:?} cells over {:?}",
        grid.len(),
        grid.geometry().counts(),
        grid.geometry().bounds()
    );

    // Everything within 0.1 of the origin
    let ball = Sphere::new(Point::origin(), 0.1);
    let hits = grid.values_in_sphere(&ball);
    let expected = cloud.iter().filter(|p| p.in_sphere(&ball)).count();
    println!("sphere query: {} hits", hits.len());
    assert_eq!(hits.len(), expected, "sphere query should match a scan");

    // The five nearest points to a corner
    let corner = Point::new([1.0, 1.0, 0.0]);
    for (rank, n) in grid.k_nearest(&corner, 5).iter().enumerate() {
        println!("#{rank}: {:?} at {:.4}", n.value.coords(), n.distance);
    }

    // Bounded search finds nothing far outside the cloud
    let far = Point::new([5.0, 5.0, 5.0]);
    assert!(grid.nearest_within(&far, 1.0).is_none());
}
