// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lattice_geom::{Point, Sphere};
use lattice_grid::{CellMap, HashGrid, Resolution};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rstar::RTree;

fn gen_points(n: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            [
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            ]
        })
        .collect()
}

fn bench_rstar_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_compare");
    for &n in &[10_000_usize, 100_000] {
        let raw = gen_points(n, 7);
        let points: Vec<Point<f64, 3>> = raw.iter().copied().map(Point::new).collect();
        let queries = gen_points(64, 8);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("lattice_build_n{n}"), |b| {
            b.iter_batched(
                || points.clone(),
                |pts| black_box(HashGrid::from_values(pts, Resolution::for_population(n))),
                BatchSize::LargeInput,
            );
        });
        group.bench_function(format!("rstar_bulk_load_n{n}"), |b| {
            b.iter_batched(
                || raw.clone(),
                |pts| black_box(RTree::bulk_load(pts)),
                BatchSize::LargeInput,
            );
        });

        let grid = HashGrid::from_values(points.clone(), Resolution::for_population(n));
        let tree = RTree::bulk_load(raw.clone());
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(format!("lattice_k_nearest_8_n{n}"), |b| {
            b.iter(|| {
                for q in &queries {
                    black_box(grid.k_nearest(&Point::new(*q), 8));
                }
            });
        });
        group.bench_function(format!("rstar_k_nearest_8_n{n}"), |b| {
            b.iter(|| {
                for q in &queries {
                    let hits: Vec<_> = tree.nearest_neighbor_iter(q).take(8).collect();
                    black_box(hits);
                }
            });
        });
        group.bench_function(format!("lattice_sphere_r3_n{n}"), |b| {
            b.iter(|| {
                for q in &queries {
                    black_box(grid.count_in_sphere(&Sphere::new(Point::new(*q), 3.0)));
                }
            });
        });
        group.bench_function(format!("rstar_within_r3_n{n}"), |b| {
            b.iter(|| {
                for q in &queries {
                    black_box(tree.locate_within_distance(*q, 9.0).count());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_compare);
criterion_main!(benches);
