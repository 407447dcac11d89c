// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lattice_geom::{Aabb, Point, Sphere};
use lattice_grid::{CellMap, DedupHashGrid, GridValue, HashGrid, Resolution};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn gen_points(n: usize, seed: u64) -> Vec<Point<f64, 3>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new([
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            ])
        })
        .collect()
}

fn gen_boxes(n: usize, seed: u64) -> Vec<Aabb<f64, 3>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let c = Point::new([
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            ]);
            Aabb::from_center_half_extents(c, Point::splat(rng.gen_range(0.1..2.0)))
        })
        .collect()
}

fn brute_k_nearest(points: &[Point<f64, 3>], p: &Point<f64, 3>, k: usize) -> Vec<f64> {
    let mut d: Vec<f64> = points.iter().filter_map(|v| v.distance_to(p)).collect();
    d.sort_by(|a, b| a.total_cmp(b));
    d.truncate(k);
    d
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");
    for &n in &[1_000_usize, 10_000, 100_000] {
        let points = gen_points(n, 1);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("hash_grid_points_n{n}"), |b| {
            b.iter_batched(
                || points.clone(),
                |pts| black_box(HashGrid::from_values(pts, Resolution::for_population(n))),
                BatchSize::LargeInput,
            );
        });
        group.bench_function(format!("dedup_grid_points_n{n}"), |b| {
            b.iter_batched(
                || points.clone(),
                |pts| black_box(DedupHashGrid::from_values(pts, Resolution::for_population(n))),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_k_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_nearest");
    for &n in &[1_000_usize, 10_000, 100_000] {
        let points = gen_points(n, 2);
        let queries = gen_points(64, 3);
        let grid = HashGrid::from_values(points.clone(), Resolution::for_population(n));
        let dedup = DedupHashGrid::from_values(points.clone(), Resolution::for_population(n));
        group.throughput(Throughput::Elements(queries.len() as u64));
        for &k in &[1_usize, 16] {
            group.bench_function(format!("hash_grid_n{n}_k{k}"), |b| {
                b.iter(|| {
                    for q in &queries {
                        black_box(grid.k_nearest(q, k));
                    }
                });
            });
            group.bench_function(format!("dedup_grid_n{n}_k{k}"), |b| {
                b.iter(|| {
                    for q in &queries {
                        black_box(dedup.k_nearest_slots(q, k));
                    }
                });
            });
            if n <= 10_000 {
                group.bench_function(format!("brute_force_n{n}_k{k}"), |b| {
                    b.iter(|| {
                        for q in &queries {
                            black_box(brute_k_nearest(&points, q, k));
                        }
                    });
                });
            }
        }
    }
    group.finish();
}

fn bench_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("values_in_sphere");
    let n = 20_000;
    let points = gen_points(n, 4);
    let boxes = gen_boxes(n, 5);
    let centers = gen_points(64, 6);
    let point_grid = HashGrid::from_values(points.clone(), Resolution::for_population(n));
    let box_grid = HashGrid::from_values(boxes.clone(), Resolution::CellSize(2.0));
    let box_dedup = DedupHashGrid::from_values(boxes.clone(), Resolution::CellSize(2.0));
    group.throughput(Throughput::Elements(centers.len() as u64));
    for &r in &[1.0_f64, 5.0] {
        group.bench_function(format!("points_r{r}"), |b| {
            b.iter(|| {
                for c in &centers {
                    black_box(point_grid.count_in_sphere(&Sphere::new(*c, r)));
                }
            });
        });
        group.bench_function(format!("brute_points_r{r}"), |b| {
            b.iter(|| {
                for c in &centers {
                    let s = Sphere::new(*c, r);
                    black_box(points.iter().filter(|p| p.in_sphere(&s)).count());
                }
            });
        });
        group.bench_function(format!("boxes_direct_r{r}"), |b| {
            b.iter(|| {
                for c in &centers {
                    black_box(box_grid.count_in_sphere(&Sphere::new(*c, r)));
                }
            });
        });
        group.bench_function(format!("boxes_dedup_r{r}"), |b| {
            let mut marks = lattice_grid::VisitMarks::new();
            b.iter(|| {
                for c in &centers {
                    black_box(box_dedup.values_in_sphere_with(&Sphere::new(*c, r), &mut marks).len());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_k_nearest, bench_sphere);
criterion_main!(benches);
