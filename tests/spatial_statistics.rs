// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Indexed statistics against their brute-force references

use approx::assert_relative_eq;
use polyscan::{
    bounding_sphere, max_distance_brute_force, mean_distance_brute_force, min_distance,
    min_distance_brute_force, nearest_neighbor_mean_distance, GeometryError, Point, SpatialIndex,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(count: usize, scale: f32, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point::new(
                rng.gen_range(-scale..scale),
                rng.gen_range(-scale..scale),
                rng.gen_range(-scale..scale),
            )
        })
        .collect()
}

/// Exhaustive mean distance to the k nearest other points, averaged over all points
fn mean_knn_reference(points: &[Point], k: usize) -> f32 {
    let total: f64 = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut distances: Vec<f32> = points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, q)| nalgebra::distance(p, q))
                .collect();
            distances.sort_by(f32::total_cmp);
            let nearest = &distances[..k.min(distances.len())];
            nearest.iter().map(|&d| d as f64).sum::<f64>() / nearest.len() as f64
        })
        .sum();
    (total / points.len() as f64) as f32
}

#[test]
fn test_min_distance_matches_brute_force() {
    for (count, seed) in [(2, 1), (3, 2), (17, 3), (64, 4), (200, 5)] {
        let points = random_points(count, 10.0, seed);
        let indexed = min_distance(&points).unwrap();
        let brute = min_distance_brute_force(&points).unwrap();
        assert_relative_eq!(indexed, brute, max_relative = 1e-5);
    }
}

#[test]
fn test_nearest_neighbor_mean_matches_reference() {
    let points = random_points(150, 1.0, 42);
    for k in [1, 2, 6, 20] {
        let indexed = nearest_neighbor_mean_distance(&points, k).unwrap();
        assert_relative_eq!(indexed, mean_knn_reference(&points, k), max_relative = 1e-4);
    }
}

#[test]
fn test_flat_and_duplicate_points() {
    // Every point on the z = 0 plane, with each position duplicated once
    let mut points = Vec::new();
    for x in 0..10 {
        for y in 0..10 {
            let p = Point::new(x as f32, y as f32, 0.0);
            points.push(p);
            points.push(p);
        }
    }
    assert_eq!(min_distance(&points).unwrap(), 0.0);
    assert_eq!(min_distance_brute_force(&points).unwrap(), 0.0);
    assert_relative_eq!(nearest_neighbor_mean_distance(&points, 1).unwrap(), 0.0);
}

#[test]
fn test_brute_force_extremes() {
    let points = vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(3.0, 4.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
    ];
    assert_relative_eq!(min_distance_brute_force(&points).unwrap(), 1.0);
    assert_relative_eq!(max_distance_brute_force(&points).unwrap(), 26f32.sqrt());
    assert_relative_eq!(
        mean_distance_brute_force(&points).unwrap(),
        (5.0 + 1.0 + 26f32.sqrt()) / 3.0
    );
}

#[test]
fn test_empty_inputs_are_reported() {
    assert!(matches!(min_distance(&[]), Err(GeometryError::EmptyPointSet { .. })));
    assert!(matches!(
        nearest_neighbor_mean_distance(&[], 6),
        Err(GeometryError::EmptyPointSet { .. })
    ));
    assert!(matches!(
        mean_distance_brute_force(&[Point::origin()]),
        Err(GeometryError::NotEnoughPoints { .. })
    ));
    assert!(matches!(bounding_sphere(&[]), Err(GeometryError::EmptyPointSet { .. })));
}

#[test]
fn test_bounding_sphere_contains_all_points() {
    for seed in 0..20 {
        let mut points = random_points(50 + seed as usize * 10, 5.0, seed);
        // Stretch some sets to exercise the corrective pass
        if seed % 2 == 0 {
            for p in points.iter_mut().step_by(7) {
                p.x *= 8.0;
            }
        }

        let sphere = bounding_sphere(&points).unwrap();
        let epsilon = 1e-4 * sphere.radius.max(1.0);
        for p in &points {
            assert!(
                sphere.contains(p, epsilon),
                "seed {}: {:?} outside sphere {:?}",
                seed,
                p,
                sphere
            );
        }
    }
}

#[test]
fn test_index_nearest_against_linear_scan() {
    let points = random_points(300, 3.0, 99);
    let index = SpatialIndex::build(&points);
    let queries = random_points(20, 3.0, 100);

    for q in &queries {
        let hits = index.nearest(q, 5);
        assert_eq!(hits.len(), 5);
        assert!(hits.windows(2).all(|w| w[0].1 <= w[1].1));

        let closest = points
            .iter()
            .map(|p| nalgebra::distance(p, q))
            .fold(f32::INFINITY, f32::min);
        assert_relative_eq!(hits[0].1, closest, max_relative = 1e-5);
    }
}
