// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Inter-point distance statistics, indexed and brute-force

use super::SpatialIndex;
use crate::error::{GeometryError, Result};
use crate::geometry::Point;
use rayon::prelude::*;
use tracing::warn;

/// Neighbour count used when callers do not choose one
pub const DEFAULT_NEIGHBORS: usize = 6;

fn require_pairs(points: &[Point], operation: &'static str) -> Result<()> {
    match points.len() {
        0 => Err(GeometryError::EmptyPointSet { operation }),
        1 => Err(GeometryError::NotEnoughPoints {
            operation,
            required: 2,
            actual: 1,
        }),
        _ => Ok(()),
    }
}

/// Smallest distance between two distinct points of the set
pub fn min_distance(points: &[Point]) -> Result<f32> {
    require_pairs(points, "min_distance")?;

    let index = SpatialIndex::build(points);
    let nearest: Vec<f32> = points
        .par_iter()
        .enumerate()
        .filter_map(|(i, p)| index.nearest_others(i, p, 1).first().map(|&(_, d)| d))
        .collect();

    Ok(nearest.into_iter().fold(f32::INFINITY, f32::min))
}

/// Average over all points of the arithmetic mean distance to their `k` nearest other points.
///
/// When the set has `k` or fewer other points, every other point is used.
pub fn nearest_neighbor_mean_distance(points: &[Point], k: usize) -> Result<f32> {
    require_pairs(points, "nearest_neighbor_mean_distance")?;
    if k == 0 {
        return Err(GeometryError::InvalidArgument {
            operation: "nearest_neighbor_mean_distance",
            reason: "neighbour count must be at least 1".to_string(),
        });
    }

    let index = SpatialIndex::build(points);
    let per_point: Vec<f64> = points
        .par_iter()
        .enumerate()
        .map(|(i, p)| {
            let neighbors = index.nearest_others(i, p, k);
            let sum: f64 = neighbors.iter().map(|&(_, d)| d as f64).sum();
            sum / neighbors.len().max(1) as f64
        })
        .collect();

    // Sequential sum keeps the result independent of the thread count
    let total: f64 = per_point.iter().sum();
    Ok((total / points.len() as f64) as f32)
}

fn warn_brute_force(operation: &'static str, points: usize) {
    warn!(
        operation,
        points, "brute-force O(n^2) distance computation, not recommended for large inputs"
    );
}

fn pairwise_distances(points: &[Point]) -> impl Iterator<Item = f32> + '_ {
    points.iter().enumerate().flat_map(move |(i, a)| {
        points[i + 1..]
            .iter()
            .map(move |b| nalgebra::distance(a, b))
    })
}

/// Reference implementation of [`min_distance`] by exhaustive comparison
pub fn min_distance_brute_force(points: &[Point]) -> Result<f32> {
    warn_brute_force("min_distance_brute_force", points.len());
    require_pairs(points, "min_distance_brute_force")?;
    Ok(pairwise_distances(points).fold(f32::INFINITY, f32::min))
}

/// Largest distance between any two points
pub fn max_distance_brute_force(points: &[Point]) -> Result<f32> {
    warn_brute_force("max_distance_brute_force", points.len());
    require_pairs(points, "max_distance_brute_force")?;
    Ok(pairwise_distances(points).fold(0.0, f32::max))
}

/// Mean distance over all unordered point pairs
pub fn mean_distance_brute_force(points: &[Point]) -> Result<f32> {
    warn_brute_force("mean_distance_brute_force", points.len());
    require_pairs(points, "mean_distance_brute_force")?;

    let (sum, count) = pairwise_distances(points)
        .fold((0.0f64, 0usize), |(sum, count), d| (sum + d as f64, count + 1));
    Ok((sum / count as f64) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(3.0, 0.0, 0.0),
            Point::new(7.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_min_distance() {
        assert_relative_eq!(min_distance(&line()).unwrap(), 1.0);
        assert_relative_eq!(min_distance_brute_force(&line()).unwrap(), 1.0);
    }

    #[test]
    fn test_max_and_mean_brute_force() {
        assert_relative_eq!(max_distance_brute_force(&line()).unwrap(), 7.0);
        // Pairs: 1 3 7 2 6 4
        assert_relative_eq!(mean_distance_brute_force(&line()).unwrap(), 23.0 / 6.0);
    }

    #[test]
    fn test_nearest_neighbor_mean() {
        // Nearest others: 1, 1, 2, 4
        assert_relative_eq!(nearest_neighbor_mean_distance(&line(), 1).unwrap(), 2.0);
        // Two nearest others: (1+3)/2, (1+2)/2, (2+3)/2, (4+6)/2
        assert_relative_eq!(nearest_neighbor_mean_distance(&line(), 2).unwrap(), 2.75);
    }

    #[test]
    fn test_k_larger_than_set_uses_all_others() {
        let points = vec![Point::origin(), Point::new(2.0, 0.0, 0.0)];
        assert_relative_eq!(nearest_neighbor_mean_distance(&points, 10).unwrap(), 2.0);
    }

    #[test]
    fn test_coincident_points() {
        let points = vec![Point::new(5.0, 5.0, 5.0); 4];
        assert_eq!(min_distance(&points).unwrap(), 0.0);
        assert_eq!(nearest_neighbor_mean_distance(&points, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            min_distance(&[]),
            Err(GeometryError::EmptyPointSet { .. })
        ));
        assert!(matches!(
            max_distance_brute_force(&[Point::origin()]),
            Err(GeometryError::NotEnoughPoints { required: 2, actual: 1, .. })
        ));
        assert!(matches!(
            nearest_neighbor_mean_distance(&line(), 0),
            Err(GeometryError::InvalidArgument { .. })
        ));
    }
}
