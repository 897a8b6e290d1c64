// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Approximate bounding sphere by incremental refinement

use super::{HalfEdgeMesh, Point};
use crate::error::{GeometryError, Result};
use serde::{Deserialize, Serialize};

/// Sphere containing every point it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Point,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies inside the sphere grown by `epsilon`
    pub fn contains(&self, point: &Point, epsilon: f32) -> bool {
        nalgebra::distance(&self.center, point) <= self.radius + epsilon
    }
}

/// Compute an enclosing sphere for a point set.
///
/// Starts from the first point, spans the sphere between it and the farthest point,
/// then makes one corrective pass that grows the sphere toward every point still
/// outside. The result always encloses the input but is not the minimal sphere.
pub fn bounding_sphere(points: &[Point]) -> Result<BoundingSphere> {
    let start = *points.first().ok_or(GeometryError::EmptyPointSet {
        operation: "bounding_sphere",
    })?;

    let farthest = points
        .iter()
        .copied()
        .max_by(|a, b| {
            nalgebra::distance_squared(&start, a).total_cmp(&nalgebra::distance_squared(&start, b))
        })
        .unwrap_or(start);

    let mut center = nalgebra::center(&start, &farthest);
    let mut radius = nalgebra::distance(&start, &farthest) * 0.5;

    for point in points {
        let offset = point - center;
        let dist = offset.norm();
        if dist <= radius {
            continue;
        }

        let new_radius = (radius + dist) * 0.5;
        center += offset * ((new_radius - radius) / dist);
        radius = new_radius;
    }

    Ok(BoundingSphere { center, radius })
}

/// Bounding sphere of a mesh's vertex positions
pub fn mesh_bounding_sphere(mesh: &HalfEdgeMesh) -> Result<BoundingSphere> {
    if mesh.is_empty() {
        return Err(GeometryError::EmptyPointSet {
            operation: "mesh_bounding_sphere",
        });
    }
    bounding_sphere(mesh.positions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(
            bounding_sphere(&[]),
            Err(GeometryError::EmptyPointSet { .. })
        ));
        assert!(mesh_bounding_sphere(&HalfEdgeMesh::new()).is_err());
    }

    #[test]
    fn test_single_point() {
        let sphere = bounding_sphere(&[Point::new(1.0, 2.0, 3.0)]).unwrap();
        assert_eq!(sphere.center, Point::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.radius, 0.0);
    }

    #[test]
    fn test_two_points_span_the_diameter() {
        let sphere =
            bounding_sphere(&[Point::new(-2.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0)]).unwrap();
        assert_relative_eq!(sphere.radius, 2.0);
        assert_relative_eq!(sphere.center.x, 0.0);
    }

    #[test]
    fn test_corrective_pass_grows_sphere() {
        let points = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(1.0, 3.0, 0.0),
            Point::new(1.0, -1.0, 2.5),
        ];
        let sphere = bounding_sphere(&points).unwrap();
        for point in &points {
            assert!(sphere.contains(point, 1e-4), "{:?} outside {:?}", point, sphere);
        }
    }
}
