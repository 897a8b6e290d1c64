// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Convex hull extraction using parry3d

use super::{GeometryBuffer, HalfEdgeMesh, Point};
use crate::error::{GeometryError, Result};
use parry3d::transformation::try_convex_hull;
use tracing::debug;

/// Hulls enclosing less volume than this fraction of the cube on their bbox diagonal are flat
const FLAT_HULL_TOLERANCE: f32 = 1e-7;

/// Compute the convex hull of a point set as a triangle-only buffer.
///
/// Needs at least four points. The result is rejected when the hull is not at least a
/// tetrahedron or encloses no volume.
pub fn convex_hull(points: &[Point]) -> Result<GeometryBuffer> {
    if points.len() < 4 {
        return Err(GeometryError::NotEnoughPoints {
            operation: "convex_hull",
            required: 4,
            actual: points.len(),
        });
    }

    let (hull_vertices, hull_triangles) = try_convex_hull(points)
        .map_err(|e| GeometryError::DegenerateHull(format!("{:?}", e)))?;

    if hull_vertices.len() < 4 {
        return Err(GeometryError::DegenerateHull(format!(
            "hull has {} vertices, a tetrahedron needs 4",
            hull_vertices.len()
        )));
    }

    let buffer = GeometryBuffer {
        vertices: hull_vertices,
        polygon_indices: hull_triangles.iter().map(|t| t.to_vec()).collect(),
        normals: Vec::new(),
    };
    buffer.validate()?;

    let volume = enclosed_volume(&buffer);
    let diagonal = buffer.bounding_box().diagonal();
    if volume <= FLAT_HULL_TOLERANCE * diagonal.powi(3) {
        return Err(GeometryError::DegenerateHull(format!(
            "hull encloses no volume ({})",
            volume
        )));
    }

    debug!(
        vertices = buffer.vertex_count(),
        triangles = buffer.polygon_count(),
        "convex hull built"
    );
    Ok(buffer)
}

/// Convex hull as a half-edge mesh
pub fn convex_hull_surface_mesh(points: &[Point]) -> Result<HalfEdgeMesh> {
    HalfEdgeMesh::from_buffer(&convex_hull(points)?)
}

/// Absolute volume of a closed triangle surface
fn enclosed_volume(buffer: &GeometryBuffer) -> f32 {
    let signed: f32 = buffer
        .polygon_indices
        .iter()
        .map(|t| {
            let a = buffer.vertices[t[0] as usize].coords;
            let b = buffer.vertices[t[1] as usize].coords;
            let c = buffer.vertices[t[2] as usize].coords;
            a.dot(&b.cross(&c)) / 6.0
        })
        .sum();
    signed.abs()
}
