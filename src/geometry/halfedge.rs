// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Half-edge polygon mesh and conversions to and from [`GeometryBuffer`]
//! This provides the connectivity needed by downstream surface processing

use super::{GeometryBuffer, Normal, Point};
use crate::error::{GeometryError, Result};
use std::collections::HashMap;
use tracing::warn;

/// Half-edge in a half-edge mesh
/// Each interior edge has two half-edges, one for each direction
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// Next half-edge in the same face
    pub next: usize,
    /// Previous half-edge in the same face
    pub prev: usize,
    /// Twin half-edge (opposite direction, belongs to adjacent face)
    pub twin: Option<usize>,
    /// Vertex this half-edge points to
    pub vertex: usize,
    /// Face this half-edge belongs to
    pub face: usize,
}

/// Undirected edge connecting two vertices
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// First half-edge seen for this edge
    pub half_edge_a: usize,
    /// Opposite half-edge, absent on a boundary
    pub half_edge_b: Option<usize>,
}

/// Polygon mesh with full half-edge connectivity
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    /// Vertex positions
    pub vertices: Vec<Point>,
    /// Optional per-vertex normals
    pub normals: Option<Vec<Normal>>,
    /// One half-edge of each face
    pub faces: Vec<usize>,
    /// Half-edges
    pub half_edges: Vec<HalfEdge>,
    /// Unique undirected edges
    pub edges: Vec<Edge>,
    edge_lookup: HashMap<(usize, usize), usize>,
}

impl HalfEdgeMesh {
    /// Create an empty half-edge mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a resolved buffer into a half-edge mesh.
    ///
    /// Polygons with fewer than three corners carry no surface and are skipped.
    pub fn from_buffer(buffer: &GeometryBuffer) -> Result<Self> {
        buffer.validate()?;

        let mut mesh = Self::new();
        mesh.vertices = buffer.vertices.clone();
        if buffer.has_normals() {
            mesh.normals = Some(buffer.normals.clone());
        }

        let corner_count = buffer.index_count();
        mesh.half_edges.reserve(corner_count);
        mesh.faces.reserve(buffer.polygon_count());

        let mut skipped = 0usize;
        for polygon in &buffer.polygon_indices {
            if polygon.len() < 3 {
                skipped += 1;
                continue;
            }
            mesh.add_face(polygon);
        }

        if skipped > 0 {
            warn!(skipped, "polygons with fewer than 3 vertices were not converted");
        }

        Ok(mesh)
    }

    /// Build a mesh from an indexed triangle soup such as an isosurface extraction result
    pub fn from_triangles(
        positions: &[Point],
        normals: &[Normal],
        triangles: &[[u32; 3]],
    ) -> Result<Self> {
        let buffer = GeometryBuffer {
            vertices: positions.to_vec(),
            polygon_indices: triangles.iter().map(|t| t.to_vec()).collect(),
            normals: normals.to_vec(),
        };
        Self::from_buffer(&buffer)
    }

    /// Convert back to the interchange buffer
    pub fn to_buffer(&self) -> GeometryBuffer {
        GeometryBuffer {
            vertices: self.vertices.clone(),
            polygon_indices: (0..self.faces.len())
                .map(|face| {
                    self.face_vertices(face)
                        .into_iter()
                        .map(|v| v as u32)
                        .collect()
                })
                .collect(),
            normals: self.normals.clone().unwrap_or_default(),
        }
    }

    /// Vertex ids of a face, in winding order
    pub fn face_vertices(&self, face: usize) -> Vec<usize> {
        let start = self.faces[face];
        let mut result = Vec::new();
        let mut he = start;
        loop {
            result.push(self.half_edges[self.half_edges[he].prev].vertex);
            he = self.half_edges[he].next;
            if he == start {
                break;
            }
        }
        result
    }

    fn add_face(&mut self, polygon: &[u32]) {
        let face = self.faces.len();
        let first = self.half_edges.len();
        let n = polygon.len();

        // Half-edge k runs from corner k to corner k + 1
        for k in 0..n {
            self.half_edges.push(HalfEdge {
                next: first + (k + 1) % n,
                prev: first + (k + n - 1) % n,
                twin: None,
                vertex: polygon[(k + 1) % n] as usize,
                face,
            });
        }
        self.faces.push(first);

        for k in 0..n {
            self.link_edge(first + k, polygon[k] as usize, polygon[(k + 1) % n] as usize);
        }
    }

    /// Register a half-edge under its undirected edge and connect twins
    fn link_edge(&mut self, he: usize, from: usize, to: usize) {
        let key = if from < to { (from, to) } else { (to, from) };

        match self.edge_lookup.get(&key).copied() {
            Some(edge_idx) => {
                let edge = &mut self.edges[edge_idx];
                // A third face on the same edge is non-manifold; it stays unpaired
                if edge.half_edge_b.is_none() {
                    edge.half_edge_b = Some(he);
                    let other = edge.half_edge_a;
                    self.half_edges[he].twin = Some(other);
                    self.half_edges[other].twin = Some(he);
                }
            }
            None => {
                self.edge_lookup.insert(key, self.edges.len());
                self.edges.push(Edge {
                    half_edge_a: he,
                    half_edge_b: None,
                });
            }
        }
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Point] {
        &self.vertices
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get face count
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl TryFrom<&GeometryBuffer> for HalfEdgeMesh {
    type Error = GeometryError;

    fn try_from(buffer: &GeometryBuffer) -> Result<Self> {
        Self::from_buffer(buffer)
    }
}

impl From<&HalfEdgeMesh> for GeometryBuffer {
    fn from(mesh: &HalfEdgeMesh) -> Self {
        mesh.to_buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> GeometryBuffer {
        GeometryBuffer {
            vertices: vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
                Point::new(0.0, 0.0, 1.0),
            ],
            polygon_indices: vec![
                vec![0, 2, 1],
                vec![0, 1, 3],
                vec![1, 2, 3],
                vec![0, 3, 2],
            ],
            normals: Vec::new(),
        }
    }

    #[test]
    fn test_halfedge_from_buffer() {
        let mesh = HalfEdgeMesh::from_buffer(&tetrahedron()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.edge_count(), 6);
        assert!(mesh.half_edges.iter().all(|he| he.twin.is_some()));
    }

    #[test]
    fn test_halfedge_roundtrip_preserves_polygons() {
        let mut buffer = tetrahedron();
        buffer.vertices.push(Point::new(1.0, 1.0, 0.0));
        buffer.polygon_indices.push(vec![1, 4, 2, 0]);
        buffer.normals = vec![Normal::z(); 5];

        let mesh = HalfEdgeMesh::try_from(&buffer).unwrap();
        let converted = GeometryBuffer::from(&mesh);

        assert_eq!(converted, buffer);
    }

    #[test]
    fn test_halfedge_skips_degenerate_polygons() {
        let mut buffer = tetrahedron();
        buffer.polygon_indices.push(vec![0, 1]);

        let mesh = HalfEdgeMesh::from_buffer(&buffer).unwrap();
        assert_eq!(mesh.face_count(), 4);
    }

    #[test]
    fn test_halfedge_rejects_unresolved_indices() {
        let mut buffer = tetrahedron();
        buffer.polygon_indices.push(vec![0, 1, 9]);

        assert!(HalfEdgeMesh::from_buffer(&buffer).is_err());
    }

    #[test]
    fn test_halfedge_from_triangles() {
        let buffer = tetrahedron();
        let triangles: Vec<[u32; 3]> = buffer
            .polygon_indices
            .iter()
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        let normals = vec![Normal::x(); 4];

        let mesh = HalfEdgeMesh::from_triangles(&buffer.vertices, &normals, &triangles).unwrap();
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.normals.as_ref().map(Vec::len), Some(4));
    }
}
