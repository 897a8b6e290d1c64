// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine-agnostic polygon/point buffer used as the interchange format

use super::BoundingBox;
use crate::error::{GeometryError, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// 3-D position with 32-bit float precision
pub type Point = Point3<f32>;

/// Per-vertex normal
pub type Normal = Vector3<f32>;

/// Vertices, optional per-vertex normals and variable-length polygon index lists.
///
/// A buffer returned by an importer, the hull builder or a mesh conversion is
/// resolved: every polygon index is `< vertices.len()` and `normals` is either empty
/// or exactly as long as `vertices`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryBuffer {
    pub vertices: Vec<Point>,
    pub polygon_indices: Vec<Vec<u32>>,
    pub normals: Vec<Normal>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, polygon_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            polygon_indices: Vec::with_capacity(polygon_count),
            normals: Vec::new(),
        }
    }

    /// Point set without connectivity
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            vertices: points,
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygon_indices.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Positions viewed as a point set
    pub fn points(&self) -> &[Point] {
        &self.vertices
    }

    /// Total number of polygon corners across all polygons
    pub fn index_count(&self) -> usize {
        self.polygon_indices.iter().map(Vec::len).sum()
    }

    /// Whether every polygon is a triangle
    pub fn is_triangulated(&self) -> bool {
        self.polygon_indices.iter().all(|polygon| polygon.len() == 3)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Check the normals-length and index-range invariants
    pub fn validate(&self) -> Result<()> {
        if !self.normals.is_empty() && self.normals.len() != self.vertices.len() {
            return Err(GeometryError::NormalCountMismatch {
                normals: self.normals.len(),
                vertices: self.vertices.len(),
            });
        }

        let vertex_count = self.vertices.len();
        for (polygon, indices) in self.polygon_indices.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeometryError::IndexOutOfRange {
                    polygon,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }
}
