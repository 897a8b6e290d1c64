// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Spatial analytics summary of a geometry buffer

use super::stats::{min_distance, nearest_neighbor_mean_distance};
use crate::error::Result;
use crate::geometry::{bounding_sphere, GeometryBuffer};
use serde::{Deserialize, Serialize};

/// Counts, extents and spacing of a buffer's vertices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialReport {
    pub vertex_count: usize,
    pub polygon_count: usize,
    pub has_normals: bool,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f32; 6],
    pub sphere_center: [f32; 3],
    pub sphere_radius: f32,
    /// Smallest distance between two vertices, absent for fewer than two vertices
    pub min_distance: Option<f32>,
    /// Mean distance to the `neighbors` nearest vertices
    pub mean_neighbor_distance: Option<f32>,
    pub neighbors: usize,
}

/// Analyze the vertices of `buffer`; fails on an empty buffer
pub fn analyze(buffer: &GeometryBuffer, neighbors: usize) -> Result<SpatialReport> {
    let sphere = bounding_sphere(&buffer.vertices)?;
    let bbox = buffer.bounding_box();

    let (min_distance, mean_neighbor_distance) = if buffer.vertex_count() >= 2 {
        (
            Some(min_distance(&buffer.vertices)?),
            Some(nearest_neighbor_mean_distance(&buffer.vertices, neighbors)?),
        )
    } else {
        (None, None)
    };

    Ok(SpatialReport {
        vertex_count: buffer.vertex_count(),
        polygon_count: buffer.polygon_count(),
        has_normals: buffer.has_normals(),
        bbox: [
            bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z,
        ],
        sphere_center: [sphere.center.x, sphere.center.y, sphere.center.z],
        sphere_radius: sphere.radius,
        min_distance,
        mean_neighbor_distance,
        neighbors,
    })
}

impl SpatialReport {
    /// Pretty print the report
    pub fn print(&self) {
        let optional = |value: Option<f32>| match value {
            Some(v) => format!("{:>12.6}", v),
            None => format!("{:>12}", "n/a"),
        };

        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║              SPATIAL ANALYTICS                           ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!(
            "║ Vertices:        {:>10}                              ║",
            self.vertex_count
        );
        println!(
            "║ Polygons:        {:>10}                              ║",
            self.polygon_count
        );
        println!(
            "║ Normals:         {:>10}                              ║",
            if self.has_normals { "Yes" } else { "No" }
        );
        println!("║                                                          ║");
        println!("║ Bounding Box:                                            ║");
        println!(
            "║   Min: ({:>9.3}, {:>9.3}, {:>9.3})                  ║",
            self.bbox[0], self.bbox[1], self.bbox[2]
        );
        println!(
            "║   Max: ({:>9.3}, {:>9.3}, {:>9.3})                  ║",
            self.bbox[3], self.bbox[4], self.bbox[5]
        );
        println!("║ Bounding Sphere:                                         ║");
        println!(
            "║   Center: ({:>9.3}, {:>9.3}, {:>9.3})               ║",
            self.sphere_center[0], self.sphere_center[1], self.sphere_center[2]
        );
        println!(
            "║   Radius: {:>12.6}                                   ║",
            self.sphere_radius
        );
        println!("║                                                          ║");
        println!(
            "║ Min distance:    {}                            ║",
            optional(self.min_distance)
        );
        println!(
            "║ Mean {:>2}-NN:      {}                            ║",
            self.neighbors,
            optional(self.mean_neighbor_distance)
        );
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}
