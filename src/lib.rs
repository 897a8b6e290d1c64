// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyscan
//!
//! Parallel ingestion of Wavefront OBJ meshes and ASCII PLY point clouds into a plain
//! geometry buffer, plus spatial analysis over the result: nearest-neighbour distance
//! statistics, bounding spheres and convex hulls.
//!
//! ```no_run
//! # fn main() -> polyscan::Result<()> {
//! let mesh = polyscan::import_mesh("scan.obj", true)?;
//! let spacing = polyscan::min_distance(&mesh.vertices)?;
//! let hull = polyscan::convex_hull(&mesh.vertices)?;
//! polyscan::export(&hull, "hull.obj")?;
//! # let _ = spacing;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod spatial;

pub use config::ScanConfig;
pub use error::{GeometryError, Result};
pub use geometry::{
    bounding_sphere, convex_hull, convex_hull_surface_mesh, mesh_bounding_sphere, BoundingBox,
    BoundingSphere, GeometryBuffer, HalfEdgeMesh, Normal, Point,
};
pub use io::{
    export, export_obj, export_points_ply, export_polylines_obj, export_sampled_points_ply,
    export_vtk, import_mesh, import_mesh_with_provenance, import_point_cloud,
    import_point_cloud_simple, FileFormat, ImportCoordinator,
};
pub use spatial::{
    analyze, max_distance_brute_force, mean_distance_brute_force, min_distance,
    min_distance_brute_force, nearest_neighbor_mean_distance, SpatialIndex, SpatialReport,
};

/// Import an `.obj` mesh and summarise its vertices
pub fn analyze_file(path: impl AsRef<std::path::Path>, config: &ScanConfig) -> Result<SpatialReport> {
    let buffer = config.coordinator().import_mesh(path)?;
    analyze(&buffer, config.neighbors)
}
