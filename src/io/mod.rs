// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - chunked importing and exporting

mod chunk;
mod exporter;
mod format;
mod importer;
mod mapped;
mod obj;
mod ply;
mod scan;

pub use chunk::{align_to_line_start, plan_chunks, Chunk};
pub use exporter::{
    export, export_obj, export_points_ply, export_polylines_obj, export_sampled_points_ply,
    export_vtk, write_obj, write_points_ply, write_polylines_obj, write_vtk,
};
pub use format::FileFormat;
pub use importer::{
    import_mesh, import_mesh_with_provenance, import_point_cloud, import_point_cloud_simple,
    ImportCoordinator, MeshImport,
};
pub use mapped::MappedFile;
pub use obj::{parse_obj_chunk, FaceIndex, ObjChunk};
pub use ply::{parse_point_chunk, read_ply_header, PlyHeader, PointChunk};
