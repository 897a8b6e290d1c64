// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! OBJ, legacy VTK and ASCII PLY writers

use super::FileFormat;
use crate::error::{GeometryError, Result};
use crate::geometry::{GeometryBuffer, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Export `buffer` in the format named by the extension of `path`.
///
/// `.obj` writes the full mesh, `.vtk` legacy polydata and `.ply` the vertices as a point cloud.
pub fn export(buffer: &GeometryBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match FileFormat::from_path(path) {
        Some(FileFormat::Obj) => export_obj(buffer, path),
        Some(FileFormat::Vtk) => export_vtk(buffer, path),
        Some(FileFormat::Ply) => export_points_ply(&buffer.vertices, path),
        None => Err(GeometryError::InvalidArgument {
            operation: "export",
            reason: format!("{} has no supported extension (obj, vtk, ply)", path.display()),
        }),
    }
}

/// Write `buffer` as Wavefront OBJ: all `v` lines, then `vn` lines, then 1-based `f` lines
pub fn export_obj(buffer: &GeometryBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    FileFormat::Obj.check_path(path)?;
    buffer.validate()?;
    write_file(path, |out| write_obj(buffer, out))?;
    info!(
        path = %path.display(),
        vertices = buffer.vertex_count(),
        polygons = buffer.polygon_count(),
        "exported OBJ mesh"
    );
    Ok(())
}

pub fn write_obj<W: Write>(buffer: &GeometryBuffer, out: &mut W) -> io::Result<()> {
    for v in &buffer.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for n in &buffer.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for polygon in &buffer.polygon_indices {
        out.write_all(b"f")?;
        for &index in polygon {
            write!(out, " {}", index as u64 + 1)?;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Write `buffer` as ASCII legacy VTK polydata with 0-based polygon indices
pub fn export_vtk(buffer: &GeometryBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    FileFormat::Vtk.check_path(path)?;
    buffer.validate()?;
    write_file(path, |out| write_vtk(buffer, out))?;
    info!(
        path = %path.display(),
        vertices = buffer.vertex_count(),
        polygons = buffer.polygon_count(),
        "exported VTK polydata"
    );
    Ok(())
}

pub fn write_vtk<W: Write>(buffer: &GeometryBuffer, out: &mut W) -> io::Result<()> {
    out.write_all(b"# vtk DataFile Version 3.0\n")?;
    out.write_all(b"VTK output from mesh data\n")?;
    out.write_all(b"ASCII\n")?;
    out.write_all(b"DATASET POLYDATA\n")?;

    writeln!(out, "POINTS {} float", buffer.vertex_count())?;
    for v in &buffer.vertices {
        writeln!(out, "{} {} {}", v.x, v.y, v.z)?;
    }

    // Each polygon row also carries its vertex count
    let total: usize = buffer.polygon_indices.iter().map(|p| p.len() + 1).sum();
    writeln!(out, "POLYGONS {} {}", buffer.polygon_count(), total)?;
    for polygon in &buffer.polygon_indices {
        write!(out, "{}", polygon.len())?;
        for &index in polygon {
            write!(out, " {}", index)?;
        }
        out.write_all(b"\n")?;
    }

    if buffer.has_normals() {
        writeln!(out, "POINT_DATA {}", buffer.normals.len())?;
        out.write_all(b"NORMALS normals float\n")?;
        for n in &buffer.normals {
            writeln!(out, "{} {} {}", n.x, n.y, n.z)?;
        }
    }
    Ok(())
}

/// Write `points` as an ASCII PLY point cloud
pub fn export_points_ply(points: &[Point], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    FileFormat::Ply.check_path(path)?;
    if points.is_empty() {
        return Err(GeometryError::EmptyPointSet {
            operation: "export_points_ply",
        });
    }
    write_file(path, |out| write_points_ply(points.iter(), points.len(), out))?;
    info!(path = %path.display(), points = points.len(), "exported PLY point cloud");
    Ok(())
}

/// Write `count` vertices of `buffer`, drawn uniformly with replacement, as a PLY point cloud.
/// A `seed` makes the draw reproducible.
pub fn export_sampled_points_ply(
    buffer: &GeometryBuffer,
    count: usize,
    path: impl AsRef<Path>,
    seed: Option<u64>,
) -> Result<()> {
    let path = path.as_ref();
    FileFormat::Ply.check_path(path)?;
    if buffer.vertices.is_empty() {
        return Err(GeometryError::EmptyPointSet {
            operation: "export_sampled_points_ply",
        });
    }
    if count == 0 {
        return Err(GeometryError::InvalidArgument {
            operation: "export_sampled_points_ply",
            reason: "sample count must be at least 1".to_string(),
        });
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let vertex_count = buffer.vertex_count();
    let indices: Vec<usize> = (0..count)
        .map(|_| rng.gen_range(0..vertex_count))
        .collect();
    debug!(count, vertex_count, ?seed, "sampled vertex indices");

    let samples = indices.iter().map(|&i| &buffer.vertices[i]);
    write_file(path, |out| write_points_ply(samples, count, out))?;
    info!(path = %path.display(), points = count, "exported sampled PLY point cloud");
    Ok(())
}

pub fn write_points_ply<'a, W, I>(points: I, count: usize, out: &mut W) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Point>,
{
    out.write_all(b"ply\n")?;
    out.write_all(b"format ascii 1.0\n")?;
    writeln!(out, "element vertex {}", count)?;
    out.write_all(b"property float x\n")?;
    out.write_all(b"property float y\n")?;
    out.write_all(b"property float z\n")?;
    out.write_all(b"end_header\n")?;
    for p in points {
        writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
    }
    Ok(())
}

/// Write polylines as OBJ `v` and `l` records
pub fn export_polylines_obj(polylines: &[Vec<Point>], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    FileFormat::Obj.check_path(path)?;
    write_file(path, |out| write_polylines_obj(polylines, out))?;
    info!(path = %path.display(), polylines = polylines.len(), "exported OBJ polylines");
    Ok(())
}

/// Every polyline's points are written; segments are emitted only for polylines with at
/// least two points, and the index offset always advances by the full polyline length.
pub fn write_polylines_obj<W: Write>(polylines: &[Vec<Point>], out: &mut W) -> io::Result<()> {
    for p in polylines.iter().flatten() {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }

    let mut offset = 1usize;
    for polyline in polylines {
        for i in 1..polyline.len() {
            writeln!(out, "l {} {}", offset + i - 1, offset + i)?;
        }
        offset += polyline.len();
    }
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path).map_err(|e| GeometryError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| GeometryError::io(path, e))
}
