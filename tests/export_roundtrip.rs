// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Round-trip export/import tests

use anyhow::Result;
use approx::assert_relative_eq;
use polyscan::{
    export, export_obj, export_points_ply, export_polylines_obj, export_sampled_points_ply,
    export_vtk, import_mesh, import_point_cloud, GeometryBuffer, GeometryError, Normal, Point,
};
use tempfile::tempdir;

fn cube() -> GeometryBuffer {
    let vertices = vec![
        Point::new(-0.5, -0.5, -0.5),
        Point::new(0.5, -0.5, -0.5),
        Point::new(0.5, 0.5, -0.5),
        Point::new(-0.5, 0.5, -0.5),
        Point::new(-0.5, -0.5, 0.5),
        Point::new(0.5, -0.5, 0.5),
        Point::new(0.5, 0.5, 0.5),
        Point::new(-0.5, 0.5, 0.5),
    ];
    let normals = vertices.iter().map(|p| p.coords.normalize()).collect();
    GeometryBuffer {
        vertices,
        polygon_indices: vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ],
        normals,
    }
}

#[test]
fn test_obj_roundtrip() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cube.obj");
    let original = cube();

    export_obj(&original, &path)?;
    let imported = import_mesh(&path, true)?;

    assert_eq!(imported.polygon_indices, original.polygon_indices);
    assert_eq!(imported.vertex_count(), original.vertex_count());
    for (a, b) in imported.vertices.iter().zip(&original.vertices) {
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }
    for (a, b) in imported.normals.iter().zip(&original.normals) {
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_obj_roundtrip_irrational_coordinates() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fan.obj");
    let vertices: Vec<Point> = (0..64)
        .map(|i| {
            let angle = i as f32 * 0.1;
            Point::new(angle.cos() / 3.0, angle.sin() * 1e4, -angle * 1e-5)
        })
        .collect();
    let polygon_indices = (1..63u32).map(|i| vec![0, i, i + 1]).collect();
    let original = GeometryBuffer {
        vertices,
        polygon_indices,
        normals: Vec::new(),
    };

    export(&original, &path)?;
    let imported = import_mesh(&path, true)?;
    assert_eq!(imported, original);
    Ok(())
}

#[test]
fn test_point_cloud_roundtrip() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cloud.ply");
    let original = cube();

    export(&original, &path)?;
    let points = import_point_cloud(&path, true)?;
    assert_eq!(points, original.vertices);

    export_points_ply(&points[..3], &path)?;
    assert_eq!(import_point_cloud(&path, false)?.len(), 3);
    Ok(())
}

#[test]
fn test_sampled_points_come_from_the_mesh() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("sample.PLY");
    let original = cube();

    export_sampled_points_ply(&original, 50, &path, Some(1234))?;
    let samples = import_point_cloud(&path, true)?;
    assert_eq!(samples.len(), 50);
    assert!(samples.iter().all(|p| original.vertices.contains(p)));

    assert!(matches!(
        export_sampled_points_ply(&GeometryBuffer::new(), 5, &path, None),
        Err(GeometryError::EmptyPointSet { .. })
    ));
    Ok(())
}

#[test]
fn test_vtk_export() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("cube.vtk");
    export_vtk(&cube(), &path)?;

    let text = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# vtk DataFile Version 3.0");
    assert_eq!(lines[3], "DATASET POLYDATA");
    assert_eq!(lines[4], "POINTS 8 float");
    assert_eq!(lines[13], "POLYGONS 6 30");
    assert_eq!(lines[14], "4 0 3 2 1");
    assert_eq!(lines[20], "POINT_DATA 8");
    assert_eq!(lines[21], "NORMALS normals float");
    assert_eq!(lines.len(), 30);
    Ok(())
}

#[test]
fn test_invalid_buffers_are_not_written() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bad.obj");

    let mut buffer = cube();
    buffer.polygon_indices.push(vec![0, 1, 8]);
    assert!(matches!(
        export_obj(&buffer, &path),
        Err(GeometryError::IndexOutOfRange { index: 8, .. })
    ));

    let mut buffer = cube();
    buffer.normals.push(Normal::x());
    assert!(matches!(
        export_vtk(&buffer, dir.path().join("bad.vtk")),
        Err(GeometryError::NormalCountMismatch { .. })
    ));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_polylines_export() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("lines.obj");
    let polylines = vec![
        vec![Point::origin(), Point::new(1.0, 0.0, 0.0)],
        vec![Point::new(0.0, 1.0, 0.0), Point::new(0.0, 2.0, 0.0), Point::new(0.0, 3.0, 0.0)],
    ];
    export_polylines_obj(&polylines, &path)?;

    let text = std::fs::read_to_string(&path)?;
    let segments: Vec<&str> = text.lines().filter(|l| l.starts_with("l ")).collect();
    assert_eq!(segments, vec!["l 1 2", "l 3 4", "l 4 5"]);

    // Line records are ignored by the mesh importer
    let imported = import_mesh(&path, true)?;
    assert_eq!(imported.vertex_count(), 5);
    assert_eq!(imported.polygon_count(), 0);
    Ok(())
}
