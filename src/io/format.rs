// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! File format dispatch keyed on the lowercase extension

use crate::error::{GeometryError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Wavefront OBJ
    Obj,
    /// ASCII PLY point cloud
    Ply,
    /// Legacy ASCII VTK polydata (export only)
    Vtk,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Obj => "obj",
            FileFormat::Ply => "ply",
            FileFormat::Vtk => "vtk",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(FileFormat::Obj),
            "ply" => Some(FileFormat::Ply),
            "vtk" => Some(FileFormat::Vtk),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Reject `path` unless its extension names this format
    pub fn check_path(self, path: &Path) -> Result<()> {
        if Self::from_path(path) == Some(self) {
            Ok(())
        } else {
            Err(GeometryError::ExtensionMismatch {
                path: path.to_path_buf(),
                expected: self.extension(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(FileFormat::from_path(Path::new("scan.PLY")), Some(FileFormat::Ply));
        assert_eq!(FileFormat::from_path(Path::new("a/b/mesh.Obj")), Some(FileFormat::Obj));
        assert_eq!(FileFormat::from_path(Path::new("mesh.stl")), None);
        assert_eq!(FileFormat::from_path(Path::new("mesh")), None);
    }

    #[test]
    fn test_expect_rejects_mismatch() {
        assert!(FileFormat::Obj.check_path(Path::new("mesh.obj")).is_ok());
        assert!(matches!(
            FileFormat::Obj.check_path(Path::new("cloud.ply")),
            Err(GeometryError::ExtensionMismatch { expected: "obj", .. })
        ));
    }
}
