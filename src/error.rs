// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types shared by the importers, exporters and geometry routines

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by polyscan operations.
///
/// Malformed records inside a file are not errors: the parsers skip them and log a
/// warning. Everything here is a definitive failure of the whole call.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{path:?} does not have the expected .{expected} extension")]
    ExtensionMismatch {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0:?} is empty")]
    EmptyFile(PathBuf),

    #[error("invalid PLY header: {0}")]
    InvalidHeader(String),

    #[error("no vertex data after the PLY header")]
    NoVertexData,

    #[error("{operation}: point set is empty")]
    EmptyPointSet { operation: &'static str },

    #[error("{operation}: needs at least {required} points, got {actual}")]
    NotEnoughPoints {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("{operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },

    #[error("degenerate convex hull: {0}")]
    DegenerateHull(String),

    #[error("polygon {polygon} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        polygon: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("{normals} normals do not match {vertices} vertices")]
    NormalCountMismatch { normals: usize, vertices: usize },

    #[error("worker for chunk {0} panicked")]
    WorkerPanicked(usize),
}

impl GeometryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
