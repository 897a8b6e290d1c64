// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - interchange buffer, half-edge mesh and derived geometry

mod bbox;
mod buffer;
mod halfedge;
mod hull;
mod sphere;

pub use bbox::BoundingBox;
pub use buffer::{GeometryBuffer, Normal, Point};
pub use halfedge::{Edge, HalfEdge, HalfEdgeMesh};
pub use hull::{convex_hull, convex_hull_surface_mesh};
pub use sphere::{bounding_sphere, mesh_bounding_sphere, BoundingSphere};
