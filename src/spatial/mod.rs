// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Spatial index, distance statistics and analytics reports

mod index;
mod report;
mod stats;

pub use index::SpatialIndex;
pub use report::{analyze, SpatialReport};
pub use stats::{
    max_distance_brute_force, mean_distance_brute_force, min_distance,
    min_distance_brute_force, nearest_neighbor_mean_distance, DEFAULT_NEIGHBORS,
};
