// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! R-tree nearest-neighbour index over a point set

use crate::geometry::Point;
use rstar::primitives::GeomWithData;
use rstar::RTree;

type IndexedPoint = GeomWithData<[f32; 3], usize>;

/// Read-only nearest-neighbour index (an `rstar` R-tree), built per query batch.
///
/// Entries carry their position in the source slice so results can be mapped back to
/// vertex ids.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Bulk-load every point
    pub fn build(points: &[Point]) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y, p.z], i))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Up to `count` nearest entries to `query` as `(point index, distance)`, closest first.
    /// A query located on an indexed point returns that point first at distance 0.
    pub fn nearest(&self, query: &Point, count: usize) -> Vec<(usize, f32)> {
        let target = [query.x, query.y, query.z];
        self.tree
            .nearest_neighbor_iter(&target)
            .take(count)
            .map(|entry| (entry.data, distance(entry.geom(), &target)))
            .collect()
    }

    /// Up to `count` nearest points to point `index`, excluding the point itself
    pub fn nearest_others(&self, index: usize, query: &Point, count: usize) -> Vec<(usize, f32)> {
        let target = [query.x, query.y, query.z];
        self.tree
            .nearest_neighbor_iter(&target)
            .filter(|entry| entry.data != index)
            .take(count)
            .map(|entry| (entry.data, distance(entry.geom(), &target)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

fn distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
