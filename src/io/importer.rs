// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Chunked, multi-threaded OBJ mesh and PLY point-cloud importer

use super::chunk::{plan_chunks, Chunk};
use super::mapped::MappedFile;
use super::obj::{parse_obj_chunk, ObjChunk};
use super::ply::{
    is_blank, parse_point_chunk, parse_point_record, read_ply_header, vertex_body, HeaderScanner,
    PointChunk,
};
use super::FileFormat;
use crate::error::{GeometryError, Result};
use crate::geometry::{GeometryBuffer, Point};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of parsing one OBJ file, with merge diagnostics
#[derive(Debug, Clone, Default)]
pub struct MeshImport {
    pub buffer: GeometryBuffer,
    /// `(worker id, vertices parsed)` for every worker, in merge order
    pub worker_vertex_counts: Vec<(usize, usize)>,
    /// Records the parsers could not read
    pub skipped_records: usize,
    /// Faces discarded because a reference fell outside the vertex range
    pub dropped_faces: usize,
}

impl MeshImport {
    /// Fill `tags` with the id of the worker that parsed each vertex, in final vertex order.
    /// The vector is cleared first.
    pub fn write_provenance(&self, tags: &mut Vec<u32>) {
        tags.clear();
        tags.reserve(self.buffer.vertex_count());
        for &(worker, count) in &self.worker_vertex_counts {
            tags.extend(std::iter::repeat(worker as u32).take(count));
        }
    }

    pub fn provenance(&self) -> Vec<u32> {
        let mut tags = Vec::new();
        self.write_provenance(&mut tags);
        tags
    }
}

/// Plans chunks, runs one parser thread per non-empty chunk and merges the results
/// in chunk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportCoordinator {
    workers: usize,
}

impl Default for ImportCoordinator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ImportCoordinator {
    /// One worker when `parallel` is false, otherwise one per available hardware thread
    pub fn new(parallel: bool) -> Self {
        let workers = if parallel { available_workers() } else { 1 };
        Self { workers }
    }

    /// Fixed worker count, at least one
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Import an `.obj` file
    pub fn import_mesh(&self, path: impl AsRef<Path>) -> Result<GeometryBuffer> {
        Ok(self.import_mesh_detailed(path.as_ref())?.buffer)
    }

    /// Import an `.obj` file and report which worker parsed each vertex
    pub fn import_mesh_with_provenance(
        &self,
        path: impl AsRef<Path>,
        tags: &mut Vec<u32>,
    ) -> Result<GeometryBuffer> {
        let import = self.import_mesh_detailed(path.as_ref())?;
        import.write_provenance(tags);
        Ok(import.buffer)
    }

    /// Import an `.obj` file, keeping merge diagnostics
    pub fn import_mesh_detailed(&self, path: &Path) -> Result<MeshImport> {
        FileFormat::Obj.check_path(path)?;
        let file = MappedFile::open(path)?;

        let start = Instant::now();
        let import = self.parse_obj_bytes(&file)?;
        drop(file);

        info!(
            path = %path.display(),
            vertices = import.buffer.vertex_count(),
            polygons = import.buffer.polygon_count(),
            normals = import.buffer.normals.len(),
            workers = self.workers,
            elapsed = ?start.elapsed(),
            "imported OBJ mesh"
        );
        Ok(import)
    }

    /// Run the chunked OBJ pipeline over an in-memory file
    pub fn parse_obj_bytes(&self, data: &[u8]) -> Result<MeshImport> {
        let chunks = plan_chunks(data, self.workers);
        debug!(?chunks, "planned OBJ chunks");

        let results = run_workers(data, &chunks, parse_obj_chunk)?;
        Ok(merge_obj_chunks(results))
    }

    /// Import a `.ply` point cloud through the memory-mapped chunked pipeline
    pub fn import_point_cloud(&self, path: impl AsRef<Path>) -> Result<Vec<Point>> {
        let path = path.as_ref();
        FileFormat::Ply.check_path(path)?;
        let file = MappedFile::open(path)?;

        let start = Instant::now();
        let points = self.parse_point_cloud_bytes(&file)?;
        drop(file);

        info!(
            path = %path.display(),
            points = points.len(),
            workers = self.workers,
            elapsed = ?start.elapsed(),
            "imported PLY point cloud"
        );
        Ok(points)
    }

    /// Run the header reader and the chunked point pipeline over an in-memory file
    pub fn parse_point_cloud_bytes(&self, data: &[u8]) -> Result<Vec<Point>> {
        let header = read_ply_header(data)?;
        let body = &data[header.body_offset..];
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(GeometryError::NoVertexData);
        }

        let vertices = vertex_body(body, header.vertex_count);
        if vertices.len() < body.len() {
            debug!(
                declared = header.vertex_count,
                ignored_bytes = body.len() - vertices.len(),
                "ignoring lines after the declared vertex element"
            );
        }

        let chunks = plan_chunks(vertices, self.workers);
        debug!(?chunks, body_offset = header.body_offset, "planned PLY chunks");

        let results = run_workers(vertices, &chunks, parse_point_chunk)?;
        Ok(merge_point_chunks(results, header.vertex_count))
    }
}

/// Import an `.obj` mesh, on all hardware threads when `parallel` is set
pub fn import_mesh(path: impl AsRef<Path>, parallel: bool) -> Result<GeometryBuffer> {
    ImportCoordinator::new(parallel).import_mesh(path)
}

/// Import an `.obj` mesh and fill `tags` with per-vertex worker ids
pub fn import_mesh_with_provenance(
    path: impl AsRef<Path>,
    parallel: bool,
    tags: &mut Vec<u32>,
) -> Result<GeometryBuffer> {
    ImportCoordinator::new(parallel).import_mesh_with_provenance(path, tags)
}

/// Import a `.ply` point cloud, on all hardware threads when `parallel` is set
pub fn import_point_cloud(path: impl AsRef<Path>, parallel: bool) -> Result<Vec<Point>> {
    ImportCoordinator::new(parallel).import_point_cloud(path)
}

/// Single-threaded `.ply` import that streams the file line by line without mapping it.
/// Produces the same points as [`import_point_cloud`].
pub fn import_point_cloud_simple(path: impl AsRef<Path>) -> Result<Vec<Point>> {
    let path = path.as_ref();
    FileFormat::Ply.check_path(path)?;

    let file = File::open(path).map_err(|e| GeometryError::io(path, e))?;
    let len = file
        .metadata()
        .map_err(|e| GeometryError::io(path, e))?
        .len();
    if len == 0 {
        return Err(GeometryError::EmptyFile(path.to_path_buf()));
    }

    let mut reader = BufReader::new(file);
    let mut line = Vec::new();
    let mut header = HeaderScanner::new();
    while next_line(&mut reader, &mut line, path)? {
        if header.feed(&String::from_utf8_lossy(&line)) {
            break;
        }
    }
    let vertex_count = header.finish()?;

    // Only the first `vertex_count` non-blank lines belong to the vertex element
    let mut chunk = PointChunk::default();
    let mut saw_body = false;
    while chunk.points.len() + chunk.skipped < vertex_count
        && next_line(&mut reader, &mut line, path)?
    {
        if is_blank(&line) {
            continue;
        }
        saw_body = true;
        parse_point_record(&line, &mut chunk);
    }
    if !saw_body {
        return Err(GeometryError::NoVertexData);
    }

    Ok(merge_point_chunks(vec![(0, chunk)], vertex_count))
}

/// Read the next line into `line` as raw bytes, without its terminator.
/// Returns false at end of input.
fn next_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>, path: &Path) -> Result<bool> {
    line.clear();
    let read = reader
        .read_until(b'\n', line)
        .map_err(|e| GeometryError::io(path, e))?;
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    Ok(read > 0)
}

fn available_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Parse every non-empty chunk on its own scoped thread; results come back in chunk order
/// tagged with the chunk index.
fn run_workers<T, F>(data: &[u8], chunks: &[Chunk], parse: F) -> Result<Vec<(usize, T)>>
where
    T: Send,
    F: Fn(&[u8]) -> T + Sync,
{
    let parse = &parse;
    let joined: Vec<Result<(usize, T)>> = thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(id, chunk)| {
                let slice = &data[chunk.range()];
                (id, scope.spawn(move || parse(slice)))
            })
            .collect();

        // Join every handle before reporting so no panicked worker is left unjoined
        handles
            .into_iter()
            .map(|(id, handle)| {
                handle
                    .join()
                    .map(|result| (id, result))
                    .map_err(|_| GeometryError::WorkerPanicked(id))
            })
            .collect()
    });

    joined.into_iter().collect()
}

/// Concatenate worker output in chunk order and resolve face references globally
fn merge_obj_chunks(results: Vec<(usize, ObjChunk)>) -> MeshImport {
    let vertex_count: usize = results.iter().map(|(_, c)| c.vertices.len()).sum();
    let face_count: usize = results.iter().map(|(_, c)| c.faces.len()).sum();

    let mut import = MeshImport {
        buffer: GeometryBuffer::with_capacity(vertex_count, face_count),
        ..MeshImport::default()
    };

    for (worker, chunk) in results {
        let offset = import.buffer.vertices.len();
        debug!(
            worker,
            vertices = chunk.vertices.len(),
            normals = chunk.normals.len(),
            faces = chunk.faces.len(),
            "merging OBJ chunk"
        );

        for face in &chunk.faces {
            let resolved: Option<Vec<u32>> = face
                .iter()
                .map(|index| index.resolve(offset, vertex_count))
                .collect();
            match resolved {
                Some(polygon) => import.buffer.polygon_indices.push(polygon),
                None => import.dropped_faces += 1,
            }
        }

        import
            .worker_vertex_counts
            .push((worker, chunk.vertices.len()));
        import.skipped_records += chunk.skipped;
        import.buffer.vertices.extend(chunk.vertices);
        import.buffer.normals.extend(chunk.normals);
    }

    if import.dropped_faces > 0 {
        warn!(
            dropped = import.dropped_faces,
            vertices = vertex_count,
            "dropped faces referencing missing vertices"
        );
    }

    let normal_count = import.buffer.normals.len();
    if normal_count != 0 && normal_count != vertex_count {
        warn!(
            normals = normal_count,
            vertices = vertex_count,
            "normal count does not match vertex count, discarding normals"
        );
        import.buffer.normals.clear();
    }

    import
}

/// Concatenate point chunks in order
fn merge_point_chunks(results: Vec<(usize, PointChunk)>, declared: usize) -> Vec<Point> {
    let total: usize = results.iter().map(|(_, c)| c.points.len()).sum();
    let skipped: usize = results.iter().map(|(_, c)| c.skipped).sum();
    let mut points = Vec::with_capacity(total);
    for (_, chunk) in results {
        points.extend(chunk.points);
    }

    if points.len() < declared {
        warn!(
            parsed = points.len(),
            skipped,
            declared,
            "point cloud has fewer points than its header declares"
        );
    }

    points
}
