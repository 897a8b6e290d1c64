// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ chunk parser (`v`, `vn` and `f` records)

use super::scan::{lines, LineCursor};
use crate::geometry::{Normal, Point};
use tracing::{trace, warn};

/// Vertex reference of a face as written in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceIndex {
    /// Positive OBJ index, already converted to 0-based file-global numbering
    Absolute(u32),
    /// Negative OBJ index, relative to the first vertex of the parsing chunk
    Relative(i64),
}

impl FaceIndex {
    /// Global 0-based vertex id, given the chunk's first global vertex id and the
    /// total vertex count of the merged file
    pub fn resolve(self, chunk_offset: usize, vertex_count: usize) -> Option<u32> {
        let global = match self {
            FaceIndex::Absolute(index) => index as i64,
            FaceIndex::Relative(local) => chunk_offset as i64 + local,
        };
        if global >= 0 && (global as usize) < vertex_count {
            u32::try_from(global).ok()
        } else {
            None
        }
    }
}

/// Records parsed from one chunk, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjChunk {
    pub vertices: Vec<Point>,
    pub normals: Vec<Normal>,
    pub faces: Vec<Vec<FaceIndex>>,
    /// Records dropped because they could not be parsed
    pub skipped: usize,
}

/// Parse every complete `v`, `vn` and `f` record in `data`.
///
/// Unknown lines are ignored. A vertex or normal record missing a coordinate is
/// dropped. Face tokens may carry `/texcoord/normal` suffixes, which are skipped; a
/// face ends at the first token that does not start with a non-zero integer, and a
/// face with no usable index is dropped.
pub fn parse_obj_chunk(data: &[u8]) -> ObjChunk {
    let mut chunk = ObjChunk::default();

    for line in lines(data) {
        if let Some(rest) = strip_record(line, b"vn") {
            match scan_vec3(rest) {
                Some([x, y, z]) => chunk.normals.push(Normal::new(x, y, z)),
                None => chunk.skip(line, "normal"),
            }
        } else if let Some(rest) = strip_record(line, b"v") {
            match scan_vec3(rest) {
                Some([x, y, z]) => chunk.vertices.push(Point::new(x, y, z)),
                None => chunk.skip(line, "vertex"),
            }
        } else if let Some(rest) = strip_record(line, b"f") {
            let face = scan_face(rest, chunk.vertices.len());
            if face.is_empty() {
                chunk.skip(line, "face");
            } else {
                chunk.faces.push(face);
            }
        }
    }

    chunk
}

impl ObjChunk {
    fn skip(&mut self, line: &[u8], kind: &str) {
        self.skipped += 1;
        warn!(
            record = kind,
            line = %String::from_utf8_lossy(line),
            "skipping malformed OBJ record"
        );
    }
}

/// Remainder of `line` after `keyword` and its separating blank
fn strip_record<'a>(line: &'a [u8], keyword: &[u8]) -> Option<&'a [u8]> {
    let rest = line.strip_prefix(keyword)?;
    match rest.first() {
        Some(b' ' | b'\t') => Some(&rest[1..]),
        _ => None,
    }
}

fn scan_vec3(rest: &[u8]) -> Option<[f32; 3]> {
    let mut cursor = LineCursor::new(rest);
    let x = cursor.scan_float()?;
    let y = cursor.scan_float()?;
    let z = cursor.scan_float()?;
    Some([x, y, z])
}

fn scan_face(rest: &[u8], vertices_before: usize) -> Vec<FaceIndex> {
    let mut cursor = LineCursor::new(rest);
    let mut face = Vec::new();

    loop {
        cursor.skip_blanks();
        if cursor.at_end() {
            break;
        }

        let Some(raw) = cursor.scan_int() else {
            trace!(position = cursor.position(), "face token without index");
            break;
        };

        let index = match raw {
            0 => break,
            r if r > 0 => match u32::try_from(r - 1) {
                Ok(index) => FaceIndex::Absolute(index),
                Err(_) => break,
            },
            r => FaceIndex::Relative(vertices_before as i64 + r),
        };
        face.push(index);

        // Texture and normal sub-indices are read and discarded
        if cursor.peek() == Some(b'/') {
            cursor.bump();
            if cursor.peek() != Some(b'/') {
                let _ = cursor.scan_int();
            }
            if cursor.peek() == Some(b'/') {
                cursor.bump();
                let _ = cursor.scan_int();
            }
        }

        cursor.skip_token();
    }

    face
}
