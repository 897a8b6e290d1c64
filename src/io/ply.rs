// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ASCII PLY point-cloud header reader and body chunk parser

use crate::error::{GeometryError, Result};
use crate::geometry::Point;
use super::scan::lines;
use tracing::warn;

/// Vertex count declared in the header and where the body starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlyHeader {
    pub vertex_count: usize,
    pub body_offset: usize,
}

/// Line-by-line header state, shared by the mapped and streaming importers
#[derive(Debug, Default)]
pub struct HeaderScanner {
    vertex_count: Option<usize>,
    finished: bool,
}

impl HeaderScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one header line; returns true once `end_header` has been seen
    pub fn feed(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.starts_with("element vertex") {
            let count = line
                .split_ascii_whitespace()
                .nth(2)
                .and_then(|token| token.parse::<usize>().ok());
            match count {
                Some(count) => self.vertex_count = Some(count),
                None => warn!(line, "failed to parse PLY vertex count line"),
            }
        } else if line == "end_header" {
            self.finished = true;
        }
        self.finished
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Declared vertex count, or the reason the header is unusable
    pub fn finish(self) -> Result<usize> {
        if !self.finished {
            return Err(GeometryError::InvalidHeader(
                "end_header line not found".to_string(),
            ));
        }
        match self.vertex_count {
            Some(count) if count > 0 => Ok(count),
            _ => Err(GeometryError::InvalidHeader(
                "vertex count not found in the header".to_string(),
            )),
        }
    }
}

/// Scan the header at the start of `data`
pub fn read_ply_header(data: &[u8]) -> Result<PlyHeader> {
    let mut scanner = HeaderScanner::new();
    let mut offset = 0;

    while offset < data.len() && !scanner.is_finished() {
        let line_end = data[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(data.len(), |p| offset + p);
        scanner.feed(&String::from_utf8_lossy(&data[offset..line_end]));
        offset = (line_end + 1).min(data.len());
    }

    let vertex_count = scanner.finish()?;
    Ok(PlyHeader {
        vertex_count,
        body_offset: offset,
    })
}

/// Points parsed from one body chunk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointChunk {
    pub points: Vec<Point>,
    pub skipped: usize,
}

/// Parse each non-blank line of `data` as `x y z`; lines that fail are logged and skipped
pub fn parse_point_chunk(data: &[u8]) -> PointChunk {
    let mut chunk = PointChunk::default();
    for line in lines(data) {
        if !is_blank(line) {
            parse_point_record(line, &mut chunk);
        }
    }
    chunk
}

/// Parse one non-blank body line into `chunk`, counting it as skipped when it is not a point.
/// Bytes that are not UTF-8 make the line malformed, never the whole import.
pub fn parse_point_record(line: &[u8], chunk: &mut PointChunk) {
    let text = String::from_utf8_lossy(line);
    match parse_point_line(&text) {
        Some(point) => chunk.points.push(point),
        None => {
            chunk.skipped += 1;
            warn!(line = %text, "skipping malformed point line");
        }
    }
}

pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Prefix of `body` holding its first `declared` non-blank lines, which belong to the
/// vertex element. Whatever follows is another element's data.
pub fn vertex_body(body: &[u8], declared: usize) -> &[u8] {
    let mut remaining = declared;
    let mut offset = 0;
    while offset < body.len() && remaining > 0 {
        let end = body[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(body.len(), |p| offset + p + 1);
        if !is_blank(&body[offset..end]) {
            remaining -= 1;
        }
        offset = end;
    }
    &body[..offset]
}

/// First three whitespace-separated floats of a line; extra columns are ignored
pub fn parse_point_line(line: &str) -> Option<Point> {
    let mut values = line
        .split_ascii_whitespace()
        .map(|token| token.parse::<f32>().ok());
    let x = values.next()??;
    let y = values.next()??;
    let z = values.next()??;
    Some(Point::new(x, y, z))
}
