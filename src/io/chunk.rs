// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Splits a byte buffer into per-worker ranges aligned to line boundaries

use std::ops::Range;

/// Half-open byte range assigned to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Plan exactly `workers` chunks covering `data` (a `workers` of zero is treated as one).
///
/// Chunk `i` nominally starts at `i * (len / workers)`; the start is moved forward to the
/// first byte following a newline so no record is split. The chunks are contiguous, never
/// overlap and together cover `0..data.len()`. Workers whose nominal start falls inside a
/// preceding chunk's final line, or past the end, get an empty range.
pub fn plan_chunks(data: &[u8], workers: usize) -> Vec<Chunk> {
    let workers = workers.max(1);
    let len = data.len();
    let nominal = len / workers;

    let mut starts = Vec::with_capacity(workers + 1);
    starts.push(0);
    for i in 1..workers {
        let previous = starts[i - 1];
        starts.push(align_to_line_start(data, i * nominal).max(previous));
    }
    starts.push(len);

    starts
        .windows(2)
        .map(|w| Chunk {
            start: w[0],
            end: w[1],
        })
        .collect()
}

/// First offset `>= pos` that begins a line, or `data.len()`
pub fn align_to_line_start(data: &[u8], pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    if pos >= data.len() {
        return data.len();
    }
    if data[pos - 1] == b'\n' {
        return pos;
    }
    match data[pos..].iter().position(|&b| b == b'\n') {
        Some(offset) => pos + offset + 1,
        None => data.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(data: &[u8], chunks: &[Chunk], workers: usize) {
        assert_eq!(chunks.len(), workers.max(1));
        assert_eq!(chunks[0].start, 0);
        assert_eq!(chunks[chunks.len() - 1].end, data.len());
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.start <= chunk.end);
            let boundary = chunk.end;
            assert!(
                boundary == 0 || boundary == data.len() || data[boundary - 1] == b'\n',
                "boundary {} splits a line",
                boundary
            );
        }
    }

    #[test]
    fn test_single_worker_covers_everything() {
        let data = b"v 1 2 3\nv 4 5 6\n";
        let chunks = plan_chunks(data, 1);
        assert_eq!(chunks, vec![Chunk { start: 0, end: data.len() }]);
    }

    #[test]
    fn test_boundaries_follow_newlines() {
        let data = b"v 1 2 3\nv 4 5 6\nv 7 8 9\nf 1 2 3\n";
        for workers in 1..=12 {
            let chunks = plan_chunks(data, workers);
            assert_well_formed(data, &chunks, workers);
        }
    }

    #[test]
    fn test_more_workers_than_bytes() {
        let data = b"v 1 2 3";
        let chunks = plan_chunks(data, 32);
        assert_well_formed(data, &chunks, 32);
        assert_eq!(chunks.iter().filter(|c| !c.is_empty()).count(), 1);
    }

    #[test]
    fn test_no_trailing_newline() {
        let data = b"a\nbbbbbbbbbbbbbbbbbbbb";
        let chunks = plan_chunks(data, 4);
        assert_well_formed(data, &chunks, 4);
        // The final line starts before the first nominal split, so it stays whole
        assert_eq!(chunks[0], Chunk { start: 0, end: data.len() });
    }

    #[test]
    fn test_empty_input() {
        let chunks = plan_chunks(b"", 3);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(Chunk::is_empty));
    }

    #[test]
    fn test_zero_workers_means_one() {
        let chunks = plan_chunks(b"x\n", 0);
        assert_eq!(chunks, vec![Chunk { start: 0, end: 2 }]);
    }
}
