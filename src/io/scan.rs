// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Locale-independent numeric scanning over byte slices

/// Iterate the lines of `data`, without the `\n` terminator or a trailing `\r`.
/// A final line without terminator is included.
pub fn lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    let trimmed = data.strip_suffix(b"\n").unwrap_or(data);
    trimmed
        .split(|&b| b == b'\n')
        .filter(move |_| !data.is_empty())
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Scan-and-advance cursor over a single line
#[derive(Debug)]
pub struct LineCursor<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Self { line, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.line.get(self.pos).copied()
    }

    pub fn bump(&mut self) {
        if self.pos < self.line.len() {
            self.pos += 1;
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    pub fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    /// Advance to the next blank or the end of the line
    pub fn skip_token(&mut self) {
        while matches!(self.peek(), Some(b) if b != b' ' && b != b'\t') {
            self.pos += 1;
        }
    }

    /// Parse the longest float prefix after optional blanks. Leaves the cursor
    /// untouched and returns `None` when no number can be read.
    pub fn scan_float(&mut self) -> Option<f32> {
        let start = self.pos;
        self.skip_blanks();
        let run_start = self.pos;
        let run_len = self.line[run_start..]
            .iter()
            .take_while(|&&b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
            .count();

        for len in (1..=run_len).rev() {
            let candidate = &self.line[run_start..run_start + len];
            if let Some(value) = std::str::from_utf8(candidate)
                .ok()
                .and_then(|s| s.parse::<f32>().ok())
            {
                self.pos = run_start + len;
                return Some(value);
            }
        }

        self.pos = start;
        None
    }

    /// Parse an optionally negative decimal integer after optional blanks. Leaves the
    /// cursor untouched and returns `None` when no digits follow.
    pub fn scan_int(&mut self) -> Option<i64> {
        let start = self.pos;
        self.skip_blanks();
        let run_start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let digits = self.line[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            self.pos = start;
            return None;
        }
        self.pos += digits;

        match std::str::from_utf8(&self.line[run_start..self.pos])
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
        {
            Some(value) => Some(value),
            None => {
                self.pos = start;
                None
            }
        }
    }
}
