// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Read-only file contents scoped to one import call

use crate::error::{GeometryError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::Path;
use tracing::debug;

/// Whole file contents, memory-mapped when the platform allows it and read into
/// a heap buffer otherwise. Dropping the value releases the mapping.
pub enum MappedFile {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl MappedFile {
    /// Map `path` read-only. Empty files are rejected.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| GeometryError::io(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| GeometryError::io(path, e))?
            .len();
        if len == 0 {
            return Err(GeometryError::EmptyFile(path.to_path_buf()));
        }

        // SAFETY: the mapping is read-only and lives only for the import call; the
        // caller must not truncate the file concurrently.
        match unsafe { Mmap::map(&file) } {
            Ok(map) => Ok(MappedFile::Mapped(map)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "mapping failed, reading into memory");
                Self::read(path)
            }
        }
    }

    /// Read `path` fully into memory without mapping
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| GeometryError::io(path, e))?;
        if bytes.is_empty() {
            return Err(GeometryError::EmptyFile(path.to_path_buf()));
        }
        Ok(MappedFile::Buffered(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            MappedFile::Mapped(map) => &map[..],
            MappedFile::Buffered(bytes) => bytes.as_slice(),
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, MappedFile::Mapped(_))
    }
}

impl Deref for MappedFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes()
    }
}
