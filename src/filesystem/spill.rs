// src/filesystem/spill.rs

//! Scoped spillover area for file content that does not fit in RAM
//!
//! A `SpillArea` owns a private temporary directory for the lifetime of a
//! single conversion. Dropping it deletes the directory and every spill file
//! inside it, which is what guarantees cleanup on error paths.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Prefix for the spillover directory name
const SPILL_DIR_PREFIX: &str = "ipa-spill";

/// Temporary directory holding spilled file content
#[derive(Debug)]
pub struct SpillArea {
    dir: TempDir,
    spilled: usize,
}

impl SpillArea {
    /// Create a spillover directory under `parent`, or the system temp dir
    pub fn new(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SPILL_DIR_PREFIX);

        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| Error::SpilloverIo(format!("Failed to create spill directory: {}", e)))?;

        debug!("Created spill directory: {}", dir.path().display());
        Ok(Self { dir, spilled: 0 })
    }

    /// Location of the spillover directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Number of files spilled so far
    pub fn spilled(&self) -> usize {
        self.spilled
    }

    /// Stream `reader` to a new, uniquely named spill file
    ///
    /// Returns the spill file path and the number of bytes written.
    pub fn store<R: Read>(&mut self, reader: &mut R) -> Result<(PathBuf, u64)> {
        self.spilled += 1;
        let path = self.dir.path().join(format!("spill_{}", self.spilled));

        let file = File::create(&path).map_err(|e| {
            Error::SpilloverIo(format!("Failed to create {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        let size = io::copy(reader, &mut writer)
            .and_then(|n| writer.flush().map(|_| n))
            .map_err(|e| {
                Error::SpilloverIo(format!("Failed to write {}: {}", path.display(), e))
            })?;

        debug!("Spilled {} bytes to {}", size, path.display());
        Ok((path, size))
    }

    /// Remove the spillover directory, reporting any failure
    ///
    /// Dropping the area also removes it; this only surfaces the error.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| {
            Error::SpilloverIo(format!("Failed to remove {}: {}", path.display(), e))
        })
    }
}
