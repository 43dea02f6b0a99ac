// src/extract.rs

//! Single-pass payload extraction with a RAM budget
//!
//! Walks the decompressed `data.tar` stream once, in order, and records each
//! directory, regular file and symlink in a [`VirtualFileStore`]. Regular
//! file content is held in memory while the running total stays under the
//! configured ceiling; anything that would not fit is streamed to the
//! spillover area instead. The same pass detects the app root and captures
//! the bundle's Info.plist.
//!
//! The tar stream is forward-only: entries are read exactly once and there
//! is no second pass.

use crate::bundle::{AppRootDetector, INFO_PLIST};
use crate::error::{Error, Result};
use crate::filesystem::{EntryType, FileContent, SpillArea, VirtualFile, VirtualFileStore};
use crate::progress::ProgressTracker;
use std::io::Read;
use tracing::{debug, info, warn};

/// Default RAM ceiling for in-memory file content (2 GiB)
pub const DEFAULT_MEMORY_LIMIT: u64 = 2 * 1024 * 1024 * 1024;

/// Report the scan count every this many entries
const PROGRESS_INTERVAL: u64 = 100;

/// Where a regular file's content goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Memory,
    Disk,
}

/// Header facts of one tar entry, detached from the tar reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Path exactly as stored in the archive
    pub path: String,
    /// Classification, or `None` for types that are not kept
    pub entry_type: Option<EntryType>,
    pub mode: u32,
    /// Declared content size
    pub size: u64,
    pub mtime: u64,
    /// Link destination for symlinks
    pub link_target: Option<String>,
}

/// Counters collected during extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Every tar entry seen, including skipped types
    pub entries_scanned: u64,
    pub files_in_memory: u64,
    pub files_spilled: u64,
    /// Sum of declared regular-file sizes
    pub total_size: u64,
    /// Bytes held in memory at the end of the pass
    pub ram_usage: u64,
}

/// Result of a completed extraction pass
#[derive(Debug)]
pub struct Extraction {
    pub store: VirtualFileStore,
    /// App-root prefix, e.g. `./Applications/Foo.app/`
    pub app_root: String,
    /// Bytes of the last in-memory `*Info.plist` seen anywhere in the payload
    ///
    /// Capture is by suffix only, so a plist in a framework, plugin or a path
    /// outside the app root replaces an earlier capture. Spilled and empty
    /// plists never replace it.
    pub info_plist: Option<Vec<u8>>,
    pub stats: ExtractionStats,
}

/// Extraction state threaded through the tar pass
pub struct ExtractionEngine<'a> {
    memory_limit: u64,
    ram_usage: u64,
    spill: &'a mut SpillArea,
    store: VirtualFileStore,
    app_root: AppRootDetector,
    info_plist: Option<Vec<u8>>,
    stats: ExtractionStats,
}

impl<'a> ExtractionEngine<'a> {
    /// Create an engine with an empty store and zero RAM usage
    pub fn new(memory_limit: u64, spill: &'a mut SpillArea) -> Self {
        Self {
            memory_limit,
            ram_usage: 0,
            spill,
            store: VirtualFileStore::new(),
            app_root: AppRootDetector::new(),
            info_plist: None,
            stats: ExtractionStats::default(),
        }
    }

    /// Decide where a file of `size` bytes goes given the current usage
    ///
    /// Each file is judged on its own: `ram_usage + size < memory_limit`
    /// keeps it in memory, anything else spills.
    pub fn placement_for(&self, size: u64) -> Placement {
        if self.ram_usage.saturating_add(size) < self.memory_limit {
            Placement::Memory
        } else {
            Placement::Disk
        }
    }

    /// Bytes of file content currently held in memory
    pub fn ram_usage(&self) -> u64 {
        self.ram_usage
    }

    /// Current counters
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Classify one entry and record it, consuming its content from `reader`
    pub fn process_entry<R: Read>(&mut self, header: EntryHeader, reader: &mut R) -> Result<()> {
        self.stats.entries_scanned += 1;
        self.app_root.observe(&header.path);

        match header.entry_type {
            Some(EntryType::Symlink) => {
                let target = header.link_target.unwrap_or_default();
                self.store.push(VirtualFile::symlink(
                    header.path,
                    target,
                    header.mode,
                    header.mtime,
                ));
            }
            Some(EntryType::Regular) => self.process_regular(header, reader)?,
            Some(EntryType::Directory) => {
                self.store
                    .push(VirtualFile::directory(header.path, header.mode, header.mtime));
            }
            None => debug!("Skipping unsupported entry type: {}", header.path),
        }

        Ok(())
    }

    fn process_regular<R: Read>(&mut self, header: EntryHeader, reader: &mut R) -> Result<()> {
        self.stats.total_size += header.size;

        let content = match self.placement_for(header.size) {
            Placement::Memory => {
                let mut data = Vec::new();
                reader.read_to_end(&mut data).map_err(|e| {
                    Error::TarRead(format!("Failed to read {}: {}", header.path, e))
                })?;
                self.ram_usage += data.len() as u64;
                self.stats.files_in_memory += 1;
                FileContent::InMemory(data)
            }
            Placement::Disk => {
                let (path, size) = self.spill.store(reader)?;
                self.stats.files_spilled += 1;
                FileContent::Spilled { path, size }
            }
        };

        if header.path.ends_with(INFO_PLIST) {
            match &content {
                FileContent::InMemory(data) if !data.is_empty() => {
                    debug!("Captured {} ({} bytes)", header.path, data.len());
                    self.info_plist = Some(data.clone());
                }
                FileContent::InMemory(_) => {}
                FileContent::Spilled { .. } => {
                    warn!(
                        "{} was spilled to disk; skipping metadata capture",
                        header.path
                    );
                }
            }
        }

        self.store.push(VirtualFile::regular(
            header.path,
            content,
            header.mode,
            header.mtime,
        ));
        Ok(())
    }

    /// End the pass; fails if no app root was ever seen
    pub fn finish(self) -> Result<Extraction> {
        let app_root = self.app_root.into_prefix().ok_or(Error::AppRootNotFound)?;

        let mut stats = self.stats;
        stats.ram_usage = self.ram_usage;

        Ok(Extraction {
            store: self.store,
            app_root,
            info_plist: self.info_plist,
            stats,
        })
    }
}

/// Read the header facts of a tar entry
fn entry_header<R: Read>(entry: &tar::Entry<'_, R>) -> Result<EntryHeader> {
    let path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
    let header = entry.header();

    let entry_type = match header.entry_type() {
        tar::EntryType::Directory => Some(EntryType::Directory),
        tar::EntryType::Regular => Some(EntryType::Regular),
        tar::EntryType::Symlink => Some(EntryType::Symlink),
        _ => None,
    };

    let mode = header
        .mode()
        .map_err(|e| Error::TarRead(format!("Bad mode for {}: {}", path, e)))?;
    let mtime = header
        .mtime()
        .map_err(|e| Error::TarRead(format!("Bad mtime for {}: {}", path, e)))?;
    let link_target = entry
        .link_name_bytes()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());

    Ok(EntryHeader {
        path,
        entry_type,
        mode,
        size: entry.size(),
        mtime,
        link_target,
    })
}

/// Run the extraction pass over a decompressed tar stream
pub fn extract_payload<R: Read>(
    reader: R,
    memory_limit: u64,
    spill: &mut SpillArea,
    progress: &dyn ProgressTracker,
) -> Result<Extraction> {
    let mut archive = tar::Archive::new(reader);
    let mut engine = ExtractionEngine::new(memory_limit, spill);

    let entries = archive
        .entries()
        .map_err(|e| Error::TarRead(format!("Failed to read archive entries: {}", e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::TarRead(format!("Failed to read archive entry: {}", e)))?;
        let header = entry_header(&entry)?;
        engine.process_entry(header, &mut entry)?;

        let scanned = engine.stats().entries_scanned;
        if scanned % PROGRESS_INTERVAL == 0 {
            progress.set_message(&format!(
                "Analyzing files... ({} scanned, RAM: {} MB)",
                scanned,
                engine.ram_usage() / (1024 * 1024)
            ));
        }
    }

    let extraction = engine.finish()?;
    info!(
        "Extracted {} entries ({} in memory, {} spilled, {} bytes)",
        extraction.stats.entries_scanned,
        extraction.stats.files_in_memory,
        extraction.stats.files_spilled,
        extraction.stats.total_size
    );
    Ok(extraction)
}
