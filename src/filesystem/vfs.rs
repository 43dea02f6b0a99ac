// src/filesystem/vfs.rs

//! Virtual file store for extracted payload entries
//!
//! The extraction pass records every classified tar entry here, in the
//! order it was observed. The packager later walks the store once to build
//! the IPA, so store order is output order.
//!
//! # Design
//!
//! - **Append-only**: entries are never removed, reordered or re-normalized.
//!   Paths are kept exactly as the tar stream spelled them (including any
//!   leading `./`) because app-root matching is a plain string prefix test.
//!
//! - **Content as a sum type**: a regular file owns exactly one of an
//!   in-memory buffer or a path into the spillover area. Directories and
//!   symlinks carry no content at all, so "both" and "neither" cannot be
//!   expressed.

use std::path::PathBuf;

/// Classification of a payload entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Directory,
    Regular,
    Symlink,
}

/// Where a regular file's bytes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Held in RAM
    InMemory(Vec<u8>),
    /// Streamed to a file inside the spillover area
    Spilled {
        /// Location of the spill file
        path: PathBuf,
        /// Number of bytes written to the spill file
        size: u64,
    },
}

impl FileContent {
    /// Size of the content in bytes
    pub fn len(&self) -> u64 {
        match self {
            Self::InMemory(data) => data.len() as u64,
            Self::Spilled { size, .. } => *size,
        }
    }

    /// Check if the content is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the content was spilled to disk
    pub fn is_spilled(&self) -> bool {
        matches!(self, Self::Spilled { .. })
    }
}

/// Kind-specific data of a payload entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    Regular(FileContent),
    Symlink {
        /// Textual link destination
        target: String,
    },
}

/// One entry from the payload tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    /// Archive-relative path, exactly as stored in the tar header
    pub path: String,
    /// Entry kind and content
    pub kind: FileKind,
    /// Raw POSIX mode bits from the tar header (0 = unspecified)
    pub mode: u32,
    /// Modification time in seconds since the Unix epoch
    pub mtime: u64,
}

impl VirtualFile {
    /// Create a directory entry
    pub fn directory(path: impl Into<String>, mode: u32, mtime: u64) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::Directory,
            mode,
            mtime,
        }
    }

    /// Create a regular file entry
    pub fn regular(path: impl Into<String>, content: FileContent, mode: u32, mtime: u64) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::Regular(content),
            mode,
            mtime,
        }
    }

    /// Create a symlink entry
    pub fn symlink(
        path: impl Into<String>,
        target: impl Into<String>,
        mode: u32,
        mtime: u64,
    ) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::Symlink {
                target: target.into(),
            },
            mode,
            mtime,
        }
    }

    /// Get the entry classification
    pub fn entry_type(&self) -> EntryType {
        match self.kind {
            FileKind::Directory => EntryType::Directory,
            FileKind::Regular(_) => EntryType::Regular,
            FileKind::Symlink { .. } => EntryType::Symlink,
        }
    }

    /// Get the content of a regular file
    pub fn content(&self) -> Option<&FileContent> {
        match &self.kind {
            FileKind::Regular(content) => Some(content),
            _ => None,
        }
    }

    /// Get the target of a symlink
    pub fn link_target(&self) -> Option<&str> {
        match &self.kind {
            FileKind::Symlink { target } => Some(target),
            _ => None,
        }
    }
}

/// Ordered record of every classified payload entry
#[derive(Debug, Default)]
pub struct VirtualFileStore {
    files: Vec<VirtualFile>,
    total_size: u64,
}

impl VirtualFileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping observation order
    pub fn push(&mut self, file: VirtualFile) {
        if let Some(content) = file.content() {
            self.total_size += content.len();
        }
        self.files.push(file);
    }

    /// Iterate entries in the order they were added
    pub fn iter(&self) -> std::slice::Iter<'_, VirtualFile> {
        self.files.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the store has no entries
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total bytes of regular-file content held in the store
    pub fn total_size(&self) -> u64 {
        self.total_size
    }
}

impl<'a> IntoIterator for &'a VirtualFileStore {
    type Item = &'a VirtualFile;
    type IntoIter = std::slice::Iter<'a, VirtualFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
