// src/filesystem/mod.rs

//! Filesystem-side state of a conversion
//!
//! This module provides:
//! - The virtual file store that records extracted payload entries in order
//! - The scoped spillover area that holds file content too large for RAM

pub mod spill;
pub mod vfs;

pub use spill::SpillArea;
pub use vfs::{EntryType, FileContent, FileKind, VirtualFile, VirtualFileStore};
