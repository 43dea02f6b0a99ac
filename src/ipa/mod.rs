// src/ipa/mod.rs

//! IPA packaging
//!
//! Walks the virtual file store once and writes every entry under the app
//! root into a zip at `Payload/<App>.app/...`, in store order. Each entry's
//! Unix type and permission bits end up in the high half of its external
//! attributes (see [`attributes`]).
//!
//! Zip names must be unique. When two store entries map to the same output
//! name, the first one is kept and later ones are dropped with a warning.

pub mod attributes;

use crate::bundle::AppBundleInfo;
use crate::error::{Error, Result};
use crate::filesystem::{EntryType, FileContent, FileKind, VirtualFile, VirtualFileStore};
use crate::progress::ProgressTracker;
use attributes::{entry_attributes, is_main_executable, output_path, EntryAttributes, StorageMethod};
use chrono::{Datelike, Timelike};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Seek, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Files at or above this size need zip64 records
const LARGE_FILE_THRESHOLD: u64 = 0xFFFF_FFFF;

/// Outcome of writing an IPA
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSummary {
    /// Entries written under `Payload/`
    pub entries_written: usize,
    /// Store entries outside the app root
    pub entries_skipped: usize,
    /// Entries dropped because their output name was already written
    pub duplicates_skipped: usize,
    /// File and link body bytes written
    pub bytes_written: u64,
}

/// Convert a Unix timestamp to a zip timestamp (UTC)
///
/// Times the DOS format cannot represent fall back to 1980-01-01.
pub fn zip_time(mtime: u64) -> zip::DateTime {
    let Some(time) = i64::try_from(mtime)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    else {
        return zip::DateTime::default();
    };

    let Ok(year) = u16::try_from(time.year()) else {
        return zip::DateTime::default();
    };

    zip::DateTime::from_date_and_time(
        year,
        time.month() as u8,
        time.day() as u8,
        time.hour() as u8,
        time.minute() as u8,
        time.second() as u8,
    )
    .unwrap_or_default()
}

/// Counts body bytes into the progress tracker as they are written
struct ProgressWriter<'a, W> {
    inner: W,
    progress: &'a dyn ProgressTracker,
    written: u64,
}

impl<W: Write> Write for ProgressWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        self.progress.increment(n as u64);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Zip writer that lays out IPA entries
pub struct IpaWriter<'p, W: Write + Seek> {
    zip: ZipWriter<W>,
    progress: &'p dyn ProgressTracker,
    written: HashSet<String>,
    summary: PackageSummary,
}

impl<'p, W: Write + Seek> IpaWriter<'p, W> {
    pub fn new(writer: W, progress: &'p dyn ProgressTracker) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            progress,
            written: HashSet::new(),
            summary: PackageSummary::default(),
        }
    }

    /// Write one entry at `output_path` with the given attributes
    ///
    /// The zip writer derives the type bits from the call used
    /// (`add_directory`, `add_symlink`, `start_file`); they match
    /// `attrs.type_bits` for the entry kind. A name that was already added
    /// is counted as a duplicate and nothing is written.
    pub fn add_entry(
        &mut self,
        file: &VirtualFile,
        output_path: &str,
        attrs: EntryAttributes,
    ) -> Result<()> {
        if !self.written.insert(output_path.to_string()) {
            warn!("Duplicate entry {} ({}); keeping the first", output_path, file.path);
            self.summary.duplicates_skipped += 1;
            return Ok(());
        }

        let method = match attrs.method {
            StorageMethod::Stored => CompressionMethod::Stored,
            StorageMethod::Deflated => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(attrs.permissions)
            .last_modified_time(zip_time(file.mtime));

        debug!(
            "Adding {} (mode {:o}, attrs {:#010x}, {:?})",
            output_path,
            attrs.unix_mode(),
            attrs.external_attributes(),
            attrs.method
        );

        match &file.kind {
            FileKind::Directory => {
                self.zip.add_directory(output_path, options)?;
            }
            FileKind::Symlink { target } => {
                self.zip.add_symlink(output_path, target.as_str(), options)?;
                self.summary.bytes_written += target.len() as u64;
            }
            FileKind::Regular(content) => {
                let options = options.large_file(content.len() >= LARGE_FILE_THRESHOLD);
                self.zip.start_file(output_path, options)?;
                self.write_body(output_path, content)?;
            }
        }

        self.summary.entries_written += 1;
        Ok(())
    }

    fn write_body(&mut self, output_path: &str, content: &FileContent) -> Result<()> {
        let mut writer = ProgressWriter {
            inner: &mut self.zip,
            progress: self.progress,
            written: 0,
        };

        match content {
            FileContent::InMemory(data) => writer.write_all(data).map_err(|e| {
                Error::OutputWrite(format!("Failed to write {}: {}", output_path, e))
            })?,
            FileContent::Spilled { path, .. } => {
                let mut spilled = File::open(path).map_err(|e| {
                    Error::SpilloverIo(format!("Failed to open {}: {}", path.display(), e))
                })?;
                io::copy(&mut spilled, &mut writer).map_err(|e| {
                    Error::OutputWrite(format!("Failed to write {}: {}", output_path, e))
                })?;
            }
        }

        self.summary.bytes_written += writer.written;
        Ok(())
    }

    /// Record an entry that was left out of the IPA
    pub fn skip_entry(&mut self, file: &VirtualFile) {
        debug!("Skipping {} (outside app root)", file.path);
        self.summary.entries_skipped += 1;
    }

    /// Write the central directory and return the underlying writer
    pub fn finish(self) -> Result<(W, PackageSummary)> {
        let writer = self.zip.finish()?;
        Ok((writer, self.summary))
    }
}

/// Write the app subtree of `store` as an IPA into `writer`
pub fn package<W: Write + Seek>(
    writer: W,
    store: &VirtualFileStore,
    app_root: &str,
    bundle: &AppBundleInfo,
    progress: &dyn ProgressTracker,
) -> Result<(W, PackageSummary)> {
    progress.set_length(store.total_size());
    let mut ipa = IpaWriter::new(writer, progress);

    for file in store {
        let entry_type = file.entry_type();
        let Some(out) = output_path(&file.path, entry_type, app_root, &bundle.app_folder_name)
        else {
            ipa.skip_entry(file);
            continue;
        };

        let main = entry_type == EntryType::Regular
            && is_main_executable(&out, &bundle.executable_name);
        let attrs = entry_attributes(entry_type, file.mode, main, &out);
        ipa.add_entry(file, &out, attrs)?;
    }

    ipa.finish()
}

/// Create the IPA file at `path` and package `store` into it
///
/// A failure part-way leaves a truncated file behind.
pub fn write_ipa(
    path: &Path,
    store: &VirtualFileStore,
    app_root: &str,
    bundle: &AppBundleInfo,
    progress: &dyn ProgressTracker,
) -> Result<PackageSummary> {
    let file = File::create(path).map_err(|e| {
        Error::OutputWrite(format!("Failed to create {}: {}", path.display(), e))
    })?;

    let (mut writer, summary) = package(BufWriter::new(file), store, app_root, bundle, progress)?;
    writer
        .flush()
        .map_err(|e| Error::OutputWrite(format!("Failed to flush {}: {}", path.display(), e)))?;

    info!(
        "Wrote {} ({} entries, {} bytes)",
        path.display(),
        summary.entries_written,
        summary.bytes_written
    );
    Ok(summary)
}
