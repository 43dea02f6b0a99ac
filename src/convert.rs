// src/convert.rs

//! End-to-end deb to IPA conversion
//!
//! Ties the stages together: open the deb, decompress its `data.tar`
//! member, run the single extraction pass, resolve bundle metadata and
//! write the IPA. The spillover area lives exactly as long as one call to
//! [`convert`] and is removed whether the conversion succeeds or fails.

use crate::bundle::AppBundleInfo;
use crate::error::Result;
use crate::extract::{extract_payload, ExtractionStats, DEFAULT_MEMORY_LIMIT};
use crate::filesystem::SpillArea;
use crate::ipa::{write_ipa, PackageSummary};
use crate::packages;
use crate::progress::{ConversionPhase, ProgressTracker};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Options for a single conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// RAM ceiling for in-memory file content, in bytes
    pub memory_limit: u64,
    /// Destination IPA; derived from the input path when unset
    pub output_path: Option<PathBuf>,
    /// Parent directory for the spillover area; system temp dir when unset
    pub spill_root: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
            output_path: None,
            spill_root: None,
        }
    }
}

/// Summary of a finished conversion
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub bundle: AppBundleInfo,
    /// Name of the ar member that held the payload
    pub payload_member: String,
    pub stats: ExtractionStats,
    pub package: PackageSummary,
    pub elapsed: Duration,
}

/// Default IPA path for an input: `.deb` suffix replaced by `.ipa`
///
/// Inputs without a `.deb` suffix keep their full name.
///
/// # Examples
/// ```
/// use deb2ipa::convert::default_output_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(default_output_path(Path::new("/tmp/app.deb")), PathBuf::from("/tmp/app.ipa"));
/// assert_eq!(default_output_path(Path::new("app.bin")), PathBuf::from("app.bin.ipa"));
/// ```
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    if let Some(text) = input.to_str()
        && let Some(stem) = text.strip_suffix(".deb")
    {
        name = stem.into();
    }
    name.push(".ipa");
    PathBuf::from(name)
}

/// Convert the deb at `input` into an IPA
pub fn convert(
    input: &Path,
    options: &ConvertOptions,
    progress: &dyn ProgressTracker,
) -> Result<ConversionReport> {
    let start = Instant::now();
    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(input));

    info!(
        "Converting {} -> {} (memory limit {} bytes)",
        input.display(),
        output_path.display(),
        options.memory_limit
    );

    let mut spill = SpillArea::new(options.spill_root.as_deref())?;

    progress.set_phase(ConversionPhase::OpeningContainer);
    let (payload_member, extraction) = packages::with_payload(input, |member, reader| {
        progress.set_phase(ConversionPhase::Decompressing(member.to_string()));
        progress.set_phase(ConversionPhase::Extracting);
        let extraction = extract_payload(reader, options.memory_limit, &mut spill, progress)?;
        Ok((member.to_string(), extraction))
    })?;

    info!(
        "App root {} ({} spilled to {})",
        extraction.app_root,
        spill.spilled(),
        spill.path().display()
    );

    progress.set_phase(ConversionPhase::ParsingMetadata);
    let bundle = AppBundleInfo::resolve(&extraction.app_root, extraction.info_plist.as_deref());
    info!(
        "Bundle {} ({}), version {}, executable {}",
        bundle.app_folder_name, bundle.bundle_id, bundle.version, bundle.executable_name
    );

    progress.set_phase(ConversionPhase::Packaging);
    let package = write_ipa(
        &output_path,
        &extraction.store,
        &extraction.app_root,
        &bundle,
        progress,
    )?;

    let stats = extraction.stats;
    if let Err(e) = spill.close() {
        warn!("{}", e);
    }

    Ok(ConversionReport {
        output_path,
        bundle,
        payload_member,
        stats,
        package,
        elapsed: start.elapsed(),
    })
}
