// src/commands/convert.rs

//! Convert command - turn a .deb into an .ipa

use super::progress::ConversionProgress;
use anyhow::{Context, Result};
use deb2ipa::progress::ProgressTracker;
use deb2ipa::{convert, ConvertOptions};
use std::path::{Path, PathBuf};
use tracing::info;

/// Convert a deb package to an IPA
///
/// # Arguments
/// * `input` - Path to the .deb package
/// * `output` - Optional output path (None = input with .ipa extension)
/// * `memory_limit` - RAM ceiling in bytes before file content spills to disk
/// * `spill_dir` - Optional parent directory for the spillover area
/// * `quiet` - Suppress progress and summary output
pub fn cmd_convert(
    input: &Path,
    output: Option<PathBuf>,
    memory_limit: u64,
    spill_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let options = ConvertOptions {
        memory_limit,
        output_path: output,
        spill_root: spill_dir,
    };

    let progress = if quiet {
        ConversionProgress::hidden()
    } else {
        ConversionProgress::new()
    };

    let report = match convert(input, &options, &progress) {
        Ok(report) => report,
        Err(e) => {
            progress.finish_with_error("Conversion failed");
            return Err(e)
                .with_context(|| format!("Failed to convert {}", input.display()));
        }
    };

    progress.finish_with_message("Done");
    info!(
        "Converted {} in {:.2}s",
        input.display(),
        report.elapsed.as_secs_f64()
    );

    if !quiet {
        println!();
        println!("Success! Created {}", report.output_path.display());
        println!("  Name:       {}", report.bundle.app_folder_name);
        println!("  Bundle ID:  {}", report.bundle.bundle_id);
        println!("  Version:    {}", report.bundle.version);
        println!("  Executable: {}", report.bundle.executable_name);
        println!(
            "  Entries:    {} written, {} outside the app",
            report.package.entries_written, report.package.entries_skipped
        );
        if report.package.duplicates_skipped > 0 {
            println!(
                "  Duplicates: {} repeated path(s) dropped",
                report.package.duplicates_skipped
            );
        }
        println!("  Elapsed:    {:.2}s", report.elapsed.as_secs_f64());
        if report.stats.files_spilled > 0 {
            println!(
                "  Spilled:    {} file(s) exceeded the memory limit",
                report.stats.files_spilled
            );
        }
    }

    Ok(())
}
