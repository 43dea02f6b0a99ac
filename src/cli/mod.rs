// src/cli/mod.rs
//! CLI definitions for deb2ipa
//!
//! This module contains the command-line interface definition using clap.
//! The conversion itself is driven from the `commands` module.

use clap::Parser;
use std::path::PathBuf;

/// Default RAM ceiling, as accepted by `--memory-limit`
const DEFAULT_MEMORY_LIMIT: &str = "2G";

#[derive(Parser, Debug)]
#[command(name = "deb2ipa")]
#[command(version)]
#[command(about = "Convert jailbreak-style .deb packages into installable .ipa archives", long_about = None)]
pub struct Cli {
    /// Path to the .deb package
    pub input: PathBuf,

    /// Output IPA path (default: input with .deb replaced by .ipa)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// RAM ceiling for file content before spilling to disk (e.g. 512M, 2G)
    #[arg(short, long, value_name = "SIZE", default_value = DEFAULT_MEMORY_LIMIT, value_parser = parse_size)]
    pub memory_limit: u64,

    /// Directory to create the spillover area in (default: system temp dir)
    #[arg(long, value_name = "DIR")]
    pub spill_dir: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse a byte count with an optional binary suffix (K, M, G, T)
pub fn parse_size(value: &str) -> Result<u64, String> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, suffix) = value.split_at(split);

    let number: u64 = digits
        .parse()
        .map_err(|_| format!("invalid size: {:?}", value))?;

    let multiplier: u64 = match suffix.to_ascii_uppercase().trim_end_matches("IB").trim_end_matches('B') {
        "" => 1,
        "K" => 1 << 10,
        "M" => 1 << 20,
        "G" => 1 << 30,
        "T" => 1 << 40,
        _ => return Err(format!("unknown size suffix: {:?}", suffix)),
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size too large: {:?}", value))
}
