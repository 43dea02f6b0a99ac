// src/commands/progress.rs
//! Terminal progress display for conversions
//!
//! Prints one line per conversion phase and keeps a live status line below
//! it: a spinner while the payload is scanned, then a byte bar while the IPA
//! is written.

use deb2ipa::progress::{ConversionPhase, ProgressTracker};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} {msg}";
const BYTES_TEMPLATE: &str =
    "  {msg} [{bar:40.green/dim}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// indicatif-backed progress tracker for the CLI
pub struct ConversionProgress {
    bar: ProgressBar,
}

impl ConversionProgress {
    /// Create a visible tracker starting as a spinner
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Create a tracker that draws nothing (`--quiet`)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for ConversionProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bytes_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BYTES_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

impl ProgressTracker for ConversionProgress {
    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    fn set_length(&self, length: u64) {
        self.bar.set_style(bytes_style());
        self.bar.set_length(length);
        self.bar.set_position(0);
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn length(&self) -> u64 {
        self.bar.length().unwrap_or(0)
    }

    fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn finish_with_error(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }

    fn set_phase(&self, phase: ConversionPhase) {
        self.bar.println(format!(
            "[{}/{}] {}...",
            phase.step(),
            ConversionPhase::COUNT,
            phase
        ));
        self.bar.set_message(phase.to_string());
    }
}
