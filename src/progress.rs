// src/progress.rs

//! Progress reporting for conversions
//!
//! The library never prints. Each pipeline stage reports through a
//! `ProgressTracker`: the binary renders indicatif bars, while library
//! callers pick `SilentProgress` or forward events with `CallbackProgress`.
//!
//! # Example
//!
//! ```ignore
//! use deb2ipa::progress::{CallbackProgress, ProgressEvent};
//!
//! let progress = CallbackProgress::new(0, |event| {
//!     if let ProgressEvent::Message(m) = event {
//!         eprintln!("{m}");
//!     }
//! });
//! deb2ipa::convert(&deb, &options, &progress)?;
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Stages of a conversion, in the order they run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionPhase {
    /// Reading the outer ar container
    OpeningContainer,
    /// Found the payload member and started its decoder
    Decompressing(String),
    /// Walking the tar stream and classifying entries
    Extracting,
    /// Reading Info.plist
    ParsingMetadata,
    /// Writing the IPA
    Packaging,
}

impl ConversionPhase {
    /// Number of phases in a conversion
    pub const COUNT: u8 = 5;

    /// One-based position of this phase
    pub fn step(&self) -> u8 {
        match self {
            Self::OpeningContainer => 1,
            Self::Decompressing(_) => 2,
            Self::Extracting => 3,
            Self::ParsingMetadata => 4,
            Self::Packaging => 5,
        }
    }
}

impl std::fmt::Display for ConversionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpeningContainer => write!(f, "Opening deb archive"),
            Self::Decompressing(member) => write!(f, "Found {}, decompressing", member),
            Self::Extracting => write!(f, "Extracting and analyzing files"),
            Self::ParsingMetadata => write!(f, "Parsing app metadata"),
            Self::Packaging => write!(f, "Zipping payload"),
        }
    }
}

/// Sink for pipeline progress
///
/// Trackers are shared by reference across stages, hence `Send + Sync`.
/// Positions and lengths count payload bytes written to the IPA.
pub trait ProgressTracker: Send + Sync {
    /// Replace the status line
    fn set_message(&self, message: &str);

    /// Advance by `amount` bytes
    fn increment(&self, amount: u64);

    /// Set the byte total for the current phase
    fn set_length(&self, length: u64);

    fn position(&self) -> u64;

    fn length(&self) -> u64;

    /// The conversion succeeded
    fn finish_with_message(&self, message: &str);

    /// The conversion was abandoned
    fn finish_with_error(&self, message: &str);

    /// Announce the next phase
    fn set_phase(&self, phase: ConversionPhase) {
        self.set_message(&phase.to_string());
    }
}

/// Counts bytes and reports nothing
#[derive(Debug, Default)]
pub struct SilentProgress {
    position: AtomicU64,
    length: AtomicU64,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressTracker for SilentProgress {
    fn set_message(&self, _message: &str) {}

    fn increment(&self, amount: u64) {
        self.position.fetch_add(amount, Ordering::Relaxed);
    }

    fn set_length(&self, length: u64) {
        self.length.store(length, Ordering::Relaxed);
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn length(&self) -> u64 {
        self.length.load(Ordering::Relaxed)
    }

    fn finish_with_message(&self, _message: &str) {}

    fn finish_with_error(&self, _message: &str) {}
}

/// What a `CallbackProgress` hands to its closure
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// New status line, including phase changes
    Message(String),
    /// Bytes written so far out of `total`
    Position { current: u64, total: u64 },
    /// Conversion succeeded
    Finished(String),
    /// Conversion failed
    Error(String),
}

/// Forwards every update to a closure
pub struct CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    callback: F,
    position: AtomicU64,
    length: AtomicU64,
}

impl<F> CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    /// `length` is the initial byte total; the packager resets it
    pub fn new(length: u64, callback: F) -> Self {
        Self {
            callback,
            position: AtomicU64::new(0),
            length: AtomicU64::new(length),
        }
    }
}

impl<F> ProgressTracker for CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn set_message(&self, message: &str) {
        (self.callback)(ProgressEvent::Message(message.to_string()));
    }

    fn increment(&self, amount: u64) {
        let current = self.position.fetch_add(amount, Ordering::Relaxed) + amount;
        (self.callback)(ProgressEvent::Position {
            current,
            total: self.length.load(Ordering::Relaxed),
        });
    }

    fn set_length(&self, length: u64) {
        self.length.store(length, Ordering::Relaxed);
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn length(&self) -> u64 {
        self.length.load(Ordering::Relaxed)
    }

    fn finish_with_message(&self, message: &str) {
        (self.callback)(ProgressEvent::Finished(message.to_string()));
    }

    fn finish_with_error(&self, message: &str) {
        (self.callback)(ProgressEvent::Error(message.to_string()));
    }
}
