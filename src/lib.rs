// src/lib.rs

//! deb2ipa
//!
//! Converts jailbreak-style Debian packages into iOS application archives.
//!
//! # Architecture
//!
//! - Streaming: the deb is read once, front to back, with no second pass
//! - Bounded memory: file content is held in RAM under a ceiling and spilled
//!   to a scoped temporary directory beyond it
//! - Ordered output: IPA entries appear in the same order as in the payload
//! - Faithful modes: Unix file types and permissions are carried in each zip
//!   entry's external attributes

pub mod bundle;
pub mod compression;
pub mod convert;
mod error;
pub mod extract;
pub mod filesystem;
pub mod ipa;
pub mod packages;
pub mod progress;

pub use bundle::AppBundleInfo;
pub use compression::{CompressionError, CompressionFormat};
pub use convert::{convert, default_output_path, ConversionReport, ConvertOptions};
pub use error::{Error, Result};
pub use extract::{ExtractionStats, DEFAULT_MEMORY_LIMIT};
pub use progress::{
    CallbackProgress, ConversionPhase, ProgressEvent, ProgressTracker, SilentProgress,
};
