// src/error.rs

//! Error types for the deb2ipa conversion pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::compression::CompressionError;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a conversion
///
/// Every variant is terminal for the run: nothing is retried, and the
/// error propagates to the caller unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open {}: {source}", path.display())]
    InputOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid deb archive: {0}")]
    ContainerFormat(String),

    #[error("data.tar not found in deb")]
    MissingPayloadMember,

    #[error(transparent)]
    Compression(#[from] CompressionError),

    #[error("Tar read error: {0}")]
    TarRead(String),

    #[error("Unsupported app: could not find .app directory inside deb")]
    AppRootNotFound,

    #[error("Spillover I/O error: {0}")]
    SpilloverIo(String),

    #[error("Failed to write IPA: {0}")]
    OutputWrite(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::OutputWrite(err.to_string())
    }
}
