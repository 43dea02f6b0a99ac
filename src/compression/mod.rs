// src/compression/mod.rs
//! Payload decompression dispatch
//!
//! Selects a streaming decoder for a deb's `data.tar*` member from the
//! member name. Supported formats are gzip, xz, legacy lzma and bzip2, which
//! are the codecs dpkg has historically produced for `data.tar`.

use std::io::{self, Read};
use thiserror::Error;

/// Compression-related errors
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Failed to create {format} decoder: {source}")]
    DecoderCreation {
        format: &'static str,
        source: io::Error,
    },

    #[error("Unsupported compression method: {0}")]
    UnsupportedFormat(String),
}

/// Supported payload compression formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Gzip compression (.gz)
    Gzip,
    /// XZ compression (.xz)
    Xz,
    /// Legacy LZMA-alone compression (.lzma)
    Lzma,
    /// Bzip2 compression (.bzip2)
    Bzip2,
}

impl CompressionFormat {
    /// Select the format from a member name by exact suffix
    ///
    /// # Examples
    /// ```
    /// use deb2ipa::compression::CompressionFormat;
    ///
    /// assert_eq!(CompressionFormat::from_member_name("data.tar.gz").unwrap(), CompressionFormat::Gzip);
    /// assert_eq!(CompressionFormat::from_member_name("data.tar.xz").unwrap(), CompressionFormat::Xz);
    /// assert!(CompressionFormat::from_member_name("data.tar.zst").is_err());
    /// ```
    pub fn from_member_name(name: &str) -> Result<Self, CompressionError> {
        [Self::Gzip, Self::Xz, Self::Lzma, Self::Bzip2]
            .into_iter()
            .find(|format| name.ends_with(format.extension()))
            .ok_or_else(|| CompressionError::UnsupportedFormat(name.to_string()))
    }

    /// Get the member name suffix for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Xz => ".xz",
            Self::Lzma => ".lzma",
            Self::Bzip2 => ".bzip2",
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
            Self::Bzip2 => "bzip2",
        }
    }
}

impl std::fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Create a decompressing reader for the given format
///
/// The returned reader pulls from `reader` incrementally; it never seeks and
/// never buffers the whole member, so it can sit directly on top of a
/// forward-only ar member stream.
pub fn create_decoder<'a, R: Read + 'a>(
    reader: R,
    format: CompressionFormat,
) -> Result<Box<dyn Read + 'a>, CompressionError> {
    match format {
        CompressionFormat::Gzip => Ok(Box::new(flate2::read::GzDecoder::new(reader))),
        CompressionFormat::Xz => Ok(Box::new(xz2::read::XzDecoder::new(reader))),
        CompressionFormat::Lzma => {
            let stream = xz2::stream::Stream::new_lzma_decoder(u64::MAX).map_err(|e| {
                CompressionError::DecoderCreation {
                    format: "lzma",
                    source: io::Error::other(e),
                }
            })?;
            Ok(Box::new(xz2::read::XzDecoder::new_stream(reader, stream)))
        }
        CompressionFormat::Bzip2 => Ok(Box::new(bzip2::read::BzDecoder::new(reader))),
    }
}

/// Open a decoder for a deb member, dispatching on its name
pub fn decoder_for_member<'a, R: Read + 'a>(
    name: &str,
    reader: R,
) -> Result<Box<dyn Read + 'a>, CompressionError> {
    let format = CompressionFormat::from_member_name(name)?;
    create_decoder(reader, format)
}
