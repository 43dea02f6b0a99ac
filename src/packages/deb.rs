// src/packages/deb.rs

//! Debian package container access
//!
//! A .deb is an ar archive whose members are `debian-binary`, a
//! `control.tar*` member and a `data.tar*` member. Only the payload member
//! matters for conversion; it is handed to the caller as a decompressed,
//! forward-only byte stream.

use crate::compression;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Member name prefix of the payload tarball
pub const PAYLOAD_PREFIX: &str = "data.tar";

/// Normalize an ar member identifier
///
/// GNU ar terminates short names with `/`; dpkg-built archives use the
/// common format without it. Both spell the same member.
pub fn member_name(identifier: &[u8]) -> String {
    String::from_utf8_lossy(identifier)
        .trim_end_matches('/')
        .to_string()
}

/// Check whether a member holds the payload tarball
pub fn is_payload_member(name: &str) -> bool {
    name.starts_with(PAYLOAD_PREFIX)
}

/// Open the deb at `path` and run `f` over its decompressed payload stream
///
/// `f` receives the payload member name and a decoder reading the member.
/// The decoder borrows the open archive, so it only lives for the duration
/// of the call.
pub fn with_payload<T, F>(path: &Path, f: F) -> Result<T>
where
    F: for<'a> FnOnce(&'a str, Box<dyn Read + 'a>) -> Result<T>,
{
    let file = File::open(path).map_err(|source| Error::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    with_payload_reader(BufReader::new(file), f)
}

/// Like [`with_payload`], reading the ar container from any forward-only reader
pub fn with_payload_reader<R, T, F>(reader: R, f: F) -> Result<T>
where
    R: Read,
    F: for<'a> FnOnce(&'a str, Box<dyn Read + 'a>) -> Result<T>,
{
    let mut archive = ar::Archive::new(reader);

    while let Some(entry) = archive.next_entry() {
        let entry = entry.map_err(|e| Error::ContainerFormat(e.to_string()))?;
        let name = member_name(entry.header().identifier());

        if !is_payload_member(&name) {
            debug!("Skipping deb member: {}", name);
            continue;
        }

        info!("Found payload member {} ({} bytes)", name, entry.header().size());
        let decoder = compression::decoder_for_member(&name, entry)?;
        return f(&name, decoder);
    }

    Err(Error::MissingPayloadMember)
}
