// src/ipa/attributes.rs

//! Unix type and permission bits for IPA entries
//!
//! iOS install and signing tools read each zip entry's Unix mode from the
//! high 16 bits of the external attributes field. Packages often ship the
//! main binary as 0644, so executables are forced to 0755 here; symlinks
//! must carry `S_IFLNK` or they are unpacked as plain files.
//!
//! Everything in this module is pure: it only looks at the entry kind, its
//! source mode and its output path.

use crate::filesystem::EntryType;

/// File type bits for a symbolic link
pub const S_IFLNK: u32 = 0xA000;
/// File type bits for a directory
pub const S_IFDIR: u32 = 0x4000;
/// File type bits for a regular file
pub const S_IFREG: u32 = 0x8000;

/// Permission bits kept from the source mode
pub const PERMISSION_MASK: u32 = 0o777;

/// Zip root folder for app bundles
pub const PAYLOAD_DIR: &str = "Payload";

/// Zip storage method for an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMethod {
    /// Uncompressed
    Stored,
    Deflated,
}

/// Type bits, permission bits and storage method of one zip entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAttributes {
    pub type_bits: u32,
    pub permissions: u32,
    pub method: StorageMethod,
}

impl EntryAttributes {
    /// Full Unix mode (`type | permissions`)
    pub fn unix_mode(&self) -> u32 {
        self.type_bits | self.permissions
    }

    /// Value of the zip external attributes field
    pub fn external_attributes(&self) -> u32 {
        self.unix_mode() << 16
    }
}

/// Check whether a regular file must be executable regardless of its mode
///
/// Dynamic libraries and anything under a `bin` directory are forced to
/// 0755 alongside the main executable.
pub fn is_forced_executable(output_path: &str) -> bool {
    output_path.ends_with(".dylib") || output_path.contains("/bin/")
}

/// Check whether an output path names the bundle's main executable
///
/// Compares the base name only, so every file sharing the executable's
/// name is treated as the main executable.
pub fn is_main_executable(output_path: &str, executable_name: &str) -> bool {
    base_name(output_path) == executable_name
}

/// Derive the zip attributes of an entry
///
/// `source_mode` is the raw mode from the tar header; only its permission
/// bits are used, and zero means "unspecified".
pub fn entry_attributes(
    entry_type: EntryType,
    source_mode: u32,
    is_main_executable: bool,
    output_path: &str,
) -> EntryAttributes {
    let source = source_mode & PERMISSION_MASK;

    match entry_type {
        EntryType::Symlink => EntryAttributes {
            type_bits: S_IFLNK,
            permissions: 0o777,
            method: StorageMethod::Stored,
        },
        EntryType::Directory => EntryAttributes {
            type_bits: S_IFDIR,
            permissions: if source == 0 { 0o755 } else { source },
            method: StorageMethod::Stored,
        },
        EntryType::Regular if is_main_executable => EntryAttributes {
            type_bits: S_IFREG,
            permissions: 0o755,
            method: StorageMethod::Stored,
        },
        EntryType::Regular if is_forced_executable(output_path) => EntryAttributes {
            type_bits: S_IFREG,
            permissions: 0o755,
            method: StorageMethod::Deflated,
        },
        EntryType::Regular => EntryAttributes {
            type_bits: S_IFREG,
            permissions: if source == 0 { 0o644 } else { source },
            method: StorageMethod::Deflated,
        },
    }
}

/// Map a payload path to its location inside the IPA
///
/// Returns `None` for entries outside the app root. The app root itself maps
/// to `Payload/<App>.app/`; directories always end with `/`. Empty, `.` and
/// `..` segments are resolved as in a lexically cleaned path join.
///
/// # Examples
/// ```
/// use deb2ipa::filesystem::EntryType;
/// use deb2ipa::ipa::attributes::output_path;
///
/// assert_eq!(
///     output_path("Applications/Foo.app/Info.plist", EntryType::Regular, "Applications/Foo.app/", "Foo.app").as_deref(),
///     Some("Payload/Foo.app/Info.plist")
/// );
/// assert_eq!(output_path("usr/bin/foo", EntryType::Regular, "Applications/Foo.app/", "Foo.app"), None);
/// ```
pub fn output_path(
    path: &str,
    entry_type: EntryType,
    app_root: &str,
    app_folder_name: &str,
) -> Option<String> {
    let relative = path.strip_prefix(app_root)?;

    let mut segments = vec![PAYLOAD_DIR];
    for segment in app_folder_name.split('/').chain(relative.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let mut joined = segments.join("/");
    if entry_type == EntryType::Directory {
        joined.push('/');
    }
    Some(joined)
}

/// Last path segment, ignoring trailing slashes
fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
