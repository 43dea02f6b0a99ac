// src/packages/mod.rs

//! Package container support
//!
//! Currently only Debian .deb containers are read; the payload tarball is
//! exposed as a decompressed stream for the extraction pass.

pub mod deb;

pub use deb::{with_payload, with_payload_reader};
