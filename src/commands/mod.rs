// src/commands/mod.rs
//! Command handlers for the deb2ipa CLI

mod convert;
pub mod progress;

pub use convert::cmd_convert;
