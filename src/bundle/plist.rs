// src/bundle/plist.rs

//! Minimal Info.plist reader
//!
//! Reads the top-level `<dict>` of an XML property list as two parallel
//! lists, its direct `<key>` children and its direct `<string>` children,
//! and pairs them by position. Non-string values are not part of either
//! list. That is enough to recover `CFBundleExecutable`,
//! `CFBundleIdentifier` and the bundle version from the descriptors found in
//! jailbreak-style packages.
//!
//! Parsing never fails from the caller's point of view: malformed input
//! yields a `PlistFields` with every field unset.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
enum PlistError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error("no root element")]
    NoRoot,

    #[error("unbalanced elements at end of document")]
    Unbalanced,
}

/// Bundle fields recovered from Info.plist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlistFields {
    /// `CFBundleExecutable`
    pub executable: Option<String>,
    /// `CFBundleIdentifier`
    pub identifier: Option<String>,
    /// `CFBundleVersion` or `CFBundleShortVersionString`, whichever came last
    pub version: Option<String>,
}

impl PlistFields {
    /// Build fields from parallel key and string lists
    ///
    /// The i-th key pairs with the i-th string; whatever is left over in the
    /// longer list is ignored.
    pub fn from_lists(keys: &[String], strings: &[String]) -> Self {
        let mut fields = Self::default();

        for (key, value) in keys.iter().zip(strings) {
            match key.as_str() {
                "CFBundleExecutable" => fields.executable = Some(value.clone()),
                "CFBundleIdentifier" => fields.identifier = Some(value.clone()),
                "CFBundleVersion" | "CFBundleShortVersionString" => {
                    fields.version = Some(value.clone())
                }
                _ => {}
            }
        }

        fields
    }
}

/// Parse Info.plist bytes, returning unset fields on malformed input
pub fn parse_info_plist(data: &[u8]) -> PlistFields {
    match collect_dict_lists(data) {
        Ok((keys, strings)) => {
            debug!("Info.plist: {} keys, {} strings", keys.len(), strings.len());
            PlistFields::from_lists(&keys, &strings)
        }
        Err(e) => {
            warn!("Ignoring unreadable Info.plist: {}", e);
            PlistFields::default()
        }
    }
}

#[derive(Clone, Copy)]
enum Capture {
    Key,
    String,
}

/// Collect the direct `<key>` and `<string>` children of the root's `<dict>`
///
/// Depth 1 is the root element, depth 2 its children, depth 3 the dict's
/// children.
fn collect_dict_lists(data: &[u8]) -> Result<(Vec<String>, Vec<String>), PlistError> {
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();

    let mut keys = Vec::new();
    let mut strings = Vec::new();

    let mut depth = 0usize;
    let mut saw_root = false;
    let mut in_dict = false;
    let mut capture: Option<Capture> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    1 => saw_root = true,
                    2 => in_dict = e.local_name().as_ref() == b"dict",
                    3 if in_dict => {
                        capture = match e.local_name().as_ref() {
                            b"key" => Some(Capture::Key),
                            b"string" => Some(Capture::String),
                            _ => None,
                        };
                        text.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    saw_root = true;
                } else if depth == 2 && in_dict {
                    match e.local_name().as_ref() {
                        b"key" => keys.push(String::new()),
                        b"string" => strings.push(String::new()),
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                if depth == 3 && capture.is_some() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if depth == 3 && capture.is_some() {
                    text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(PlistError::Unbalanced);
                }
                if depth == 3 {
                    match capture.take() {
                        Some(Capture::Key) => keys.push(std::mem::take(&mut text)),
                        Some(Capture::String) => strings.push(std::mem::take(&mut text)),
                        None => {}
                    }
                } else if depth == 2 {
                    in_dict = false;
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(PlistError::NoRoot);
    }
    if depth != 0 {
        return Err(PlistError::Unbalanced);
    }

    Ok((keys, strings))
}
