// src/bundle/mod.rs

//! App bundle detection and metadata
//!
//! Locates the `.app` directory inside a payload and recovers the bundle
//! facts the IPA needs: the folder name, the main executable, and the
//! identifier/version pair for reporting.

pub mod plist;

pub use plist::{parse_info_plist, PlistFields};

/// Marker that ends an app-root prefix
pub const APP_ROOT_MARKER: &str = ".app/";

/// Metadata descriptor file name
pub const INFO_PLIST: &str = "Info.plist";

/// Placeholder for bundle facts that could not be recovered
pub const UNKNOWN: &str = "Unknown";

/// Find the app-root prefix in a payload path
///
/// Returns everything up to and including the first `.app/`, so both
/// `Applications/MyApp.app/` and `./MyApp.app/` layouts are recognized.
///
/// # Examples
/// ```
/// use deb2ipa::bundle::detect_app_root;
///
/// assert_eq!(detect_app_root("./Applications/Foo.app/Info.plist"), Some("./Applications/Foo.app/"));
/// assert_eq!(detect_app_root("usr/bin/foo"), None);
/// ```
pub fn detect_app_root(path: &str) -> Option<&str> {
    path.find(APP_ROOT_MARKER)
        .map(|idx| &path[..idx + APP_ROOT_MARKER.len()])
}

/// Base name of an app-root prefix (`Applications/Foo.app/` -> `Foo.app`)
pub fn app_folder_name(app_root: &str) -> &str {
    let trimmed = app_root.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Remembers the first app-root prefix seen during a pass
#[derive(Debug, Default)]
pub struct AppRootDetector {
    prefix: Option<String>,
}

impl AppRootDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect a path; only the first match is ever recorded
    pub fn observe(&mut self, path: &str) {
        if self.prefix.is_none()
            && let Some(prefix) = detect_app_root(path)
        {
            self.prefix = Some(prefix.to_string());
        }
    }

    pub fn into_prefix(self) -> Option<String> {
        self.prefix
    }
}

/// Facts about the converted app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppBundleInfo {
    /// Main executable name inside the bundle
    pub executable_name: String,
    /// `CFBundleIdentifier`, or `Unknown`
    pub bundle_id: String,
    /// Bundle version, or `Unknown`
    pub version: String,
    /// Bundle folder name, e.g. `MyApp.app`
    pub app_folder_name: String,
}

impl AppBundleInfo {
    /// Resolve bundle facts from the app root and an optional Info.plist
    ///
    /// When no executable name can be read, it falls back to the folder
    /// name without its `.app` suffix.
    pub fn resolve(app_root: &str, info_plist: Option<&[u8]>) -> Self {
        let fields = info_plist.map(parse_info_plist).unwrap_or_default();
        Self::from_fields(app_root, fields)
    }

    /// Build bundle facts from already-parsed plist fields
    pub fn from_fields(app_root: &str, fields: PlistFields) -> Self {
        let app_folder_name = app_folder_name(app_root).to_string();

        let executable_name = match fields.executable {
            Some(name) if !name.is_empty() => name,
            _ => app_folder_name
                .strip_suffix(".app")
                .unwrap_or(&app_folder_name)
                .to_string(),
        };

        Self {
            executable_name,
            bundle_id: fields.identifier.unwrap_or_else(|| UNKNOWN.to_string()),
            version: fields.version.unwrap_or_else(|| UNKNOWN.to_string()),
            app_folder_name,
        }
    }
}
