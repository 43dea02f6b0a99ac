// tests/common/mod.rs

//! Shared helpers for building .deb fixtures in integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

/// Payload compression used when building a fixture
#[derive(Debug, Clone, Copy)]
pub enum Payload {
    Gzip,
    Xz,
    Lzma,
    Bzip2,
}

impl Payload {
    pub const ALL: [Payload; 4] = [Payload::Gzip, Payload::Xz, Payload::Lzma, Payload::Bzip2];

    /// ar member name carrying this payload
    pub fn member_name(self) -> &'static str {
        match self {
            Payload::Gzip => "data.tar.gz",
            Payload::Xz => "data.tar.xz",
            Payload::Lzma => "data.tar.lzma",
            Payload::Bzip2 => "data.tar.bzip2",
        }
    }

    pub fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Payload::Gzip => {
                let mut encoder =
                    flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            Payload::Xz => {
                let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            Payload::Lzma => {
                let options = xz2::stream::LzmaOptions::new_preset(6).unwrap();
                let stream = xz2::stream::Stream::new_lzma_encoder(&options).unwrap();
                let mut encoder = xz2::write::XzEncoder::new_stream(Vec::new(), stream);
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            Payload::Bzip2 => {
                let mut encoder =
                    bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
        }
    }
}

/// Kind and content of a tar fixture entry
#[derive(Debug, Clone)]
pub enum Kind {
    Dir,
    File(Vec<u8>),
    Symlink(String),
    Hardlink(String),
}

/// One entry of a payload tarball
#[derive(Debug, Clone)]
pub struct TarEntry {
    pub path: String,
    pub kind: Kind,
    pub mode: u32,
    pub mtime: u64,
}

pub fn dir(path: &str, mode: u32) -> TarEntry {
    TarEntry {
        path: path.to_string(),
        kind: Kind::Dir,
        mode,
        mtime: 1_600_000_000,
    }
}

pub fn file(path: &str, mode: u32, content: &[u8]) -> TarEntry {
    TarEntry {
        path: path.to_string(),
        kind: Kind::File(content.to_vec()),
        mode,
        mtime: 1_600_000_000,
    }
}

pub fn symlink(path: &str, target: &str) -> TarEntry {
    TarEntry {
        path: path.to_string(),
        kind: Kind::Symlink(target.to_string()),
        mode: 0o777,
        mtime: 1_600_000_000,
    }
}

pub fn hardlink(path: &str, target: &str) -> TarEntry {
    TarEntry {
        path: path.to_string(),
        kind: Kind::Hardlink(target.to_string()),
        mode: 0o644,
        mtime: 1_600_000_000,
    }
}

/// Build a tarball, keeping entry names byte-for-byte (including `./`)
pub fn build_tar(entries: &[TarEntry]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    for entry in entries {
        let mut header = tar::Header::new_gnu();
        let name = entry.path.as_bytes();
        assert!(name.len() < 100, "fixture path too long: {}", entry.path);
        header.as_old_mut().name[..name.len()].copy_from_slice(name);
        header.set_mode(entry.mode);
        header.set_mtime(entry.mtime);

        let body: &[u8] = match &entry.kind {
            Kind::Dir => {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                &[]
            }
            Kind::File(content) => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_size(content.len() as u64);
                content
            }
            Kind::Symlink(target) => {
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_link_name(target).unwrap();
                header.set_size(0);
                &[]
            }
            Kind::Hardlink(target) => {
                header.set_entry_type(tar::EntryType::Link);
                header.set_link_name(target).unwrap();
                header.set_size(0);
                &[]
            }
        };

        header.set_cksum();
        builder.append(&header, body).unwrap();
    }

    builder.into_inner().unwrap()
}

/// Build an ar container from (member name, bytes) pairs
pub fn build_ar(members: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut builder = ar::Builder::new(Vec::new());
    for (name, data) in members {
        let header = ar::Header::new(name.as_bytes().to_vec(), data.len() as u64);
        builder.append(&header, data.as_slice()).unwrap();
    }
    builder.into_inner().unwrap()
}

/// Build a complete .deb with the given payload entries
pub fn build_deb(entries: &[TarEntry], payload: Payload) -> Vec<u8> {
    let data = payload.compress(&build_tar(entries));
    let control = Payload::Gzip.compress(&build_tar(&[file("./control", 0o644, b"Package: test\n")]));

    build_ar(&[
        ("debian-binary", b"2.0\n".to_vec()),
        ("control.tar.gz", control),
        (payload.member_name(), data),
    ])
}

/// Write a .deb fixture into `dir` and return its path
pub fn write_deb(dir: &Path, name: &str, entries: &[TarEntry], payload: Payload) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_deb(entries, payload)).unwrap();
    path
}

pub fn info_plist(executable: &str, identifier: &str, version: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleExecutable</key>
	<string>{}</string>
	<key>CFBundleIdentifier</key>
	<string>{}</string>
	<key>CFBundleShortVersionString</key>
	<string>{}</string>
</dict>
</plist>
"#,
        executable, identifier, version
    )
    .into_bytes()
}

/// Typical jailbreak app layout with files outside the bundle
pub fn sample_app() -> Vec<TarEntry> {
    vec![
        dir("./", 0o755),
        dir("./Applications/", 0o755),
        dir("./Applications/Foo.app/", 0o755),
        file(
            "./Applications/Foo.app/Info.plist",
            0o644,
            &info_plist("Foo", "com.example.foo", "1.0"),
        ),
        file("./Applications/Foo.app/Foo", 0o644, b"\xcf\xfa\xed\xfemain binary"),
        file("./Applications/Foo.app/lib.dylib", 0o644, b"\xcf\xfa\xed\xfedylib"),
        dir("./Library/", 0o755),
        file("./Library/tweak.plist", 0o644, b"<plist/>"),
    ]
}
