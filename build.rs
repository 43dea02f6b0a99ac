// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("deb2ipa")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert jailbreak-style .deb packages into installable .ipa archives")
        .arg(
            Arg::new("input")
                .required(true)
                .value_name("INPUT")
                .help("Path to the .deb package"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Output IPA path (default: input with .deb replaced by .ipa)"),
        )
        .arg(
            Arg::new("memory_limit")
                .short('m')
                .long("memory-limit")
                .value_name("SIZE")
                .default_value("2G")
                .help("RAM ceiling for file content before spilling to disk (e.g. 512M, 2G)"),
        )
        .arg(
            Arg::new("spill_dir")
                .long("spill-dir")
                .value_name("DIR")
                .help("Directory to create the spillover area in (default: system temp dir)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress progress output"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("deb2ipa.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
