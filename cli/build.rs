//! # autocli Demo Build Script
//!
//! File: cli/build.rs
//!
//! Scans `src/commands/` and generates the command registry into
//! `$OUT_DIR/commands.rs`, which `main.rs` includes.
//!
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let commands_dir = manifest_dir.join("src").join("commands");

    autocli::codegen::write_registry(&commands_dir, "commands", &out_dir.join("commands.rs"))?;

    println!("cargo:rerun-if-changed={}", commands_dir.display());
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
