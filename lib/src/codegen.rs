//! # autocli Registry Code Generation
//!
//! File: lib/src/codegen.rs
//!
//! ## Overview
//!
//! Generates the Rust source of a [`Registry`](crate::Registry) from a commands
//! directory, for use in a `build.rs`. The generated file declares one module
//! per command file (via `#[path]`) and a `registry()` function registering
//! each of them under its relative path.
//!
//! The command module contract is checked textually: a file without
//! `pub fn configure` or `pub fn execute` is still registered, minus that
//! capability, so the runtime contract check reports and skips it like any other
//! incomplete module instead of the build failing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! // build.rs
//! fn main() -> anyhow::Result<()> {
//!     let manifest_dir = std::path::PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
//!     let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR")?);
//!     let commands_dir = manifest_dir.join("src").join("commands");
//!     autocli::codegen::write_registry(&commands_dir, "commands", &out_dir.join("commands.rs"))?;
//!     println!("cargo:rerun-if-changed={}", commands_dir.display());
//!     Ok(())
//! }
//! ```
//!
//! ```rust,ignore
//! // main.rs
//! mod commands {
//!     include!(concat!(env!("OUT_DIR"), "/commands.rs"));
//! }
//! let registry = commands::registry();
//! ```
//!
use crate::core::error::{AutocliError, Result};
use crate::discovery::naming;
use crate::discovery::scanner::{self, ScanOptions};
use anyhow::Context;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A command file found while generating, with the capabilities it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub relative_path: PathBuf,
    pub identifier: String,
    pub has_configure: bool,
    pub has_execute: bool,
}

/// # Collect Modules (`collect_modules`)
///
/// Scans `commands_dir` with the default scan options and inspects every
/// command file. Files whose names cannot be resolved are left out with a
/// warning.
pub fn collect_modules(commands_dir: &Path, package: &str) -> Result<Vec<GeneratedModule>> {
    let mut modules = Vec::new();
    for relative in scanner::scan(commands_dir, &ScanOptions::default())? {
        let identifier = match naming::resolve(&relative, package) {
            Ok(resolved) => resolved.identifier,
            Err(e) => {
                warn!("Not generating a module for '{}': {}", relative.display(), e);
                continue;
            }
        };
        let source_path = commands_dir.join(&relative);
        let source = fs::read_to_string(&source_path)
            .with_context(|| format!("Failed to read command file: {}", source_path.display()))?;
        modules.push(GeneratedModule {
            has_configure: declares_fn(&source, "configure"),
            has_execute: declares_fn(&source, "execute"),
            relative_path: relative,
            identifier,
        });
    }
    Ok(modules)
}

/// True when a line declares `pub fn NAME(` or `pub fn NAME<` (generic parameters).
fn declares_fn(source: &str, name: &str) -> bool {
    let prefix = format!("pub fn {}", name);
    source.lines().map(str::trim_start).any(|line| {
        line.strip_prefix(&prefix)
            .map_or(false, |rest| rest.starts_with('(') || rest.starts_with('<'))
    })
}

/// # Generate Registry Source (`generate_registry`)
///
/// Returns Rust source defining `pub fn registry() -> ::autocli::Registry` for
/// every command file under `commands_dir`.
pub fn generate_registry(commands_dir: &Path, package: &str) -> Result<String> {
    let commands_dir = commands_dir
        .canonicalize()
        .map_err(|_| AutocliError::MissingRoot {
            path: commands_dir.to_path_buf(),
        })?;
    let modules = collect_modules(&commands_dir, package)?;
    render(&commands_dir, package, &modules)
}

fn render(commands_dir: &Path, package: &str, modules: &[GeneratedModule]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "// @generated by autocli::codegen from {:?}. Do not edit.", commands_dir.display().to_string())?;
    writeln!(out)?;
    for (index, module) in modules.iter().enumerate() {
        let source_path = commands_dir.join(&module.relative_path);
        writeln!(out, "// {}", module.identifier)?;
        writeln!(out, "#[path = {:?}]", source_path.display().to_string())?;
        writeln!(out, "mod module_{};", index)?;
    }
    writeln!(out)?;
    writeln!(out, "/// Every command module found in the commands directory at build time.")?;
    writeln!(out, "pub fn registry() -> ::autocli::Registry {{")?;
    writeln!(out, "    #[allow(unused_mut)]")?;
    writeln!(out, "    let mut registry = ::autocli::Registry::new({:?});", package)?;
    for (index, module) in modules.iter().enumerate() {
        let mut descriptor = String::from("::autocli::ModuleDescriptor::new()");
        if module.has_configure {
            write!(descriptor, ".with_configure(module_{}::configure)", index)?;
        }
        if module.has_execute {
            write!(descriptor, ".with_execute(module_{}::execute)", index)?;
        }
        let relative = module
            .relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        writeln!(out, "    registry.register_module({:?}, {});", relative, descriptor)?;
    }
    writeln!(out, "    registry")?;
    writeln!(out, "}}")?;
    debug!("Generated registry source for {} module(s)", modules.len());
    Ok(out)
}

/// # Write Registry (`write_registry`)
///
/// Generates the registry source and writes it to `out_file`, leaving the file
/// untouched when the content is unchanged.
pub fn write_registry(commands_dir: &Path, package: &str, out_file: &Path) -> Result<()> {
    let source = generate_registry(commands_dir, package)?;
    if fs::read_to_string(out_file).ok().as_deref() == Some(source.as_str()) {
        debug!("Registry source at {} is up to date", out_file.display());
        return Ok(());
    }
    if let Some(parent) = out_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(out_file, source)
        .with_context(|| format!("Failed to write registry source: {}", out_file.display()))?;
    info!("Wrote registry source to {}", out_file.display());
    Ok(())
}
