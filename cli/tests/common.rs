//! # autocli Demo Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests of the `autocli-demo` binary.
//!

// Allow potentially unused code in this common module, as different test files might use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::PathBuf;

/// # Get Demo Command (`demo_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `autocli-demo` binary, with
/// `AUTOCLI_COMMANDS_DIR` and `RUST_LOG` cleared so the ambient environment
/// cannot change which commands are discovered or what is logged.
///
/// ## Panics
/// Panics if the `autocli-demo` binary cannot be found via `Command::cargo_bin`.
pub fn demo_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("autocli-demo").expect("Failed to find autocli-demo binary for testing");
    cmd.env_remove("AUTOCLI_COMMANDS_DIR").env_remove("RUST_LOG");
    cmd
}

/// The demo's own commands directory, as compiled into its registry.
pub fn commands_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("commands")
}
