//! # autocli Error Types
//!
//! File: lib/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the errors produced while discovering command modules
//! and building the command tree. They fall into two classes:
//!
//! - **Fatal** configuration errors (`MissingRoot`, `RootNotDirectory`, `Config`).
//!   These are returned by the factory before any command is registered.
//! - **Per-module** errors (`InvalidName`, `ModuleLoad`, `ModuleContract`,
//!   `ModuleConfigure`, `DuplicateCommand`). These are logged where they occur,
//!   recorded in the `BuildReport`, and never propagated. The offending module is
//!   simply absent from the tree.
//!
//! `Result<T>` is an alias for `anyhow::Result<T>` so module routines can use
//! `?` and `.context(...)` freely. Specific variants are recovered with
//! `downcast_ref::<AutocliError>()`.
//!
//! ## Examples
//!
//! ```rust
//! use autocli::AutocliError;
//!
//! fn check(result: autocli::Result<()>) {
//!     match result {
//!         Err(e) if e.downcast_ref::<AutocliError>().map_or(false, AutocliError::is_fatal) => {
//!             eprintln!("Error: {}", e);
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One of the two routines every command module must expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Configure,
    Execute,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Configure => f.write_str("configure"),
            Capability::Execute => f.write_str("execute"),
        }
    }
}

/// Custom error type for autocli.
#[derive(Error, Debug)]
pub enum AutocliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command root '{}' does not exist.", path.display())]
    MissingRoot { path: PathBuf },

    #[error("Command root '{}' is not a directory.", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("Invalid command file '{path}': {reason}")]
    InvalidName { path: String, reason: String },

    #[error("Error processing module {identifier}: {cause}")]
    ModuleLoad { identifier: String, cause: String },

    #[error("Module {identifier} skipped (missing {}).", join_capabilities(missing))]
    ModuleContract {
        identifier: String,
        missing: Vec<Capability>,
    },

    #[error("Error configuring module {identifier}: {cause}")]
    ModuleConfigure { identifier: String, cause: String },

    #[error("Command '{path}' conflicts with an existing command or group.")]
    DuplicateCommand { path: String },
}

impl AutocliError {
    /// True for errors that abort parser construction instead of skipping one module.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AutocliError::Config(_)
                | AutocliError::MissingRoot { .. }
                | AutocliError::RootNotDirectory { .. }
        )
    }

    /// The module identifier for per-module errors.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            AutocliError::ModuleLoad { identifier, .. }
            | AutocliError::ModuleContract { identifier, .. }
            | AutocliError::ModuleConfigure { identifier, .. } => Some(identifier),
            _ => None,
        }
    }
}

fn join_capabilities(missing: &[Capability]) -> String {
    missing
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Type alias for Result using anyhow::Error.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let missing = AutocliError::MissingRoot {
            path: PathBuf::from("/nope"),
        };
        assert_eq!(missing.to_string(), "Command root '/nope' does not exist.");

        let contract = AutocliError::ModuleContract {
            identifier: "commands::user::add".into(),
            missing: vec![Capability::Configure, Capability::Execute],
        };
        assert_eq!(
            contract.to_string(),
            "Module commands::user::add skipped (missing `configure` and `execute`)."
        );

        let load = AutocliError::ModuleLoad {
            identifier: "commands::report".into(),
            cause: "boom".into(),
        };
        assert_eq!(
            load.to_string(),
            "Error processing module commands::report: boom"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(AutocliError::Config("x".into()).is_fatal());
        assert!(AutocliError::RootNotDirectory {
            path: PathBuf::from("f")
        }
        .is_fatal());
        let configure = AutocliError::ModuleConfigure {
            identifier: "commands::a".into(),
            cause: "bad".into(),
        };
        assert!(!configure.is_fatal());
        assert_eq!(configure.identifier(), Some("commands::a"));

        let per_module = [
            AutocliError::InvalidName {
                path: "__x.rs".into(),
                reason: "empty segment".into(),
            },
            AutocliError::DuplicateCommand {
                path: "user add".into(),
            },
            AutocliError::ModuleContract {
                identifier: "commands::half".into(),
                missing: vec![Capability::Execute],
            },
        ];
        assert!(per_module.iter().all(|e| !e.is_fatal()));
    }
}
