//! # autocli
//!
//! File: lib/src/lib.rs
//!
//! ## Overview
//!
//! `autocli` builds a nested `clap` command tree from a directory of command
//! modules. The command path of every module is inferred from where its file
//! lives: directory components become groups, and the file name is split on
//! the `__` delimiter into further segments.
//!
//! ```text
//! commands/
//! ├── report.rs             -> report
//! ├── user/add.rs           -> user add
//! ├── user__remove.rs       -> user remove
//! ├── user__db__connect.rs  -> user db connect
//! └── admin/user__list.rs   -> admin user list
//! ```
//!
//! ## Architecture
//!
//! - `discovery::scanner`: enumerates command files under a root directory.
//! - `discovery::naming`: turns a relative path into a `CommandPath` and a module identifier.
//! - `registry`: the startup registry that stands in for dynamic module loading.
//! - `tree`: creates group nodes lazily and hands each module a `GroupHandle`.
//! - `parser`: the root factory and the resulting `CommandParser`.
//! - `codegen`: build-time generation of a registry from a commands directory.
//! - `core`: configuration and error types.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use autocli::{CommandParser, ModuleDescriptor, Registry};
//! use clap::{ArgMatches, Command};
//!
//! fn configure(group: &mut autocli::GroupHandle<'_>, name: &str) -> autocli::Result<()> {
//!     group.add_leaf(Command::new(name.to_owned()).about("Print a report"))?;
//!     Ok(())
//! }
//!
//! fn execute(_matches: &ArgMatches) -> autocli::Result<()> {
//!     println!("report");
//!     Ok(())
//! }
//!
//! let mut registry = Registry::new("commands");
//! registry.register_module(
//!     "report.rs",
//!     ModuleDescriptor::new().with_configure(configure).with_execute(execute),
//! );
//! let parser = CommandParser::from_registry(&registry, Command::new("demo"));
//! parser.run().unwrap();
//! ```
//!
pub mod codegen;
pub mod core;
pub mod discovery;
pub mod parser;
pub mod registry;
pub mod tree;

pub use crate::core::error::{AutocliError, Capability, Result};
pub use discovery::naming::{CommandPath, ResolvedModule, DELIMITER};
pub use discovery::scanner::ScanOptions;
pub use parser::{create_command_parser, BuildReport, CommandParser, ParserOptions};
pub use registry::{ModuleDescriptor, Registry};
pub use tree::{CommandTree, GroupHandle};
