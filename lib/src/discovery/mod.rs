//! # autocli Discovery
//!
//! File: lib/src/discovery/mod.rs
//!
//! ## Overview
//!
//! Discovery turns a directory of command files into resolved modules:
//!
//! - **`scanner`**: Walks the commands directory and yields relative paths of
//!   command-bearing files (skipping package markers such as `mod.rs`).
//! - **`naming`**: Converts each relative path into a `CommandPath` (directory
//!   segments followed by the `__`-split file stem) and a module identifier
//!   (`commands::admin::user__list`).
//!
//! Both are pure transforms. Loading and tree construction live in
//! `crate::registry` and `crate::tree`.
//!
pub mod naming;
pub mod scanner;
