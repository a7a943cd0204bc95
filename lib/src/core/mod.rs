//! # autocli Core Infrastructure
//!
//! File: lib/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by the discovery pipeline and by binaries built
//! on top of it:
//! - `config`: Configuration loading, merging, and validation (`.autocli.toml`)
//! - `error`: The `AutocliError` taxonomy and the crate `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use autocli::core::config; // For loading configuration
//! use autocli::core::error::{AutocliError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
