//! # autocli Parser Factory
//!
//! File: lib/src/parser.rs
//!
//! ## Overview
//!
//! The root factory ties the pipeline together: scan → resolve → load →
//! register. It returns a [`CommandParser`] holding the finished `clap::Command`
//! and the execute handler bound to every leaf.
//!
//! Two discovery sources feed the same pipeline:
//! - [`create_command_parser`] scans a commands directory on disk.
//! - [`CommandParser::from_registry`] replays the relative paths recorded in the
//!   registry, for binaries whose command sources are not present at runtime.
//!
//! Only a missing or non-directory commands root is fatal. Every per-module
//! failure is logged, recorded in the [`BuildReport`], and skipped.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use autocli::{create_command_parser, ParserOptions, Registry, ScanOptions};
//! use std::path::Path;
//!
//! # fn run(registry: Registry) -> autocli::Result<()> {
//! let options = ParserOptions {
//!     name: Some("myapp".into()),
//!     about: Some("My application".into()),
//!     ..Default::default()
//! };
//! let parser = create_command_parser(Path::new("src/commands"), &registry, &ScanOptions::default(), options)?;
//! parser.run()
//! # }
//! ```
//!
use crate::core::error::{AutocliError, Result};
use crate::discovery::naming::{self, CommandPath, ResolvedModule};
use crate::discovery::scanner::{self, ScanOptions};
use crate::registry::Registry;
use crate::tree::{CommandTree, HandlerMap, TreeBuilder};
use anyhow::Context;
use clap::{ArgMatches, Command};
use serde::Deserialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Options forwarded verbatim to the root `clap::Command`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ParserOptions {
    /// Program name shown in usage lines.
    pub name: Option<String>,
    pub about: Option<String>,
    pub long_about: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
}

impl ParserOptions {
    /// Applies every option that is set on top of `command`.
    pub fn apply(&self, mut command: Command) -> Command {
        if let Some(name) = &self.name {
            command = command.name(name.clone());
        }
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }
        if let Some(long_about) = &self.long_about {
            command = command.long_about(long_about.clone());
        }
        if let Some(version) = &self.version {
            command = command.version(version.clone());
        }
        if let Some(author) = &self.author {
            command = command.author(author.clone());
        }
        command
    }
}

impl From<ParserOptions> for Command {
    fn from(options: ParserOptions) -> Self {
        options.apply(Command::new("autocli"))
    }
}

/// # Build Report (`BuildReport`)
///
/// Per-module outcomes of one construction pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    discovered: usize,
    registered: Vec<ResolvedModule>,
    skipped: Vec<AutocliError>,
}

impl BuildReport {
    /// Number of command files seen by discovery.
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    pub fn registered(&self) -> &[ResolvedModule] {
        &self.registered
    }

    /// Errors for every module that did not make it into the tree.
    pub fn skipped(&self) -> &[AutocliError] {
        &self.skipped
    }

    /// True when every discovered module was registered.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, err: AutocliError) {
        match err {
            AutocliError::ModuleLoad { .. } | AutocliError::ModuleConfigure { .. } => {
                error!("{}", err)
            }
            _ => warn!("{}", err),
        }
        self.skipped.push(err);
    }
}

/// # Command Parser (`CommandParser`)
///
/// A fully wired parser: the nested root command plus the execute handler of
/// every leaf.
pub struct CommandParser {
    command: Command,
    tree: CommandTree,
    handlers: HandlerMap,
    report: BuildReport,
}

impl CommandParser {
    /// # Build From Registry (`from_registry`)
    ///
    /// Runs the pipeline over the relative paths recorded in `registry` instead
    /// of scanning a directory. Never fails; skipped modules are in the report.
    pub fn from_registry(registry: &Registry, root: impl Into<Command>) -> Self {
        let paths: Vec<PathBuf> = registry.entries().map(Path::to_path_buf).collect();
        build(paths, registry, root.into())
    }

    /// Runs the pipeline over `paths` (relative to the commands directory) in
    /// the order given.
    pub fn from_paths<I>(paths: I, registry: &Registry, root: impl Into<Command>) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        build(paths, registry, root.into())
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn into_command(self) -> Command {
        self.command
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Paths of every invocable leaf, sorted.
    pub fn leaves(&self) -> impl Iterator<Item = &CommandPath> + '_ {
        self.tree.leaves()
    }

    pub fn try_get_matches_from<I, T>(&self, args: I) -> std::result::Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.command.clone().try_get_matches_from(args)
    }

    /// # Dispatch (`dispatch`)
    ///
    /// Follows the chain of selected subcommands in `matches` down to the leaf
    /// and calls that leaf's execute routine with the leaf's own matches.
    pub fn dispatch(&self, matches: &ArgMatches) -> Result<()> {
        let mut segments = Vec::new();
        let mut current = matches;
        while let Some((name, sub_matches)) = current.subcommand() {
            segments.push(name.to_string());
            current = sub_matches;
        }
        match self.handlers.get(&segments) {
            Some(execute) => {
                debug!("Dispatching to '{}'", segments.join(" "));
                execute(current)
            }
            None => anyhow::bail!("No command is registered for '{}'", segments.join(" ")),
        }
    }

    /// Parses `args` (program name first) and dispatches to the selected leaf.
    pub fn run_from<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.try_get_matches_from(args)?;
        self.dispatch(&matches)
    }

    /// Parses the process arguments, exiting with clap's usage error on failure.
    pub fn get_matches(&self) -> ArgMatches {
        self.command.clone().get_matches()
    }

    /// Parses the process arguments and dispatches to the selected leaf.
    pub fn run(&self) -> Result<()> {
        let matches = self.get_matches();
        self.dispatch(&matches)
    }
}

impl fmt::Debug for CommandParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandParser")
            .field("name", &self.command.get_name())
            .field("tree", &self.tree)
            .field("report", &self.report)
            .finish()
    }
}

/// # Create Command Parser (`create_command_parser`)
///
/// Scans `root_dir` for command files, loads each from `registry`, and builds
/// the command tree under `root`.
///
/// ## Returns
///
/// * `Ok(CommandParser)`: possibly with fewer commands than files discovered.
/// * `Err`: only when `root_dir` is missing or not a directory
///   (`AutocliError::MissingRoot` / `AutocliError::RootNotDirectory`).
pub fn create_command_parser(
    root_dir: &Path,
    registry: &Registry,
    options: &ScanOptions,
    root: impl Into<Command>,
) -> Result<CommandParser> {
    let scan = scanner::scan(root_dir, options)
        .with_context(|| format!("Failed to scan commands directory '{}'", root_dir.display()))?;
    Ok(build(scan, registry, root.into()))
}

fn build<I>(paths: I, registry: &Registry, root: Command) -> CommandParser
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut builder = TreeBuilder::new(root);
    let mut report = BuildReport::default();

    for relative in paths {
        report.discovered += 1;
        let resolved = match naming::resolve(&relative, registry.package()) {
            Ok(resolved) => resolved,
            Err(e) => {
                report.skip(e.downcast::<AutocliError>().unwrap_or_else(|e| {
                    AutocliError::InvalidName {
                        path: relative.display().to_string(),
                        reason: e.to_string(),
                    }
                }));
                continue;
            }
        };
        debug!("Resolved '{}' as {} ({})", relative.display(), resolved.identifier, resolved.path);

        let module = match registry.load(&resolved.identifier) {
            Ok(module) => module,
            Err(e) => {
                report.skip(e);
                continue;
            }
        };

        match builder.register(&resolved.identifier, &resolved.path, &module) {
            Ok(()) => report.registered.push(resolved),
            Err(e) => report.skip(e),
        }
    }

    let (command, tree, handlers) = builder.finish();
    info!(
        "Registered {} of {} discovered command(s) in {} group(s).",
        report.registered.len(),
        report.discovered,
        tree.group_count()
    );
    CommandParser {
        command,
        tree,
        handlers,
        report,
    }
}
