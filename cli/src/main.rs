//! # autocli Demo Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of `autocli-demo`, a CLI whose command tree is not declared
//! anywhere in code. Every file under `src/commands/` is a command module, and
//! its position in the tree comes from its path:
//!
//! ```text
//! src/commands/report.rs               -> autocli-demo report
//! src/commands/user/add.rs             -> autocli-demo user add
//! src/commands/user__remove.rs         -> autocli-demo user remove
//! src/commands/user__db__connect.rs    -> autocli-demo user db connect
//! src/commands/admin/user__list.rs     -> autocli-demo admin user list
//! src/commands/settings/config__get.rs -> autocli-demo settings config get
//! ```
//!
//! ## Architecture
//!
//! - `build.rs` generates the module registry from `src/commands/`.
//! - At startup the configuration is loaded (`.autocli.toml`, `AUTOCLI_COMMANDS_DIR`).
//! - With a commands directory configured, that directory is scanned at runtime;
//!   otherwise the build-time listing is replayed.
//! - The resulting parser handles the arguments and dispatches to the leaf.
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! autocli-demo --help
//!
//! # Run a nested command with increased verbosity
//! autocli-demo -vv user add alice --email alice@example.com
//! ```
//!
use autocli::core::config;
use autocli::{create_command_parser, CommandParser};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Handle used to swap the log filter once the full command line is parsed.
type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Command modules generated from `src/commands/` by `build.rs`.
mod commands {
    include!(concat!(env!("OUT_DIR"), "/commands.rs"));
}

fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Increase logging verbosity (-v, -vv, -vvv)")
}

/// Root command that the discovered command tree is attached to.
fn root_command() -> Command {
    Command::new("autocli-demo")
        .about("autocli demo: a command tree generated from its commands directory")
        .long_about(
            "Every file under the commands directory is a command. Directories and '__' in\n\
             file names both become levels of the command tree.",
        )
        .version(env!("CARGO_PKG_VERSION"))
        .propagate_version(true)
        .arg(verbose_arg())
}

/// Reads the `-v` count before the full command tree exists, so that logging is
/// configured while the tree is being built. Flags after the first subcommand
/// are only seen by the full parse, see [`apply_verbosity`].
fn early_verbosity() -> u8 {
    Command::new("autocli-demo")
        .arg(verbose_arg())
        .ignore_errors(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .try_get_matches_from(std::env::args_os())
        .ok()
        .and_then(|m| m.get_one::<u8>("verbose").copied())
        .unwrap_or(0)
}

/// Log filter for a `-v` count. `RUST_LOG` takes precedence when set.
fn env_filter(verbose: u8) -> EnvFilter {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

fn init_logging(verbose: u8) -> FilterHandle {
    let (filter, handle) = reload::Layer::new(env_filter(verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
    handle
}

/// Re-applies the log filter from the full parse. A global `-v` given after a
/// subcommand is propagated back to the root matches.
fn apply_verbosity(handle: &FilterHandle, early: u8, matches: &ArgMatches) {
    let verbose = matches.get_one::<u8>("verbose").copied().unwrap_or(0);
    if verbose == early {
        return;
    }
    if let Err(e) = handle.reload(env_filter(verbose)) {
        eprintln!("Warning: failed to update log level: {}", e);
    }
    tracing::debug!("Log verbosity set to {} from the command line", verbose);
}

fn build_parser() -> anyhow::Result<CommandParser> {
    let cfg = config::load_config()?;
    let registry = commands::registry();
    let root = cfg.parser.apply(root_command());

    match cfg.scan.commands_dir() {
        Some(dir) => {
            tracing::info!("Scanning commands directory: {}", dir.display());
            create_command_parser(&dir, &registry, &cfg.scan.to_scan_options(), root)
        }
        None => Ok(CommandParser::from_registry(&registry, root)),
    }
}

fn main() {
    let early = early_verbosity();
    let filter_handle = init_logging(early);

    let parser = match build_parser() {
        Ok(parser) => parser,
        Err(e) => {
            tracing::error!("Failed to build command parser: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Command parser: {:?}", parser);

    let matches = parser.get_matches();
    apply_verbosity(&filter_handle, early, &matches);

    if let Err(e) = parser.dispatch(&matches) {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// --- Basic Integration Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_every_command_file() {
        let registry = commands::registry();
        for id in [
            "commands::report",
            "commands::user::add",
            "commands::user__remove",
            "commands::user__db__connect",
            "commands::admin::user__list",
            "commands::settings::config__get",
        ] {
            assert!(registry.contains(id), "missing {}", id);
        }
    }

    #[test]
    fn test_tree_from_registry() {
        let parser = CommandParser::from_registry(&commands::registry(), root_command());
        assert!(parser.report().is_complete());
        assert!(parser.tree().contains_leaf(&["user", "db", "connect"]));
        assert!(parser.tree().contains_leaf(&["admin", "user", "list"]));
        assert!(parser.tree().contains_group("user__db"));
        parser.command().clone().debug_assert();
    }

    #[test]
    fn test_trailing_verbose_flag_reaches_root_matches() {
        let parser = CommandParser::from_registry(&commands::registry(), root_command());
        for (args, expected) in [
            (vec!["autocli-demo", "-vv", "report"], 2u8),
            (vec!["autocli-demo", "report", "-vv"], 2),
            (vec!["autocli-demo", "user", "add", "a", "-e", "x", "-v"], 1),
        ] {
            let matches = parser.try_get_matches_from(args.clone()).unwrap();
            assert_eq!(
                matches.get_one::<u8>("verbose").copied(),
                Some(expected),
                "args: {:?}",
                args
            );
        }
    }
}
