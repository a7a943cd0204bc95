//! # Settings Config Get Command
//!
//! File: cli/src/commands/settings/config__get.rs
//!
//! Implements `autocli-demo settings config get`.
//!
use autocli::{GroupHandle, Result};
use clap::{Arg, ArgMatches, Command};

const SETTINGS: &[(&str, &str)] = &[("theme", "dark"), ("editor", "nvim"), ("pager", "less")];

pub fn configure(group: &mut GroupHandle<'_>, name: &str) -> Result<()> {
    group.add_leaf(
        Command::new(name.to_owned())
            .about("Prints the value of a setting.")
            .arg(Arg::new("key").required(true).help("Name of the setting.")),
    )
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let key = matches
        .get_one::<String>("key")
        .map(String::as_str)
        .unwrap_or_default();
    match SETTINGS.iter().find(|(k, _)| *k == key) {
        Some((k, v)) => {
            println!("{} = {}", k, v);
            Ok(())
        }
        None => anyhow::bail!("Unknown setting '{}'", key),
    }
}
