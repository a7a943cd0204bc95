//! # User Database Connect Command
//!
//! File: cli/src/commands/user__db__connect.rs
//!
//! Implements `autocli-demo user db connect`. The `db` group is created under
//! `user` the first time a command needs it.
//!
use autocli::{GroupHandle, Result};
use clap::{Arg, ArgMatches, Command};

pub fn configure(group: &mut GroupHandle<'_>, name: &str) -> Result<()> {
    group.add_leaf(
        Command::new(name.to_owned())
            .about("Connects to the user database.")
            .arg(
                Arg::new("url")
                    .long("url")
                    .default_value("postgres://localhost/users")
                    .help("Connection URL of the user database."),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .value_parser(clap::value_parser!(u64))
                    .default_value("30")
                    .help("Connection timeout in seconds."),
            ),
    )
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let url = matches
        .get_one::<String>("url")
        .map(String::as_str)
        .unwrap_or_default();
    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(30);
    println!("Connecting to {} (timeout: {}s)", url, timeout);
    Ok(())
}
