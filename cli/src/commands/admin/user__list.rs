//! # Admin User List Command
//!
//! File: cli/src/commands/admin/user__list.rs
//!
//! Implements `autocli-demo admin user list`: the `admin` segment comes from the
//! directory, `user` and `list` from the file name.
//!
use autocli::{GroupHandle, Result};
use clap::{Arg, ArgMatches, Command};

const USERS: &[&str] = &["alice", "bob", "carol"];

pub fn configure(group: &mut GroupHandle<'_>, name: &str) -> Result<()> {
    group.add_leaf(
        Command::new(name.to_owned())
            .about("Lists user accounts.")
            .arg(
                Arg::new("limit")
                    .short('n')
                    .long("limit")
                    .value_parser(clap::value_parser!(usize))
                    .default_value("10")
                    .help("Maximum number of users to list."),
            ),
    )
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let limit = matches.get_one::<usize>("limit").copied().unwrap_or(10);
    for user in USERS.iter().take(limit) {
        println!("{}", user);
    }
    Ok(())
}
