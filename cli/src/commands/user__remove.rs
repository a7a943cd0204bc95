//! # User Remove Command
//!
//! File: cli/src/commands/user__remove.rs
//!
//! Implements `autocli-demo user remove`. Shares the `user` group with
//! `user/add.rs` even though it lives at the top of the commands directory.
//!
use autocli::{GroupHandle, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn configure(group: &mut GroupHandle<'_>, name: &str) -> Result<()> {
    group.add_leaf(
        Command::new(name.to_owned())
            .about("Removes a user from the system.")
            .arg(Arg::new("username").required(true).help("The user to remove."))
            .arg(
                Arg::new("force")
                    .short('f')
                    .long("force")
                    .action(ArgAction::SetTrue)
                    .help("Remove without keeping the user's data."),
            ),
    )
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let username = matches
        .get_one::<String>("username")
        .map(String::as_str)
        .unwrap_or_default();
    if matches.get_flag("force") {
        println!("Removed user '{}' and all of their data.", username);
    } else {
        println!("Removed user '{}' (data kept).", username);
    }
    Ok(())
}
