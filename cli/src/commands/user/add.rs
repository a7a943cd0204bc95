//! # User Add Command
//!
//! File: cli/src/commands/user/add.rs
//!
//! Implements `autocli-demo user add`, which creates a user account.
//!
//! ```bash
//! autocli-demo user add alice --email alice@example.com --admin
//! ```
//!
use autocli::{GroupHandle, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

/// Usernames that cannot be created.
const RESERVED_USERNAMES: &[&str] = &["erroruser"];

pub fn configure(group: &mut GroupHandle<'_>, name: &str) -> Result<()> {
    group.add_leaf(
        Command::new(name.to_owned())
            .about("Adds a new user to the system.")
            .arg(
                Arg::new("username")
                    .required(true)
                    .help("The unique identifier for the new user."),
            )
            .arg(
                Arg::new("email")
                    .short('e')
                    .long("email")
                    .required(true)
                    .help("The user's email address."),
            )
            .arg(
                Arg::new("admin")
                    .long("admin")
                    .action(ArgAction::SetTrue)
                    .help("Grant administrator privileges."),
            ),
    )
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let username = matches
        .get_one::<String>("username")
        .map(String::as_str)
        .unwrap_or_default();
    let email = matches
        .get_one::<String>("email")
        .map(String::as_str)
        .unwrap_or_default();
    let status = if matches.get_flag("admin") {
        "Admin"
    } else {
        "Standard"
    };

    println!("Processing new user: {}", username);
    println!("Email: {}", email);
    println!("Status: {}", status);

    if RESERVED_USERNAMES.contains(&username) {
        anyhow::bail!("Username '{}' is reserved or invalid.", username);
    }

    println!("Success: User '{}' has been successfully created.", username);
    Ok(())
}
