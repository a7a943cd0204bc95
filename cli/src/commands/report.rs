//! # Report Command
//!
//! File: cli/src/commands/report.rs
//!
//! Implements `autocli-demo report`, a single-segment command registered
//! directly under the root.
//!
use anyhow::Context;
use autocli::{GroupHandle, Result};
use clap::{Arg, ArgMatches, Command};
use serde::Serialize;

#[derive(Serialize, Debug)]
struct Report {
    status: &'static str,
    users: usize,
}

pub fn configure(group: &mut GroupHandle<'_>, name: &str) -> Result<()> {
    group.add_leaf(
        Command::new(name.to_owned())
            .about("Prints a summary report.")
            .arg(
                Arg::new("format")
                    .long("format")
                    .value_parser(["text", "toml"])
                    .default_value("text")
                    .help("Output format."),
            ),
    )
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let report = Report {
        status: "ok",
        users: 3,
    };
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    match format {
        "toml" => {
            let rendered = toml::to_string(&report).context("Failed to serialize report")?;
            print!("{}", rendered);
        }
        _ => println!("Report: {} ({} users)", report.status, report.users),
    }
    Ok(())
}
