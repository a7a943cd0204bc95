//! # autocli Demo Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Verifies the top-level behavior of `autocli-demo`: standard flags, the help
//! listing of discovered groups, and the required command selection.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_main_help_flag() {
    demo_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("report")
                .and(predicate::str::contains("user"))
                .and(predicate::str::contains("admin"))
                .and(predicate::str::contains("settings")),
        );
}

#[test]
fn test_main_version_flag() {
    demo_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_arguments_requires_a_command() {
    demo_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a subcommand"));
}

#[test]
fn test_group_without_leaf_requires_a_command() {
    demo_cmd()
        .args(["user", "db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a subcommand"));
}

#[test]
fn test_group_help_lists_children() {
    demo_cmd()
        .args(["user", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("add")
                .and(predicate::str::contains("remove"))
                .and(predicate::str::contains("db")),
        );
}

#[test]
fn test_verbose_flag_accepted() {
    demo_cmd()
        .args(["-vv", "report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report: ok"));
}

#[test]
fn test_root_level_command_with_format() {
    demo_cmd()
        .args(["report", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status = \"ok\"").and(predicate::str::contains("users = 3")));
}

#[test]
fn test_verbose_flag_after_subcommand() {
    demo_cmd()
        .args(["report", "-vv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report: ok"))
        .stderr(predicate::str::contains("Dispatching to 'report'"));

    demo_cmd()
        .args(["report"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dispatching").not());
}
