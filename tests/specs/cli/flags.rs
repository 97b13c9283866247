// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[test]
fn help_lists_commands() {
    let assert = reel().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for command in [
        "status", "movies", "genres", "show", "favorite", "favorites", "queue", "sync", "watch",
        "config",
    ] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn version_flag() {
    reel()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("reel "));
}

#[test]
fn missing_command_fails() {
    reel().assert().failure();
}

#[parameterized(
    non_numeric_show = { &["show", "heat"] },
    missing_favorite_id = { &["favorite"] },
    unknown_command = { &["search", "heat"] },
)]
fn invalid_arguments_fail(args: &[&str]) {
    let temp = TempDir::new().unwrap();
    offline(&temp).args(args).assert().failure().code(2);
}

#[test]
fn verbose_logs_to_stderr() {
    let temp = TempDir::new().unwrap();
    offline(&temp)
        .args(["-v", "status"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}
