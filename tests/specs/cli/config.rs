// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `reel config` and configuration loading.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

fn write_config(temp: &TempDir, content: &str) {
    std::fs::write(temp.path().join("config.toml"), content).unwrap();
}

#[test]
fn prints_defaults() {
    let temp = TempDir::new().unwrap();
    reel()
        .arg("config")
        .arg("--data-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "base_url = \"https://api.themoviedb.org/3\"",
        ))
        .stdout(predicate::str::contains("stale_secs = 3600"))
        .stdout(predicate::str::contains("favorite_status_stale_secs = 300"))
        .stdout(predicate::str::contains("banner_secs = 3"))
        .stdout(predicate::str::contains("token").not());
}

#[test]
fn data_dir_from_environment() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "[api]\naccount_id = \"12345\"\n");

    reel()
        .arg("config")
        .env("REEL_DATA_DIR", temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("account_id = \"12345\""));
}

#[test]
fn token_from_file_is_masked() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "[api]\ntoken = \"file-secret\"\n");

    reel()
        .arg("config")
        .arg("--data-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("token = \"********\""))
        .stdout(predicate::str::contains("file-secret").not());
}

#[test]
fn token_from_environment_is_masked() {
    let temp = TempDir::new().unwrap();

    reel()
        .arg("config")
        .arg("--data-dir")
        .arg(temp.path())
        .env("REEL_API_TOKEN", "env-secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("token = \"********\""))
        .stdout(predicate::str::contains("env-secret").not());
}

#[test]
fn invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "[api]\nbase_url = \"not a url\"\n");

    reel()
        .arg("config")
        .arg("--data-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"))
        .stderr(predicate::str::contains("api.base_url"));
}

#[test]
fn unparsable_config_fails_every_command() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "[api\n");

    offline(&temp)
        .arg("favorites")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn config_does_not_create_cache() {
    let temp = TempDir::new().unwrap();
    reel()
        .arg("config")
        .arg("--data-dir")
        .arg(temp.path())
        .assert()
        .success();

    assert!(!temp.path().join(CACHE_FILE).exists());
}
