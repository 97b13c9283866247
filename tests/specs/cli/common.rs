// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub const CACHE_FILE: &str = "MOVIE_APP_QUERY_CACHE.jsonl";

/// The binary with a clean environment.
pub fn reel() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("reel").unwrap();
    cmd.env_remove("REEL_API_TOKEN")
        .env_remove("REEL_DATA_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// The binary in offline mode against the given data directory.
pub fn offline(temp: &TempDir) -> Command {
    let mut cmd = reel();
    cmd.arg("--offline").arg("--data-dir").arg(temp.path());
    cmd
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Writes a cache snapshot holding the details of the given movies,
/// as if `reel movies` had run while online.
pub fn seed_movies(temp: &TempDir, movies: &[(u64, &str)]) {
    let now = now_ms();
    let lines: Vec<String> = movies
        .iter()
        .map(|(id, title)| {
            serde_json::json!({
                "key": ["movieDetails", id],
                "value": { "id": id, "title": title },
                "updated_at": now,
            })
            .to_string()
        })
        .collect();
    std::fs::write(temp.path().join(CACHE_FILE), lines.join("\n") + "\n").unwrap();
}

/// Raw contents of the cache snapshot.
pub fn read_snapshot(temp: &TempDir) -> String {
    std::fs::read_to_string(temp.path().join(CACHE_FILE)).unwrap()
}
