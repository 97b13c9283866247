// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline behavior of the CLI.
//!
//! Every test runs with `--offline` against a fresh data directory, so no
//! network access is attempted.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn favorites_empty_without_cache() {
    let temp = TempDir::new().unwrap();
    offline(&temp)
        .arg("favorites")
        .assert()
        .success()
        .stdout("No favorites yet.\n");
}

#[test]
fn status_reports_offline() {
    let temp = TempDir::new().unwrap();
    offline(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connectivity:    offline"))
        .stdout(predicate::str::contains("Pending actions: 0"))
        .stdout(predicate::str::contains(CACHE_FILE));
}

#[test]
fn genres_unavailable_without_cache() {
    let temp = TempDir::new().unwrap();
    offline(&temp)
        .arg("genres")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cached genres"))
        .stderr(predicate::str::contains("hint: retry when back online"));
}

#[test]
fn movies_unavailable_without_cache() {
    let temp = TempDir::new().unwrap();
    offline(&temp)
        .arg("movies")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cached movies"));
}

#[test]
fn show_unknown_movie_fails() {
    let temp = TempDir::new().unwrap();
    offline(&temp)
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("movie 42 is not cached"));
}

#[test]
fn favorite_unknown_movie_fails_without_queueing() {
    let temp = TempDir::new().unwrap();
    offline(&temp)
        .args(["favorite", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("movie 42 is not cached"));

    offline(&temp)
        .arg("queue")
        .assert()
        .success()
        .stdout("No pending actions.\n");
}

#[test]
fn favorite_offline_is_queued_and_shown() {
    let temp = TempDir::new().unwrap();
    seed_movies(&temp, &[(42, "The Answer")]);

    offline(&temp)
        .args(["favorite", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Saved Offline: The Answer has been added to favorites and will sync when back online",
        ))
        .stdout(predicate::str::contains("1 action(s) waiting to sync."));

    offline(&temp)
        .arg("queue")
        .assert()
        .success()
        .stdout(predicate::str::contains("toggleFavorite 42 -> add"));

    offline(&temp)
        .arg("favorites")
        .assert()
        .success()
        .stdout("[42] The Answer\n\n1 change(s) not yet synced.\n");

    offline(&temp)
        .args(["show", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Favorite: yes"));
}

#[test]
fn favorite_remove_offline_is_queued() {
    let temp = TempDir::new().unwrap();
    seed_movies(&temp, &[(7, "Seven")]);

    offline(&temp)
        .args(["favorite", "7", "--remove"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Seven has been removed from favorites and will sync when back online",
        ));

    offline(&temp)
        .arg("queue")
        .assert()
        .success()
        .stdout(predicate::str::contains("toggleFavorite 7 -> remove"));
}

#[test]
fn each_offline_toggle_adds_an_action() {
    let temp = TempDir::new().unwrap();
    seed_movies(&temp, &[(42, "The Answer")]);

    for (args, pending) in [
        (vec!["favorite", "42"], 1),
        (vec!["favorite", "42", "--remove"], 2),
        (vec!["favorite", "42"], 3),
    ] {
        offline(&temp)
            .args(args)
            .assert()
            .success()
            .stdout(predicate::str::contains(format!(
                "{pending} action(s) waiting to sync."
            )));
    }

    let output = offline(&temp).arg("queue").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let verbs: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.rsplit(' ').next())
        .collect();
    assert_eq!(verbs, vec!["add", "remove", "add"]);
}

#[test]
fn sync_offline_keeps_queue() {
    let temp = TempDir::new().unwrap();
    seed_movies(&temp, &[(42, "The Answer")]);
    offline(&temp).args(["favorite", "42"]).assert().success();

    offline(&temp)
        .arg("sync")
        .assert()
        .success()
        .stdout("Offline: 1 action(s) will sync when back online.\n");

    offline(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending actions: 1"));
}

#[test]
fn queued_actions_are_persisted() {
    let temp = TempDir::new().unwrap();
    seed_movies(&temp, &[(42, "The Answer")]);
    offline(&temp).args(["favorite", "42"]).assert().success();

    let snapshot = read_snapshot(&temp);
    assert!(snapshot.contains(r#"["pendingActions"]"#), "{snapshot}");
    assert!(snapshot.contains(r#""movieId":42"#), "{snapshot}");
}

#[test]
fn corrupt_snapshot_is_moved_aside() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(CACHE_FILE), "not json\n").unwrap();

    offline(&temp)
        .arg("favorites")
        .assert()
        .success()
        .stdout("No favorites yet.\n");

    assert!(temp
        .path()
        .join(format!("{CACHE_FILE}.corrupt"))
        .exists());
}
