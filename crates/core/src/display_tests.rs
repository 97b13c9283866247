// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn movie(id: MovieId) -> Movie {
    Movie::new(id, format!("Movie {id}"))
}

fn toggle(id: MovieId, status: bool) -> PendingAction {
    PendingAction::toggle_favorite(id, status, id * 10)
}

fn details(ids: &[MovieId]) -> HashMap<MovieId, Movie> {
    ids.iter().map(|&id| (id, movie(id))).collect()
}

fn ids(list: &[Movie]) -> Vec<MovieId> {
    list.iter().map(|m| m.id).collect()
}

#[test]
fn no_pending_returns_server_list() {
    let server = vec![movie(1), movie(2)];
    let list = derive_display_list(&server, &[], &HashMap::new());
    assert_eq!(ids(&list), vec![1, 2]);
}

#[test]
fn everything_empty_yields_empty_list() {
    let list = derive_display_list(&[], &[], &HashMap::new());
    assert!(list.is_empty());
}

#[test]
fn pending_add_uses_cached_details() {
    let server = vec![movie(1)];
    let list = derive_display_list(&server, &[toggle(42, true)], &details(&[42]));
    assert_eq!(ids(&list), vec![1, 42]);
}

#[test]
fn pending_add_without_details_is_skipped() {
    let server = vec![movie(1)];
    let list = derive_display_list(&server, &[toggle(42, true)], &HashMap::new());
    assert_eq!(ids(&list), vec![1]);
}

#[test]
fn pending_add_of_listed_movie_does_not_duplicate() {
    let server = vec![movie(1)];
    let list = derive_display_list(&server, &[toggle(1, true)], &details(&[1]));
    assert_eq!(ids(&list), vec![1]);
}

#[test]
fn pending_remove_hides_server_favorite() {
    let server = vec![movie(1), movie(2), movie(3)];
    let list = derive_display_list(&server, &[toggle(2, false)], &HashMap::new());
    assert_eq!(ids(&list), vec![1, 3]);
}

#[test]
fn later_toggle_wins_for_same_movie() {
    let pending = vec![toggle(5, true), toggle(5, false)];
    let list = derive_display_list(&[], &pending, &details(&[5]));
    assert!(list.is_empty());

    let pending = vec![toggle(5, false), toggle(5, true)];
    let list = derive_display_list(&[movie(5)], &pending, &details(&[5]));
    assert_eq!(ids(&list), vec![5]);
}

#[test]
fn additions_follow_queue_order() {
    let pending = vec![toggle(9, true), toggle(3, true)];
    let list = derive_display_list(&[movie(1)], &pending, &details(&[3, 9]));
    assert_eq!(ids(&list), vec![1, 9, 3]);
}

#[test]
fn duplicate_server_entries_collapse() {
    let server = vec![movie(1), movie(1), movie(2)];
    let list = derive_display_list(&server, &[], &HashMap::new());
    assert_eq!(ids(&list), vec![1, 2]);
}
