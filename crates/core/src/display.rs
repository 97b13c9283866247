// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Favorites list as the user should currently see it.

use std::collections::HashMap;

use crate::action::{ActionKind, PendingAction};
use crate::movie::{Movie, MovieId};

/// Merges the server's favorites with pending offline toggles.
///
/// Pending actions are replayed in queue order over the server list: a
/// `true` toggle appends the movie (materialized from `cached_details`) when
/// it is not already listed, a `false` toggle removes it. Additions whose
/// details were never cached are skipped. Server order is kept; additions
/// follow in the order they were queued.
pub fn derive_display_list(
    server_favorites: &[Movie],
    pending_actions: &[PendingAction],
    cached_details: &HashMap<MovieId, Movie>,
) -> Vec<Movie> {
    let mut list: Vec<Movie> = Vec::with_capacity(server_favorites.len());
    for movie in server_favorites {
        if !list.iter().any(|m| m.id == movie.id) {
            list.push(movie.clone());
        }
    }

    for action in pending_actions {
        match action.kind {
            ActionKind::ToggleFavorite => {
                let listed = list.iter().position(|m| m.id == action.movie_id);
                match (action.status, listed) {
                    (true, None) => {
                        if let Some(movie) = cached_details.get(&action.movie_id) {
                            list.push(movie.clone());
                        }
                    }
                    (false, Some(index)) => {
                        list.remove(index);
                    }
                    _ => {}
                }
            }
        }
    }

    list
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
