// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use reel_core::MovieId;

use crate::display::{format_favorite_status, format_movie_line};
use crate::error::{Error, Result};
use crate::sync::{FavoritesApi, ToggleOutcome};

use super::Context;

/// Add or remove a favorite through the mutation controller.
///
/// The movie must have been seen before (`reel movies`, `reel favorites`)
/// so it can be displayed while the change is pending.
pub async fn toggle<A: FavoritesApi>(
    ctx: &Context<A>,
    id: MovieId,
    remove: bool,
    out: &mut impl Write,
) -> Result<()> {
    let movie = ctx.library.movie_details(id)?;
    ctx.library.record_details(&movie)?;

    match ctx.controller.toggle_favorite(&movie, !remove).await {
        ToggleOutcome::Committed => Ok(()),
        ToggleOutcome::Queued { pending } => {
            writeln!(out, "{} action(s) waiting to sync.", pending)?;
            Ok(())
        }
        ToggleOutcome::RolledBack { error, status } => {
            writeln!(out, "Favorite reverted to: {}", format_favorite_status(status))?;
            Err(Error::ToggleFailed { id, reason: error })
        }
    }
}

/// List favorites, with offline changes applied.
pub async fn list<A: FavoritesApi>(ctx: &Context<A>, out: &mut impl Write) -> Result<()> {
    let favorites = ctx.library.favorite_movies().await;
    if favorites.is_empty() {
        writeln!(out, "No favorites yet.")?;
    }
    for movie in &favorites {
        writeln!(out, "{}", format_movie_line(movie))?;
    }

    let pending = ctx.library.pending().len();
    if pending > 0 {
        writeln!(out, "\n{} change(s) not yet synced.", pending)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "favorite_tests.rs"]
mod tests;
