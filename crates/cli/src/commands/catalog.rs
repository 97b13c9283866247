// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Browsing commands: `movies`, `genres` and `show`.

use std::io::Write;

use reel_core::MovieId;

use crate::display::{format_movie_details, format_movie_line};
use crate::error::Result;
use crate::sync::FavoritesApi;

use super::Context;

/// List popular movies, caching each one's details for offline use.
pub async fn movies<A: FavoritesApi>(ctx: &Context<A>, out: &mut impl Write) -> Result<()> {
    let movies = ctx.library.movies().await?;
    if movies.is_empty() {
        writeln!(out, "No movies found.")?;
        return Ok(());
    }
    for movie in &movies {
        writeln!(out, "{}", format_movie_line(movie))?;
    }
    Ok(())
}

pub async fn genres<A: FavoritesApi>(ctx: &Context<A>, out: &mut impl Write) -> Result<()> {
    let genres = ctx.library.genres().await?;
    if genres.is_empty() {
        writeln!(out, "No genres found.")?;
        return Ok(());
    }
    for genre in &genres {
        writeln!(out, "{:>6}  {}", genre.id, genre.name)?;
    }
    Ok(())
}

/// Show a movie seen earlier, with its favorite status.
pub async fn show<A: FavoritesApi>(
    ctx: &Context<A>,
    id: MovieId,
    out: &mut impl Write,
) -> Result<()> {
    let movie = ctx.library.movie_details(id)?;
    ctx.library.record_details(&movie)?;

    let favorite = ctx.library.favorite_status(id).await;
    let genres = match ctx.library.genres().await {
        Ok(genres) => genres,
        Err(e) => {
            tracing::debug!("showing movie {} without genre names: {}", id, e);
            Vec::new()
        }
    };

    writeln!(out, "{}", format_movie_details(&movie, favorite, &genres))?;
    Ok(())
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
