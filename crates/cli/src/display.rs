// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};

use reel_core::{Genre, Movie, PendingAction};

use crate::sync::ConnectivityState;

/// Maximum line width for the wrapped overview (excluding the 4-space indent).
const WRAP_WIDTH: usize = 76;

/// Break a paragraph into lines no wider than `width`.
///
/// Words longer than `width` get a line of their own.
pub fn wrap_text(content: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in content.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Format a movie for list output: `[id] Title (year)`.
pub fn format_movie_line(movie: &Movie) -> String {
    match movie.release_year() {
        Some(year) => format!("[{}] {} ({})", movie.id, movie.title, year),
        None => format!("[{}] {}", movie.id, movie.title),
    }
}

/// Format a favorite status for humans.
pub fn format_favorite_status(status: Option<bool>) -> &'static str {
    match status {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

/// Format full details of a movie.
pub fn format_movie_details(movie: &Movie, favorite: Option<bool>, genres: &[Genre]) -> String {
    let mut out = format_movie_line(movie);
    if !movie.original_title.is_empty() && movie.original_title != movie.title {
        out.push_str(&format!("\nOriginal title: {}", movie.original_title));
    }
    if !movie.release_date.is_empty() {
        out.push_str(&format!("\nReleased: {}", movie.release_date));
    }
    if movie.vote_count > 0 {
        out.push_str(&format!(
            "\nRating: {:.1} ({} votes)",
            movie.vote_average, movie.vote_count
        ));
    }

    let names: Vec<&str> = movie
        .genre_ids
        .iter()
        .filter_map(|id| genres.iter().find(|g| g.id == *id))
        .map(|g| g.name.as_str())
        .collect();
    if !names.is_empty() {
        out.push_str(&format!("\nGenres: {}", names.join(", ")));
    }

    out.push_str(&format!("\nFavorite: {}", format_favorite_status(favorite)));

    if !movie.overview.trim().is_empty() {
        out.push_str("\n\nOverview:");
        for line in wrap_text(&movie.overview, WRAP_WIDTH) {
            out.push_str("\n    ");
            out.push_str(&line);
        }
    }
    out
}

/// Format a millisecond timestamp as RFC 3339 (UTC, seconds precision).
pub fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Format a queued action: `2026-01-10 12:00:00 UTC  toggleFavorite 42 -> add`.
pub fn format_action(action: &PendingAction) -> String {
    let verb = if action.status { "add" } else { "remove" };
    format!(
        "{}  {} {} -> {}",
        format_timestamp(action.timestamp),
        action.kind,
        action.movie_id,
        verb
    )
}

/// Format connectivity for `reel status`.
pub fn format_connectivity(state: &ConnectivityState) -> &'static str {
    match (state.is_connected, state.show_online_banner) {
        (true, true) => "online (back online)",
        (true, false) => "online",
        (false, _) => "offline",
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
