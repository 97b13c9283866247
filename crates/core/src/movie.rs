// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Movie and genre records as returned by the remote API.

use serde::{Deserialize, Serialize};

/// Remote identifier of a movie.
pub type MovieId = u64;

/// A movie as listed by the discover and favorites endpoints.
///
/// Only `id` and `title` are required; everything else falls back to a
/// default so partially populated records (e.g. cached details) still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

impl Movie {
    /// Creates a movie with only the required fields set.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Movie {
            id,
            title: title.into(),
            original_title: String::new(),
            overview: String::new(),
            release_date: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            genre_ids: Vec::new(),
        }
    }

    /// Release year, if the release date carries one.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .split('-')
            .next()
            .filter(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// A movie genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[cfg(test)]
#[path = "movie_tests.rs"]
mod tests;
