// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use reel_core::MovieId;

use crate::sync::ApiError;

/// All possible errors that can occur in the reelrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no data directory available\n  hint: pass --data-dir or set REEL_DATA_DIR")]
    NoDataDir,

    #[error("config error: {0}")]
    Config(String),

    #[error("movie {0} is not cached\n  hint: run 'reel movies' while online to cache movie details")]
    MovieNotCached(MovieId),

    #[error("no cached {what} and the remote API is unavailable\n  hint: retry when back online")]
    Unavailable { what: &'static str },

    #[error("failed to update favorite for movie {id}: {reason}")]
    ToggleFailed { id: MovieId, reason: String },

    #[error("api error: {0}")]
    Api(#[from] ApiError),

    #[error("cache error: {0}")]
    Cache(#[from] reel_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for reelrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
