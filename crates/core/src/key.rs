// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structured cache keys.
//!
//! Every cache entry is addressed by a tuple whose first element names the
//! key class, e.g. `["favoriteStatus", 42]` or `["pendingActions"]`. Keys
//! serialize to exactly that JSON array form.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::movie::MovieId;

/// Class of a cache key, i.e. its first tuple element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyClass {
    Genres,
    Movies,
    FavoriteStatus,
    FavoriteMovies,
    CachedFavorites,
    MovieDetails,
    PendingActions,
}

impl KeyClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyClass::Genres => "genres",
            KeyClass::Movies => "movies",
            KeyClass::FavoriteStatus => "favoriteStatus",
            KeyClass::FavoriteMovies => "favoriteMovies",
            KeyClass::CachedFavorites => "cachedFavorites",
            KeyClass::MovieDetails => "movieDetails",
            KeyClass::PendingActions => "pendingActions",
        }
    }

    fn parse(s: &str) -> Option<KeyClass> {
        Some(match s {
            "genres" => KeyClass::Genres,
            "movies" => KeyClass::Movies,
            "favoriteStatus" => KeyClass::FavoriteStatus,
            "favoriteMovies" => KeyClass::FavoriteMovies,
            "cachedFavorites" => KeyClass::CachedFavorites,
            "movieDetails" => KeyClass::MovieDetails,
            "pendingActions" => KeyClass::PendingActions,
            _ => return None,
        })
    }

    /// Classes holding local state rather than a copy of server data.
    ///
    /// These never go stale and are never garbage collected.
    pub fn is_local_state(&self) -> bool {
        matches!(
            self,
            KeyClass::PendingActions | KeyClass::CachedFavorites | KeyClass::MovieDetails
        )
    }
}

impl fmt::Display for KeyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    Genres,
    Movies,
    FavoriteStatus(MovieId),
    FavoriteMovies,
    CachedFavorites,
    MovieDetails(MovieId),
    PendingActions,
}

impl CacheKey {
    pub fn class(&self) -> KeyClass {
        match self {
            CacheKey::Genres => KeyClass::Genres,
            CacheKey::Movies => KeyClass::Movies,
            CacheKey::FavoriteStatus(_) => KeyClass::FavoriteStatus,
            CacheKey::FavoriteMovies => KeyClass::FavoriteMovies,
            CacheKey::CachedFavorites => KeyClass::CachedFavorites,
            CacheKey::MovieDetails(_) => KeyClass::MovieDetails,
            CacheKey::PendingActions => KeyClass::PendingActions,
        }
    }

    /// Movie id carried by per-movie keys.
    pub fn movie_id(&self) -> Option<MovieId> {
        match self {
            CacheKey::FavoriteStatus(id) | CacheKey::MovieDetails(id) => Some(*id),
            _ => None,
        }
    }

    /// Tuple form of the key.
    pub fn to_parts(&self) -> Value {
        let class = Value::from(self.class().as_str());
        match self.movie_id() {
            Some(id) => Value::Array(vec![class, Value::from(id)]),
            None => Value::Array(vec![class]),
        }
    }

    /// Parses the tuple form of a key.
    pub fn from_parts(parts: &Value) -> Result<Self> {
        let invalid = || Error::InvalidKey(parts.to_string());

        let items = parts.as_array().ok_or_else(invalid)?;
        let class = items
            .first()
            .and_then(Value::as_str)
            .and_then(KeyClass::parse)
            .ok_or_else(invalid)?;

        let key = match (class, &items[1..]) {
            (KeyClass::FavoriteStatus, [id]) => {
                CacheKey::FavoriteStatus(id.as_u64().ok_or_else(invalid)?)
            }
            (KeyClass::MovieDetails, [id]) => {
                CacheKey::MovieDetails(id.as_u64().ok_or_else(invalid)?)
            }
            (KeyClass::Genres, []) => CacheKey::Genres,
            (KeyClass::Movies, []) => CacheKey::Movies,
            (KeyClass::FavoriteMovies, []) => CacheKey::FavoriteMovies,
            (KeyClass::CachedFavorites, []) => CacheKey::CachedFavorites,
            (KeyClass::PendingActions, []) => CacheKey::PendingActions,
            _ => return Err(invalid()),
        };
        Ok(key)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_parts())
    }
}

impl std::str::FromStr for CacheKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Value =
            serde_json::from_str(s).map_err(|_| Error::InvalidKey(s.to_string()))?;
        CacheKey::from_parts(&parts)
    }
}

impl Serialize for CacheKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_parts().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CacheKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let parts = Value::deserialize(deserializer)?;
        CacheKey::from_parts(&parts).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
