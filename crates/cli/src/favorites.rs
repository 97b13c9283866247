// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cached reads of server data.
//!
//! Every read prefers a fresh cache entry, then the remote API when
//! connected, then whatever stale data the cache still holds. Pending
//! offline actions are layered on top of favorite reads so the user sees
//! their own changes before the server does.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use reel_core::{derive_display_list, CacheKey, Genre, Movie, MovieId};

use crate::cache::CacheManager;
use crate::error::{Error, Result};
use crate::sync::{ApiFuture, ConnectivityMonitor, FavoritesApi, HttpApi, PendingQueue};

/// Read side of the favorites subsystem.
pub struct Library<A: FavoritesApi = HttpApi> {
    api: Arc<A>,
    cache: Arc<CacheManager>,
    monitor: ConnectivityMonitor,
    queue: PendingQueue,
}

impl<A: FavoritesApi> Library<A> {
    pub fn new(api: Arc<A>, cache: Arc<CacheManager>, monitor: ConnectivityMonitor) -> Self {
        Library {
            api,
            queue: PendingQueue::new(Arc::clone(&cache)),
            cache,
            monitor,
        }
    }

    /// Fresh cache entry, else a fetch when connected, else stale data.
    ///
    /// Fetch failures are logged and fall through to the stale entry.
    async fn read_through<'a, T, F>(&'a self, key: CacheKey, fetch: F) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> ApiFuture<'a, T>,
    {
        if let Some(fresh) = self.cache.get_fresh(&key) {
            return Some(fresh);
        }
        if self.monitor.is_connected() {
            match fetch().await {
                Ok(value) => {
                    if let Err(e) = self.cache.set(key, &value) {
                        tracing::warn!("failed to cache {}: {}", key, e);
                    }
                    return Some(value);
                }
                Err(e) => tracing::warn!("fetching {} failed, using cached data: {}", key, e),
            }
        }
        self.cache.get(&key)
    }

    /// Whether the movie is a favorite, as far as this client knows.
    ///
    /// The latest pending action for the movie wins over server data.
    /// `None` when nothing is known.
    pub async fn favorite_status(&self, movie_id: MovieId) -> Option<bool> {
        if let Some(action) = self
            .queue
            .peek_all()
            .iter()
            .rev()
            .find(|a| a.movie_id == movie_id)
        {
            return Some(action.status);
        }
        let api = self.api.as_ref();
        self.read_through(CacheKey::FavoriteStatus(movie_id), move || {
            api.favorite_status(movie_id)
        })
        .await
    }

    /// Favorites to display: the server list with pending actions replayed.
    ///
    /// Never fails. Offline with nothing cached gives an empty list.
    pub async fn favorite_movies(&self) -> Vec<Movie> {
        let server = self.server_favorites().await;
        let pending = self.queue.peek_all();

        let mut details = HashMap::new();
        for action in &pending {
            if let Some(movie) = self.cache.get::<Movie>(&CacheKey::MovieDetails(action.movie_id)) {
                details.insert(action.movie_id, movie);
            }
        }
        derive_display_list(&server, &pending, &details)
    }

    async fn server_favorites(&self) -> Vec<Movie> {
        if let Some(fresh) = self.cache.get_fresh(&CacheKey::FavoriteMovies) {
            return fresh;
        }
        if self.monitor.is_connected() {
            match self.api.favorite_movies().await {
                Ok(favorites) => {
                    self.store_favorites(&favorites);
                    return favorites;
                }
                Err(e) => tracing::warn!("fetching favorites failed, using cached list: {}", e),
            }
        }
        self.cache
            .get(&CacheKey::FavoriteMovies)
            .or_else(|| self.cache.get(&CacheKey::CachedFavorites))
            .unwrap_or_default()
    }

    /// Stores a server favorites list as the live entry and the fallback snapshot.
    fn store_favorites(&self, favorites: &[Movie]) {
        let stored = self
            .cache
            .set(CacheKey::FavoriteMovies, favorites)
            .and_then(|()| self.cache.set(CacheKey::CachedFavorites, favorites));
        if let Err(e) = stored {
            tracing::warn!("failed to cache favorites: {}", e);
        }
        for movie in favorites {
            if let Err(e) = self.record_details(movie) {
                tracing::warn!("failed to cache details of {}: {}", movie.id, e);
            }
        }
    }

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let api = self.api.as_ref();
        self.read_through(CacheKey::Genres, move || api.genres())
            .await
            .ok_or(Error::Unavailable { what: "genres" })
    }

    /// Popular movies. Each movie's details are cached for offline use.
    pub async fn movies(&self) -> Result<Vec<Movie>> {
        let api = self.api.as_ref();
        let movies = self
            .read_through(CacheKey::Movies, move || api.discover_movies())
            .await
            .ok_or(Error::Unavailable { what: "movies" })?;
        for movie in &movies {
            self.record_details(movie)?;
        }
        Ok(movies)
    }

    /// Remembers a movie so it can be shown after an offline toggle.
    pub fn record_details(&self, movie: &Movie) -> Result<()> {
        self.cache.set(CacheKey::MovieDetails(movie.id), movie)
    }

    /// Details of a movie seen earlier.
    pub fn movie_details(&self, movie_id: MovieId) -> Result<Movie> {
        if let Some(movie) = self.cache.get(&CacheKey::MovieDetails(movie_id)) {
            return Ok(movie);
        }
        [
            CacheKey::Movies,
            CacheKey::FavoriteMovies,
            CacheKey::CachedFavorites,
        ]
        .iter()
        .filter_map(|key| self.cache.get::<Vec<Movie>>(key))
        .flatten()
        .find(|m| m.id == movie_id)
        .ok_or(Error::MovieNotCached(movie_id))
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.queue
    }
}

#[cfg(test)]
#[path = "favorites_tests.rs"]
mod tests;
