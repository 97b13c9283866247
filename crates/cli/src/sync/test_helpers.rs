// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use reel_core::{ClockSource, Genre, ManualClock, Movie, MovieId, PendingAction};

use tokio::sync::oneshot;

use super::api::{ApiError, ApiFuture, FavoritesApi};
use crate::cache::{CacheManager, Freshness};
use crate::notify::{Notice, NoticeKind, Notifier};

/// Create a pending toggle action.
pub fn action(movie_id: MovieId, status: bool, timestamp: u64) -> PendingAction {
    PendingAction::toggle_favorite(movie_id, status, timestamp)
}

/// Memory-only cache with a manual clock starting at 1000 ms.
pub fn memory_cache() -> Arc<CacheManager> {
    memory_cache_with_clock().0
}

pub fn memory_cache_with_clock() -> (Arc<CacheManager>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000));
    let source: Arc<dyn ClockSource> = clock.clone();
    let cache = Arc::new(CacheManager::in_memory(Freshness::default(), source));
    (cache, clock)
}

/// In-memory stand-in for the remote API.
///
/// Successful toggles update the server-side favorites list. Failures can be
/// scripted per call, per movie, or for every call (`set_down`).
#[derive(Default)]
pub struct MockApi {
    favorites: Mutex<Vec<Movie>>,
    catalog: Mutex<Vec<Movie>>,
    genres: Mutex<Vec<Genre>>,
    toggle_calls: Mutex<Vec<(MovieId, bool)>>,
    /// Upcoming toggle results, front first; `true` fails the call.
    toggle_script: Mutex<VecDeque<bool>>,
    failing_movies: Mutex<HashSet<MovieId>>,
    down: AtomicBool,
    list_calls: AtomicUsize,
    /// Held by the next toggle until the paired sender fires or drops.
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_favorites(favorites: Vec<Movie>) -> Self {
        let api = Self::new();
        *api.favorites.lock().unwrap_or_else(|e| e.into_inner()) = favorites;
        api
    }

    pub fn set_catalog(&self, movies: Vec<Movie>) {
        *self.catalog.lock().unwrap_or_else(|e| e.into_inner()) = movies;
    }

    pub fn set_genres(&self, genres: Vec<Genre>) {
        *self.genres.lock().unwrap_or_else(|e| e.into_inner()) = genres;
    }

    /// Fail the next `n` toggle calls.
    pub fn fail_next_toggles(&self, n: usize) {
        let mut script = self.toggle_script.lock().unwrap_or_else(|e| e.into_inner());
        script.extend((0..n).map(|_| true));
    }

    /// Fail every toggle for this movie.
    pub fn fail_movie(&self, movie_id: MovieId) {
        self.failing_movies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(movie_id);
    }

    /// Make every call fail as if the server were unreachable.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn toggle_calls(&self) -> Vec<(MovieId, bool)> {
        self.toggle_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of favorites list fetches.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Make the next toggle wait until the returned sender is used.
    pub fn hold_next_toggle(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        *self.gate.lock().unwrap_or_else(|e| e.into_inner()) = Some(gate);
        release
    }

    pub fn server_favorite_ids(&self) -> Vec<MovieId> {
        self.favorites
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|m| m.id)
            .collect()
    }

    fn unavailable() -> ApiError {
        ApiError::Request("connection refused".to_string())
    }

    fn apply_toggle(&self, movie_id: MovieId, favorite: bool) -> Result<(), ApiError> {
        self.toggle_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((movie_id, favorite));

        if self.down.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let scripted_failure = self
            .toggle_script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(false);
        let movie_fails = self
            .failing_movies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&movie_id);
        if scripted_failure || movie_fails {
            return Err(ApiError::Status {
                status: 500,
                url: "mock://account/favorite".to_string(),
            });
        }

        let mut favorites = self.favorites.lock().unwrap_or_else(|e| e.into_inner());
        if favorite {
            if !favorites.iter().any(|m| m.id == movie_id) {
                let movie = self
                    .catalog
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .iter()
                    .find(|m| m.id == movie_id)
                    .cloned()
                    .unwrap_or_else(|| Movie::new(movie_id, format!("Movie {movie_id}")));
                favorites.push(movie);
            }
        } else {
            favorites.retain(|m| m.id != movie_id);
        }
        Ok(())
    }
}

impl FavoritesApi for MockApi {
    fn toggle_favorite(&self, movie_id: MovieId, favorite: bool) -> ApiFuture<'_, ()> {
        let gate = self.gate.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(gate) = gate else {
            let result = self.apply_toggle(movie_id, favorite);
            return Box::pin(async move { result });
        };
        Box::pin(async move {
            let _ = gate.await;
            self.apply_toggle(movie_id, favorite)
        })
    }

    fn favorite_movies(&self) -> ApiFuture<'_, Vec<Movie>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.down.load(Ordering::SeqCst) {
            Err(Self::unavailable())
        } else {
            Ok(self
                .favorites
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone())
        };
        Box::pin(async move { result })
    }

    fn genres(&self) -> ApiFuture<'_, Vec<Genre>> {
        let result = if self.down.load(Ordering::SeqCst) {
            Err(Self::unavailable())
        } else {
            Ok(self.genres.lock().unwrap_or_else(|e| e.into_inner()).clone())
        };
        Box::pin(async move { result })
    }

    fn discover_movies(&self) -> ApiFuture<'_, Vec<Movie>> {
        let result = if self.down.load(Ordering::SeqCst) {
            Err(Self::unavailable())
        } else {
            Ok(self.catalog.lock().unwrap_or_else(|e| e.into_inner()).clone())
        };
        Box::pin(async move { result })
    }
}

/// Notifier that keeps every notice for later inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn kinds(&self) -> Vec<NoticeKind> {
        self.notices().iter().map(|n| n.kind).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
