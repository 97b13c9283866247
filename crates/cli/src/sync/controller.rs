// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic favorite toggling.
//!
//! A toggle writes the new status to the cache before anything else, then
//! either queues the change (offline) or calls the remote API with retries
//! (online). An online call that keeps failing rolls the status back.
//!
//! ```text
//!            begin
//!              │
//!              ▼
//!   ┌──────────────────────┐   success / queued   ┌───────────┐
//!   │ Pending              │─────────────────────►│ Committed │
//!   │ {optimistic, prev}   │                      └───────────┘
//!   └──────────────────────┘   retries exhausted  ┌────────────┐
//!              └─────────────────────────────────►│ RolledBack │
//!                                                 └────────────┘
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reel_core::{CacheKey, Movie, MovieId, PendingAction};

use super::api::{FavoritesApi, HttpApi};
use super::backoff::RetryPolicy;
use super::connectivity::ConnectivityMonitor;
use super::queue::PendingQueue;
use crate::cache::CacheManager;
use crate::error::Result;
use crate::notify::{Notice, Notifier};

/// Lifecycle of a single favorite mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteMutation {
    /// The optimistic value is in the cache; `previous` is what it replaced.
    Pending {
        movie_id: MovieId,
        optimistic: bool,
        previous: Option<bool>,
    },
    /// The change was accepted (by the server, or by the offline queue).
    Committed { movie_id: MovieId, status: bool },
    /// The cache was restored to the value before the mutation.
    RolledBack {
        movie_id: MovieId,
        restored: Option<bool>,
    },
}

impl FavoriteMutation {
    /// Writes the optimistic status and enters `Pending`.
    pub fn begin(cache: &CacheManager, movie_id: MovieId, status: bool) -> Result<Self> {
        let previous = cache.replace(CacheKey::FavoriteStatus(movie_id), &status)?;
        tracing::debug!(
            "favorite {} optimistic {} (was {:?})",
            movie_id,
            status,
            previous
        );
        Ok(FavoriteMutation::Pending {
            movie_id,
            optimistic: status,
            previous,
        })
    }

    /// `Pending -> Committed`. Other states are returned unchanged.
    pub fn commit(self) -> Self {
        match self {
            FavoriteMutation::Pending {
                movie_id,
                optimistic,
                ..
            } => FavoriteMutation::Committed {
                movie_id,
                status: optimistic,
            },
            other => other,
        }
    }

    /// `Pending -> RolledBack`, restoring the previous cache value.
    ///
    /// With no previous value the entry is removed. Other states are
    /// returned unchanged.
    pub fn roll_back(self, cache: &CacheManager) -> Result<Self> {
        match self {
            FavoriteMutation::Pending {
                movie_id, previous, ..
            } => {
                let key = CacheKey::FavoriteStatus(movie_id);
                match previous {
                    Some(status) => cache.set(key, &status)?,
                    None => {
                        cache.remove(&key);
                    }
                }
                tracing::debug!("favorite {} rolled back to {:?}", movie_id, previous);
                Ok(FavoriteMutation::RolledBack {
                    movie_id,
                    restored: previous,
                })
            }
            other => Ok(other),
        }
    }

    pub fn movie_id(&self) -> MovieId {
        match self {
            FavoriteMutation::Pending { movie_id, .. }
            | FavoriteMutation::Committed { movie_id, .. }
            | FavoriteMutation::RolledBack { movie_id, .. } => *movie_id,
        }
    }

    /// Status the cache holds for the movie in this state.
    pub fn cached_status(&self) -> Option<bool> {
        match self {
            FavoriteMutation::Pending { optimistic, .. } => Some(*optimistic),
            FavoriteMutation::Committed { status, .. } => Some(*status),
            FavoriteMutation::RolledBack { restored, .. } => *restored,
        }
    }
}

/// Result of [`FavoriteController::toggle_favorite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server accepted the change.
    Committed,
    /// Offline; the change waits in the queue (`pending` entries in total).
    Queued { pending: usize },
    /// The change failed; `status` is the local status it was restored to.
    RolledBack { error: String, status: Option<bool> },
}

/// Counts a mutation as in flight until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        InFlight(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Applies favorite toggles optimistically.
pub struct FavoriteController<A: FavoritesApi = HttpApi> {
    api: Arc<A>,
    cache: Arc<CacheManager>,
    queue: PendingQueue,
    monitor: ConnectivityMonitor,
    notifier: Arc<dyn Notifier>,
    retry: RetryPolicy,
    in_flight: AtomicUsize,
}

impl<A: FavoritesApi> FavoriteController<A> {
    pub fn new(
        api: Arc<A>,
        cache: Arc<CacheManager>,
        monitor: ConnectivityMonitor,
        notifier: Arc<dyn Notifier>,
        retry: RetryPolicy,
    ) -> Self {
        FavoriteController {
            api,
            queue: PendingQueue::new(Arc::clone(&cache)),
            cache,
            monitor,
            notifier,
            retry,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// True while any toggle has not settled yet.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    /// Sets the favorite status of `movie` to `new_status`.
    ///
    /// Never fails: errors become a [`ToggleOutcome::RolledBack`] plus an
    /// error notice.
    pub async fn toggle_favorite(&self, movie: &Movie, new_status: bool) -> ToggleOutcome {
        let _in_flight = InFlight::enter(&self.in_flight);
        let offline = !self.monitor.is_connected();

        let mutation = match FavoriteMutation::begin(&self.cache, movie.id, new_status) {
            Ok(mutation) => mutation,
            Err(e) => {
                tracing::warn!("failed to apply favorite {}: {}", movie.id, e);
                self.notifier.notify(Notice::toggle_failed());
                return ToggleOutcome::RolledBack {
                    error: e.to_string(),
                    status: self.cache.get(&CacheKey::FavoriteStatus(movie.id)),
                };
            }
        };
        self.notifier
            .notify(Notice::toggled(&movie.title, new_status, offline));

        let (settled, outcome) = if offline {
            let action = PendingAction::toggle_favorite(movie.id, new_status, self.cache.now_ms());
            match self.queue.enqueue(action) {
                Ok(pending) => (mutation.commit(), ToggleOutcome::Queued { pending }),
                Err(e) => self.fail(mutation, e.to_string()),
            }
        } else {
            let api: &A = self.api.as_ref();
            let movie_id = movie.id;
            match self
                .retry
                .run(move |_| api.toggle_favorite(movie_id, new_status))
                .await
            {
                Ok(()) => (mutation.commit(), ToggleOutcome::Committed),
                Err(e) => self.fail(mutation, e.to_string()),
            }
        };
        tracing::debug!("favorite mutation settled: {:?}", settled);

        self.settle(movie.id);
        self.cache.flush().await;
        outcome
    }

    fn fail(&self, mutation: FavoriteMutation, error: String) -> (FavoriteMutation, ToggleOutcome) {
        tracing::warn!(
            "favorite {} failed, rolling back: {}",
            mutation.movie_id(),
            error
        );
        let settled = match mutation.roll_back(&self.cache) {
            Ok(settled) => settled,
            Err(e) => {
                tracing::warn!("rollback of favorite {} failed: {}", mutation.movie_id(), e);
                mutation
            }
        };
        self.notifier.notify(Notice::toggle_failed());
        let status = settled.cached_status();
        (settled, ToggleOutcome::RolledBack { error, status })
    }

    /// Marks the status and the server list for refetch.
    fn settle(&self, movie_id: MovieId) {
        self.cache.invalidate(&CacheKey::FavoriteStatus(movie_id));
        self.cache.invalidate(&CacheKey::FavoriteMovies);
    }
}
