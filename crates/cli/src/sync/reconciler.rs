// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replays queued offline actions once connectivity returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use reel_core::{ActionKind, CacheKey, KeyClass};

use super::api::{FavoritesApi, HttpApi};
use super::queue::PendingQueue;
use crate::cache::CacheManager;
use crate::notify::{Notice, Notifier};

/// Whether a pass is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerState {
    Idle,
    Draining,
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub synced: usize,
    pub failed: usize,
}

impl SyncSummary {
    pub fn processed(&self) -> usize {
        self.synced + self.failed
    }
}

/// Resets the draining flag when the pass ends, even on early return.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drains the pending queue against the remote API.
pub struct SyncReconciler<A: FavoritesApi = HttpApi> {
    api: Arc<A>,
    cache: Arc<CacheManager>,
    queue: PendingQueue,
    notifier: Arc<dyn Notifier>,
    draining: AtomicBool,
}

impl<A: FavoritesApi> SyncReconciler<A> {
    pub fn new(api: Arc<A>, cache: Arc<CacheManager>, notifier: Arc<dyn Notifier>) -> Self {
        SyncReconciler {
            api,
            queue: PendingQueue::new(Arc::clone(&cache)),
            cache,
            notifier,
            draining: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ReconcilerState {
        if self.draining.load(Ordering::Acquire) {
            ReconcilerState::Draining
        } else {
            ReconcilerState::Idle
        }
    }

    /// Runs one pass over the queue.
    ///
    /// Returns `None` when another pass is already draining. An empty queue
    /// gives an empty summary and touches nothing else. Each action is tried
    /// once; failures go back to the tail of the queue for the next pass.
    pub async fn run_pass(&self) -> Option<SyncSummary> {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("reconciliation already running, skipping trigger");
            return None;
        }
        let _guard = DrainGuard(&self.draining);

        let actions = match self.queue.drain_all() {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!("failed to drain pending actions: {}", e);
                return Some(SyncSummary::default());
            }
        };
        if actions.is_empty() {
            return Some(SyncSummary::default());
        }

        tracing::info!("replaying {} pending actions", actions.len());
        let mut summary = SyncSummary::default();
        for action in actions {
            let result = match action.kind {
                ActionKind::ToggleFavorite => {
                    self.api
                        .toggle_favorite(action.movie_id, action.status)
                        .await
                }
            };
            match result {
                Ok(()) => summary.synced += 1,
                Err(e) => {
                    tracing::warn!(
                        "{} for movie {} failed, will retry: {}",
                        action.kind,
                        action.movie_id,
                        e
                    );
                    summary.failed += 1;
                    if let Err(e) = self.queue.requeue(action) {
                        tracing::warn!("failed to requeue action: {}", e);
                    }
                }
            }
        }

        self.cache.invalidate(&CacheKey::FavoriteMovies);
        self.cache.invalidate_class(KeyClass::FavoriteStatus);
        tracing::info!(
            "reconciliation done: {} synced, {} failed",
            summary.synced,
            summary.failed
        );
        self.notifier
            .notify(Notice::sync_complete(summary.synced, summary.failed));
        self.cache.flush().await;
        Some(summary)
    }

    /// Runs a pass on every restored edge until the sender is dropped.
    ///
    /// An edge that arrives while a pass is draining leaves the receiver
    /// marked changed, so another pass follows once the current one ends.
    /// Several such edges collapse into that one pass.
    pub async fn run(&self, mut restored: watch::Receiver<u64>) {
        while restored.changed().await.is_ok() {
            let epoch = *restored.borrow_and_update();
            tracing::debug!("restored edge {}, starting reconciliation", epoch);
            self.run_pass().await;
        }
    }
}
