// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending action queue for mutations made while offline.
//!
//! The queue lives in the cache under `["pendingActions"]` as an ordered
//! list, so it is persisted and restored together with the rest of the
//! cache. On reconnect, the reconciler drains it and replays the actions in
//! order.

use std::sync::Arc;

use reel_core::{CacheKey, PendingAction};

use crate::cache::CacheManager;
use crate::error::Result;

/// FIFO queue of pending remote mutations.
#[derive(Clone)]
pub struct PendingQueue {
    cache: Arc<CacheManager>,
}

impl PendingQueue {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        PendingQueue { cache }
    }

    /// Append an action at the tail. Returns the new queue length.
    pub fn enqueue(&self, action: PendingAction) -> Result<usize> {
        let movie_id = action.movie_id;
        let actions = self.cache.update(
            CacheKey::PendingActions,
            |current: Option<Vec<PendingAction>>| {
                let mut actions = current.unwrap_or_default();
                actions.push(action);
                actions
            },
        )?;
        tracing::debug!("queued action for movie {} ({} pending)", movie_id, actions.len());
        Ok(actions.len())
    }

    /// Atomically take every queued action, leaving the queue empty.
    ///
    /// A second drain without new enqueues returns an empty list, so two
    /// overlapping reconciliation passes never replay the same action.
    /// Actions another process persisted since the last sync with the
    /// snapshot are picked up first.
    pub fn drain_all(&self) -> Result<Vec<PendingAction>> {
        if let Err(e) = self.cache.refresh() {
            tracing::warn!("could not re-read pending actions from disk: {}", e);
        }
        let drained = self
            .cache
            .replace(CacheKey::PendingActions, &Vec::<PendingAction>::new())?
            .unwrap_or_default();
        if !drained.is_empty() {
            tracing::debug!("drained {} pending actions", drained.len());
        }
        Ok(drained)
    }

    /// Put a previously drained action back at the tail.
    pub fn requeue(&self, action: PendingAction) -> Result<()> {
        self.enqueue(action)?;
        Ok(())
    }

    /// Snapshot of the queue without removing anything.
    pub fn peek_all(&self) -> Vec<PendingAction> {
        self.cache
            .get(&CacheKey::PendingActions)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.peek_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
