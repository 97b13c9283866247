// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-aware favorites synchronization.
//!
//! Toggles are applied to the local cache first and reach the remote API
//! either immediately or, while offline, through the pending action queue.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Controller  │────►│ FavoritesApi │────►│    Remote    │
//! │  (toggle)    │     │   (trait)    │◄────│    Server    │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!    │        │               ▲
//!    │        ▼               │
//!    │  ┌──────────────┐  ┌──────────────┐
//!    │  │ PendingQueue │◄─│  Reconciler  │◄── restored edge
//!    │  │  (offline)   │  │ (drain pass) │         │
//!    │  └──────────────┘  └──────────────┘  ┌──────────────┐
//!    └───────────────────────────────────── │ Connectivity │
//!                                           │   Monitor    │
//!                                           └──────────────┘
//! ```
//!
//! # Features
//!
//! - Optimistic updates with rollback after exhausted retries
//! - Durable FIFO queue stored in the cache under `["pendingActions"]`
//! - One reconciliation pass per disconnected -> connected edge
//! - Exponential backoff for immediate remote calls
//! - Injectable API trait for testing

mod api;
mod backoff;
mod connectivity;
mod controller;
mod queue;
mod reconciler;

pub use api::{ApiError, ApiFuture, ApiResult, FavoritesApi, HttpApi};
pub use backoff::RetryPolicy;
pub use connectivity::{
    spawn_polling, ConnectivityMonitor, ConnectivityState, Reachability, StaticReachability,
    Subscription, TcpReachability,
};
pub use controller::{FavoriteController, FavoriteMutation, ToggleOutcome};
pub use queue::PendingQueue;
pub use reconciler::{ReconcilerState, SyncReconciler, SyncSummary};

#[cfg(test)]
pub(crate) mod test_helpers;
