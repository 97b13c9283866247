// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Commands around the pending action queue: `queue`, `sync` and `watch`.

use std::future::Future;
use std::io::Write;

use crate::display::format_action;
use crate::error::Result;
use crate::sync::{spawn_polling, FavoritesApi, SyncSummary};

use super::Context;

/// List actions waiting to be replayed, oldest first.
pub fn list<A: FavoritesApi>(ctx: &Context<A>, out: &mut impl Write) -> Result<()> {
    let actions = ctx.library.pending().peek_all();
    if actions.is_empty() {
        writeln!(out, "No pending actions.")?;
        return Ok(());
    }
    for action in &actions {
        writeln!(out, "{}", format_action(action))?;
    }
    Ok(())
}

/// Run one reconciliation pass if connected.
///
/// The sync-complete notice is emitted by the reconciler itself.
pub async fn sync_now<A: FavoritesApi>(ctx: &Context<A>, out: &mut impl Write) -> Result<()> {
    if !ctx.monitor.is_connected() {
        let pending = ctx.library.pending().len();
        writeln!(
            out,
            "Offline: {} action(s) will sync when back online.",
            pending
        )?;
        return Ok(());
    }
    match ctx.reconciler.run_pass().await {
        Some(SyncSummary { synced: 0, failed: 0 }) => writeln!(out, "Nothing to sync.")?,
        Some(_) => {}
        None => writeln!(out, "A sync is already running.")?,
    }
    Ok(())
}

/// Poll connectivity and reconcile on every restored edge until Ctrl-C.
pub async fn watch<A: FavoritesApi>(ctx: &Context<A>, out: &mut impl Write) -> Result<()> {
    watch_until(ctx, out, tokio::signal::ctrl_c()).await
}

async fn watch_until<A, S>(ctx: &Context<A>, out: &mut impl Write, shutdown: S) -> Result<()>
where
    A: FavoritesApi,
    S: Future<Output = std::io::Result<()>>,
{
    let interval = ctx.config.network.poll_interval();
    writeln!(
        out,
        "Watching connectivity every {}s (Ctrl-C to stop)...",
        interval.as_secs()
    )?;
    out.flush()?;

    // Actions left over from an earlier offline session
    if ctx.monitor.is_connected() && !ctx.library.pending().is_empty() {
        ctx.reconciler.run_pass().await;
    }

    let _subscription = ctx.monitor.subscribe(|state| {
        if state.is_connected {
            tracing::info!("back online");
        } else {
            tracing::info!("offline, changes will be queued");
        }
    });
    let restored = ctx.monitor.restored();
    let poller = spawn_polling(ctx.monitor.clone(), ctx.probe(), interval);

    let stopped = tokio::select! {
        _ = ctx.reconciler.run(restored) => Ok(()),
        signal = shutdown => signal,
    };
    poller.abort();
    stopped?;

    writeln!(out, "Stopped.")?;
    Ok(())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
