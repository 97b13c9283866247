// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod catalog;
pub mod config;
pub mod favorite;
pub mod queue;
pub mod status;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::Path;
use std::sync::Arc;

use crate::cache::{CacheManager, Freshness};
use crate::config::{resolve_data_dir, Config};
use crate::error::Result;
use crate::favorites::Library;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::sync::{
    ConnectivityMonitor, FavoriteController, FavoritesApi, HttpApi, Reachability, RetryPolicy,
    StaticReachability, SyncReconciler, TcpReachability,
};

/// Everything a command needs, sharing one cache and one connectivity monitor.
pub struct Context<A: FavoritesApi = HttpApi> {
    pub config: Config,
    pub cache: Arc<CacheManager>,
    pub monitor: ConnectivityMonitor,
    pub library: Library<A>,
    pub controller: FavoriteController<A>,
    pub reconciler: SyncReconciler<A>,
    probe: Arc<dyn Reachability>,
}

impl Context<HttpApi> {
    /// Loads config and cache from the data directory and probes connectivity once.
    pub async fn open(data_dir: Option<&Path>, offline: bool) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir)?;
        let config = Config::load(&data_dir)?;
        let cache = CacheManager::open_default(&data_dir, Freshness::from(&config.cache))?;
        let api = HttpApi::new(&config.api)?;

        let probe: Arc<dyn Reachability> = if offline {
            Arc::new(StaticReachability(Some(false)))
        } else {
            Arc::new(TcpReachability::from_config(&config.api, &config.network))
        };

        let ctx = Context::assemble(
            config,
            Arc::new(api),
            Arc::new(cache),
            probe,
            Arc::new(ConsoleNotifier),
        );
        ctx.monitor.initialize(ctx.probe.as_ref()).await;
        tracing::debug!(connected = ctx.monitor.is_connected(), "context ready");
        Ok(ctx)
    }
}

impl<A: FavoritesApi> Context<A> {
    /// Wires the components together. The monitor starts connected until
    /// [`ConnectivityMonitor::initialize`] runs.
    pub fn assemble(
        config: Config,
        api: Arc<A>,
        cache: Arc<CacheManager>,
        probe: Arc<dyn Reachability>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let monitor = ConnectivityMonitor::from_config(&config.network);
        let controller = FavoriteController::new(
            Arc::clone(&api),
            Arc::clone(&cache),
            monitor.clone(),
            Arc::clone(&notifier),
            RetryPolicy::from(&config.retry),
        );
        let reconciler = SyncReconciler::new(Arc::clone(&api), Arc::clone(&cache), notifier);
        let library = Library::new(api, Arc::clone(&cache), monitor.clone());
        Context {
            config,
            cache,
            monitor,
            library,
            controller,
            reconciler,
            probe,
        }
    }

    pub fn probe(&self) -> Arc<dyn Reachability> {
        Arc::clone(&self.probe)
    }

    /// Writes the cache snapshot. Called once a command is done.
    pub async fn finish(&self) {
        self.cache.flush().await;
    }
}
