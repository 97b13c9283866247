// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring.
//!
//! [`ConnectivityMonitor`] turns reachability reports into a
//! [`ConnectivityState`] shared by every component. A report that flips the
//! state from disconnected to connected raises `show_online_banner` for a
//! fixed window and bumps the "restored" epoch; that edge is the only thing
//! that starts a reconciliation pass.
//!
//! Unknown reachability counts as connected.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::{ApiConfig, NetworkConfig};

/// Connectivity as seen by the rest of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityState {
    pub is_connected: bool,
    /// True for a short window right after connectivity came back.
    pub show_online_banner: bool,
}

impl Default for ConnectivityState {
    fn default() -> Self {
        ConnectivityState {
            is_connected: true,
            show_online_banner: false,
        }
    }
}

type Listener = Arc<dyn Fn(ConnectivityState) + Send + Sync>;

struct Inner {
    state: watch::Sender<ConnectivityState>,
    /// Incremented on every disconnected -> connected edge.
    restored: watch::Sender<u64>,
    /// Last reported connectivity, for edge detection.
    previous: Mutex<bool>,
    /// Identifies the most recent banner timer; older timers do nothing.
    banner_generation: AtomicU64,
    banner_duration: Duration,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

impl Inner {
    /// Applies `f` to the state and tells listeners if anything changed.
    fn update(&self, f: impl FnOnce(&mut ConnectivityState)) {
        let mut changed = None;
        self.state.send_if_modified(|state| {
            let before = *state;
            f(state);
            if *state != before {
                changed = Some(*state);
                true
            } else {
                false
            }
        });
        if let Some(state) = changed {
            let listeners: Vec<Listener> = lock(&self.listeners)
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect();
            for listener in listeners {
                listener(state);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Process-wide connectivity observer.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<Inner>,
}

impl ConnectivityMonitor {
    /// Create a monitor that starts out connected.
    pub fn new(banner_duration: Duration) -> Self {
        let (state, _) = watch::channel(ConnectivityState::default());
        let (restored, _) = watch::channel(0);
        ConnectivityMonitor {
            inner: Arc::new(Inner {
                state,
                restored,
                previous: Mutex::new(true),
                banner_generation: AtomicU64::new(0),
                banner_duration,
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.banner_duration())
    }

    /// Seeds the state from one immediate probe.
    ///
    /// The seed never raises the banner, even if the monitor previously
    /// assumed it was connected.
    pub async fn initialize(&self, probe: &dyn Reachability) {
        let connected = probe.probe().await.unwrap_or(true);
        *lock(&self.inner.previous) = connected;
        self.inner.update(|state| state.is_connected = connected);
        tracing::debug!("initial connectivity: {}", connected);
    }

    /// Feeds one reachability report into the monitor.
    ///
    /// `None` means the platform could not tell and is treated as connected.
    pub fn handle_change(&self, reported: Option<bool>) {
        let connected = reported.unwrap_or(true);
        let restored = {
            let mut previous = lock(&self.inner.previous);
            let restored = !*previous && connected;
            *previous = connected;
            restored
        };

        if restored {
            tracing::info!("connection restored");
            let generation = self.inner.banner_generation.fetch_add(1, Ordering::AcqRel) + 1;
            self.inner.update(|state| {
                state.is_connected = true;
                state.show_online_banner = true;
            });
            self.inner.restored.send_modify(|epoch| *epoch += 1);
            self.schedule_banner_clear(generation);
        } else {
            if !connected && self.is_connected() {
                tracing::info!("connection lost");
            }
            self.inner.update(|state| state.is_connected = connected);
        }
    }

    /// Clears the banner after the window unless a newer edge reset it.
    fn schedule_banner_clear(&self, generation: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime, online banner will not auto-clear");
            return;
        };
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let duration = self.inner.banner_duration;
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            let Some(inner) = inner.upgrade() else {
                return;
            };
            if inner.banner_generation.load(Ordering::Acquire) == generation {
                inner.update(|state| state.show_online_banner = false);
            }
        });
    }

    pub fn state(&self) -> ConnectivityState {
        *self.inner.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected
    }

    pub fn show_online_banner(&self) -> bool {
        self.state().show_online_banner
    }

    /// Registers a listener called with every state change.
    ///
    /// The listener stays attached until the returned [`Subscription`] is
    /// dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ConnectivityState) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).push((id, Arc::new(listener)));
        Subscription {
            id,
            inner: Some(Arc::downgrade(&self.inner)),
        }
    }

    /// Receiver of the current state, for async consumers.
    pub fn watch(&self) -> watch::Receiver<ConnectivityState> {
        self.inner.state.subscribe()
    }

    /// Receiver of the restored epoch; it changes once per restored edge.
    pub fn restored(&self) -> watch::Receiver<u64> {
        self.inner.restored.subscribe()
    }
}

/// Handle to a registered listener.
pub struct Subscription {
    id: u64,
    inner: Option<Weak<Inner>>,
}

impl Subscription {
    /// Detaches the listener.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(inner) = self.inner.take().and_then(|weak| weak.upgrade()) {
            lock(&inner.listeners).retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Source of reachability reports.
pub trait Reachability: Send + Sync {
    /// `Some(connected)`, or `None` when reachability cannot be determined.
    fn probe(&self) -> Pin<Box<dyn Future<Output = Option<bool>> + Send + '_>>;
}

/// Probes by opening a TCP connection to the API host.
pub struct TcpReachability {
    address: Option<String>,
    timeout: Duration,
}

impl TcpReachability {
    pub fn new(address: Option<String>, timeout: Duration) -> Self {
        TcpReachability { address, timeout }
    }

    pub fn from_config(api: &ApiConfig, network: &NetworkConfig) -> Self {
        Self::new(api.probe_address(), network.probe_timeout())
    }
}

impl Reachability for TcpReachability {
    fn probe(&self) -> Pin<Box<dyn Future<Output = Option<bool>> + Send + '_>> {
        Box::pin(async move {
            let address = self.address.as_deref()?;
            match tokio::time::timeout(self.timeout, TcpStream::connect(address)).await {
                Ok(Ok(_)) => Some(true),
                Ok(Err(e)) => {
                    tracing::debug!("probe {} failed: {}", address, e);
                    Some(false)
                }
                Err(_) => {
                    tracing::debug!("probe {} timed out", address);
                    Some(false)
                }
            }
        })
    }
}

/// Always reports the same answer. Used for `--offline` and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticReachability(pub Option<bool>);

impl Reachability for StaticReachability {
    fn probe(&self) -> Pin<Box<dyn Future<Output = Option<bool>> + Send + '_>> {
        let answer = self.0;
        Box::pin(async move { answer })
    }
}

/// Feeds periodic probe results into the monitor until the task is aborted.
pub fn spawn_polling(
    monitor: ConnectivityMonitor,
    probe: Arc<dyn Reachability>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let reported = probe.probe().await;
            monitor.handle_change(reported);
        }
    })
}
