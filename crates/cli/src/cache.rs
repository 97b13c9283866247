// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide query cache.
//!
//! [`CacheManager`] maps structured [`CacheKey`]s to JSON values. Every
//! component shares one manager through an `Arc` and goes through its
//! key-scoped API; there is no other path to the underlying map.
//!
//! Each entry carries the time it was written and an `invalidated` flag.
//! [`CacheManager::get`] returns whatever is stored, stale or not, so callers
//! can fall back to old data while offline. [`CacheManager::get_fresh`] only
//! returns entries that are inside their key class's freshness window and
//! were not invalidated since the last write.
//!
//! Durability is best effort: writes land in memory immediately and reach
//! disk on the next [`CacheManager::persist`] / [`CacheManager::flush`].
//!
//! Several processes may share one snapshot (`reel watch` next to one-shot
//! commands). Persisting is a read-merge-write under the exclusive file lock:
//! entries written by another process since this one last synced with the
//! file are kept, and the `["pendingActions"]` list is merged three ways
//! against the last synced copy so actions are neither lost nor revived.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use reel_core::{jsonl, CacheKey, ClockSource, KeyClass, PendingAction, SystemClock};

use crate::config::CacheConfig;
use crate::error::Result;

/// Storage namespace; the snapshot file is `<namespace>.jsonl`.
pub const CACHE_NAMESPACE: &str = "MOVIE_APP_QUERY_CACHE";

/// Freshness windows per key class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// Window for server data without a more specific setting.
    pub default: Duration,
    /// Window for `["favoriteStatus", id]`.
    pub favorite_status: Duration,
    /// Age after which server data is dropped on restore.
    pub gc: Duration,
}

impl Default for Freshness {
    fn default() -> Self {
        Freshness::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for Freshness {
    fn from(config: &CacheConfig) -> Self {
        Freshness {
            default: Duration::from_secs(config.stale_secs),
            favorite_status: Duration::from_secs(config.favorite_status_stale_secs),
            gc: Duration::from_secs(config.gc_secs),
        }
    }
}

impl Freshness {
    /// Freshness window of a class, `None` when it never goes stale.
    pub fn window(&self, class: KeyClass) -> Option<Duration> {
        if class.is_local_state() {
            return None;
        }
        match class {
            KeyClass::FavoriteStatus => Some(self.favorite_status),
            _ => Some(self.default),
        }
    }
}

/// A stored cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    key: CacheKey,
    value: Value,
    /// Write time in milliseconds since Unix epoch.
    updated_at: u64,
    #[serde(default)]
    invalidated: bool,
}

/// What the snapshot file held when this process last read or wrote it.
#[derive(Debug, Default)]
struct Baseline {
    versions: BTreeMap<CacheKey, u64>,
    queue: Vec<PendingAction>,
}

impl Baseline {
    fn of<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut baseline = Baseline::default();
        for entry in entries {
            if entry.key == CacheKey::PendingActions {
                baseline.queue = queue_of(Some(entry));
            }
            baseline.versions.insert(entry.key, entry.updated_at);
        }
        baseline
    }
}

/// Process-wide key-value cache with optional on-disk snapshot.
pub struct CacheManager {
    entries: Mutex<BTreeMap<CacheKey, Entry>>,
    baseline: Mutex<Baseline>,
    freshness: Freshness,
    clock: Arc<dyn ClockSource>,
    /// Snapshot file, `None` for a memory-only cache.
    path: Option<PathBuf>,
}

impl CacheManager {
    /// Creates a cache that never touches disk.
    pub fn in_memory(freshness: Freshness, clock: Arc<dyn ClockSource>) -> Self {
        CacheManager {
            entries: Mutex::new(BTreeMap::new()),
            baseline: Mutex::new(Baseline::default()),
            freshness,
            clock,
            path: None,
        }
    }

    /// Opens the cache stored in `dir`, restoring the last snapshot.
    ///
    /// Server data older than the garbage-collection window is dropped.
    /// A snapshot that cannot be parsed is moved aside and the cache starts
    /// empty.
    pub fn open(dir: &Path, freshness: Freshness, clock: Arc<dyn ClockSource>) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{CACHE_NAMESPACE}.jsonl"));

        let restored: Vec<Entry> = {
            let _lock = lock_snapshot(&path, false)?;
            match jsonl::read_all(&path) {
                Ok(entries) => entries,
                Err(reel_core::Error::CorruptedData(msg)) => {
                    let aside = path.with_extension("jsonl.corrupt");
                    tracing::warn!(
                        "cache snapshot unreadable ({}), moving it to {}",
                        msg,
                        aside.display()
                    );
                    std::fs::rename(&path, &aside)?;
                    Vec::new()
                }
                Err(e) => return Err(e.into()),
            }
        };

        let baseline = Baseline::of(&restored);
        let now = clock.now_ms();
        let gc_ms = duration_ms(freshness.gc);
        let mut entries = BTreeMap::new();
        let mut dropped = 0usize;
        for entry in restored {
            let expired = !entry.key.class().is_local_state()
                && now.saturating_sub(entry.updated_at) > gc_ms;
            if expired {
                dropped += 1;
                continue;
            }
            entries.insert(entry.key, entry);
        }
        tracing::debug!(
            "restored {} cache entries from {} ({} expired)",
            entries.len(),
            path.display(),
            dropped
        );

        Ok(CacheManager {
            entries: Mutex::new(entries),
            baseline: Mutex::new(baseline),
            freshness,
            clock,
            path: Some(path),
        })
    }

    /// Opens the cache with the system clock.
    pub fn open_default(dir: &Path, freshness: Freshness) -> Result<Self> {
        Self::open(dir, freshness, Arc::new(SystemClock))
    }

    /// Current time according to the cache's clock, in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Path of the on-disk snapshot, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<CacheKey, Entry>> {
        lock(&self.entries)
    }

    /// Returns the stored value regardless of freshness.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = self.lock().get(key).map(|e| e.value.clone())?;
        decode(key, value)
    }

    /// Returns the stored value only if it is still fresh.
    pub fn get_fresh<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = {
            let entries = self.lock();
            let entry = entries.get(key)?;
            if self.entry_is_stale(entry) {
                return None;
            }
            entry.value.clone()
        };
        decode(key, value)
    }

    /// True when the key is absent, invalidated or past its freshness window.
    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.lock()
            .get(key)
            .map(|entry| self.entry_is_stale(entry))
            .unwrap_or(true)
    }

    fn entry_is_stale(&self, entry: &Entry) -> bool {
        if entry.invalidated {
            return true;
        }
        match self.freshness.window(entry.key.class()) {
            Some(window) => {
                self.clock.now_ms().saturating_sub(entry.updated_at) > duration_ms(window)
            }
            None => false,
        }
    }

    /// Stores a value; it is visible to every subsequent read.
    pub fn set<T: Serialize + ?Sized>(&self, key: CacheKey, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let updated_at = self.clock.now_ms();
        self.lock().insert(
            key,
            Entry {
                key,
                value,
                updated_at,
                invalidated: false,
            },
        );
        tracing::debug!("cache set {}", key);
        Ok(())
    }

    /// Read-modify-write of a single key under the cache lock.
    ///
    /// `f` receives the current value (if any) and returns the new one.
    pub fn update<T, F>(&self, key: CacheKey, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> T,
    {
        let now = self.clock.now_ms();
        let mut entries = self.lock();
        let current = entries
            .get(&key)
            .and_then(|e| decode::<T>(&key, e.value.clone()));
        let next = f(current);
        let value = serde_json::to_value(&next)?;
        entries.insert(
            key,
            Entry {
                key,
                value,
                updated_at: now,
                invalidated: false,
            },
        );
        Ok(next)
    }

    /// Atomically stores `value` and returns what was stored before.
    pub fn replace<T>(&self, key: CacheKey, value: &T) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let value = serde_json::to_value(value)?;
        let now = self.clock.now_ms();
        let previous = self.lock().insert(
            key,
            Entry {
                key,
                value,
                updated_at: now,
                invalidated: false,
            },
        );
        Ok(previous.and_then(|e| decode(&key, e.value)))
    }

    /// Marks an entry stale so the next fresh read refetches it.
    pub fn invalidate(&self, key: &CacheKey) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.invalidated = true;
            tracing::debug!("cache invalidate {}", key);
        }
    }

    /// Marks every entry of a class stale. Returns how many were marked.
    pub fn invalidate_class(&self, class: KeyClass) -> usize {
        let mut marked = 0;
        for entry in self.lock().values_mut() {
            if entry.key.class() == class {
                entry.invalidated = true;
                marked += 1;
            }
        }
        tracing::debug!("cache invalidate [\"{}\", *] ({} entries)", class, marked);
        marked
    }

    /// Removes an entry. Returns true if it existed.
    pub fn remove(&self, key: &CacheKey) -> bool {
        self.lock().remove(key).is_some()
    }

    /// All keys of a class, in key order.
    pub fn keys_of(&self, class: KeyClass) -> Vec<CacheKey> {
        self.lock()
            .keys()
            .filter(|k| k.class() == class)
            .copied()
            .collect()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Merges the snapshot on disk into memory, then writes the result back.
    ///
    /// A no-op for memory-only caches.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let _lock = lock_snapshot(path, true)?;
        let snapshot = self.merge_from_disk(path)?;
        jsonl::replace_all(path, &snapshot)?;
        *lock(&self.baseline) = Baseline::of(&snapshot);
        tracing::debug!("persisted {} cache entries", snapshot.len());
        Ok(())
    }

    /// Picks up changes other processes wrote to the snapshot.
    ///
    /// A no-op for memory-only caches.
    pub fn refresh(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let _lock = lock_snapshot(path, false)?;
        let Some(disk) = read_snapshot(path)? else {
            return Ok(());
        };
        {
            let mut entries = self.lock();
            merge(&mut entries, &disk, &lock(&self.baseline))?;
        }
        *lock(&self.baseline) = Baseline::of(&disk);
        Ok(())
    }

    /// Merges the file into memory and returns the entries to write.
    fn merge_from_disk(&self, path: &Path) -> Result<Vec<Entry>> {
        let mut entries = self.lock();
        if let Some(disk) = read_snapshot(path)? {
            merge(&mut entries, &disk, &lock(&self.baseline))?;
        }
        Ok(entries.values().cloned().collect())
    }

    /// Persists on the blocking pool. Failures are logged, not returned.
    pub async fn flush(self: &Arc<Self>) {
        if self.path.is_none() {
            return;
        }
        let cache = Arc::clone(self);
        match tokio::task::spawn_blocking(move || cache.persist()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("failed to persist cache: {}", e),
            Err(e) => tracing::warn!("cache persist task failed: {}", e),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Reads the snapshot for merging. `None` when it cannot be parsed; the
/// next write replaces it.
fn read_snapshot(path: &Path) -> Result<Option<Vec<Entry>>> {
    match jsonl::read_all(path) {
        Ok(entries) => Ok(Some(entries)),
        Err(reel_core::Error::CorruptedData(msg)) => {
            tracing::warn!("cache snapshot unreadable, not merging: {}", msg);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn queue_of(entry: Option<&Entry>) -> Vec<PendingAction> {
    entry
        .and_then(|e| decode(&e.key, e.value.clone()))
        .unwrap_or_default()
}

/// `items` with one occurrence of each element of `gone` taken out.
fn without(mut items: Vec<PendingAction>, gone: &[PendingAction]) -> Vec<PendingAction> {
    for action in gone {
        if let Some(pos) = items.iter().position(|a| a == action) {
            items.remove(pos);
        }
    }
    items
}

/// Folds the on-disk entries into `ours`.
///
/// An entry another process wrote after `baseline` replaces ours unless
/// ours is newer. The pending queue keeps our order, drops actions another
/// process removed and appends actions another process added.
fn merge(ours: &mut BTreeMap<CacheKey, Entry>, disk: &[Entry], baseline: &Baseline) -> Result<()> {
    let mut disk_queue = None;
    for theirs in disk {
        if theirs.key == CacheKey::PendingActions {
            disk_queue = Some(theirs);
            continue;
        }
        let changed_elsewhere = baseline
            .versions
            .get(&theirs.key)
            .map_or(true, |synced| theirs.updated_at > *synced);
        if !changed_elsewhere {
            continue;
        }
        let ours_newer = ours
            .get(&theirs.key)
            .is_some_and(|e| e.updated_at > theirs.updated_at);
        if !ours_newer {
            ours.insert(theirs.key, theirs.clone());
        }
    }

    let on_disk = queue_of(disk_queue);
    let removed_elsewhere = without(baseline.queue.clone(), &on_disk);
    let added_elsewhere = without(on_disk, &baseline.queue);
    if removed_elsewhere.is_empty() && added_elsewhere.is_empty() {
        return Ok(());
    }
    tracing::debug!(
        "merging pending actions: {} added and {} removed by another process",
        added_elsewhere.len(),
        removed_elsewhere.len()
    );

    let key = CacheKey::PendingActions;
    let current = ours.get(&key);
    let updated_at = current
        .map(|e| e.updated_at)
        .into_iter()
        .chain(disk_queue.map(|e| e.updated_at))
        .max()
        .unwrap_or_default();
    let mut merged = without(queue_of(current), &removed_elsewhere);
    merged.extend(added_elsewhere);
    ours.insert(
        key,
        Entry {
            key,
            value: serde_json::to_value(&merged)?,
            updated_at,
            invalidated: false,
        },
    );
    Ok(())
}

fn decode<T: DeserializeOwned>(key: &CacheKey, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("ignoring cache entry {} with unexpected shape: {}", key, e);
            None
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Takes an advisory lock on the snapshot's lock file.
///
/// Exclusive for writers, shared for readers; the lock is released when the
/// returned file is dropped.
fn lock_snapshot(path: &Path, exclusive: bool) -> Result<File> {
    let lock_path = path.with_extension("lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)?;
    if exclusive {
        file.lock_exclusive()?;
    } else {
        file.lock_shared()?;
    }
    Ok(file)
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
