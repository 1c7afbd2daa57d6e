//! Persistent cache stores and the timestamped entry envelope
//!
//! A [`ConfigStore`] is an injected key-value capability holding serialized
//! JSON blobs. Entries are wrapped in a [`CacheEntry`] envelope carrying the
//! write timestamp; freshness is decided at read time against a per-resolver
//! TTL, so the store itself stays a dumb string map.
//!
//! Two implementations are provided:
//! - [`MemoryStore`]: in-memory Moka cache, used in tests and short-lived
//!   processes
//! - [`FileStore`]: one JSON file per key under a root directory

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Errors raised by store implementations.
///
/// Callers treat writes as best-effort; these errors are logged, never
/// surfaced to the rendering path.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store write failed: {0}")]
    Write(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Injected key-value store for serialized cache entries.
pub trait ConfigStore: Send + Sync + 'static {
    /// Read the raw serialized entry, or None if absent/unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write the raw serialized entry.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Remove an entry (manual cache-busting).
    fn remove(&self, key: &str);
}

/// A cached raw remote document tagged with its write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Raw remote document as persisted (not merged with defaults)
    pub data: Value,
    /// Write time in epoch milliseconds
    pub timestamp: u64,
}

/// Current time in epoch milliseconds.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Read a cache entry, returning its data only while younger than `ttl`.
///
/// A missing entry, corrupt JSON, or an expired timestamp are all treated as
/// a miss. Never panics and never surfaces an error.
pub fn read_fresh<S: ConfigStore + ?Sized>(store: &S, key: &str, ttl: Duration) -> Option<Value> {
    read_fresh_at(store, key, ttl, now_ms())
}

fn read_fresh_at<S: ConfigStore + ?Sized>(
    store: &S,
    key: &str,
    ttl: Duration,
    now: u64,
) -> Option<Value> {
    let raw = store.get(key)?;

    let entry: CacheEntry = match serde_json::from_str(&raw) {
        Ok(entry) => entry,
        Err(e) => {
            debug!("Discarding corrupt cache entry for key {}: {}", key, e);
            return None;
        }
    };

    let age = now.saturating_sub(entry.timestamp);
    if u128::from(age) >= ttl.as_millis() {
        debug!("Cache entry expired for key {} (age {}ms)", key, age);
        return None;
    }

    Some(entry.data)
}

/// Persist a raw remote document under `key` with a fresh timestamp.
///
/// Failures are logged and swallowed; caching is a performance optimization,
/// never a correctness requirement.
pub fn write_through<S: ConfigStore + ?Sized>(store: &S, key: &str, data: &Value) {
    let entry = CacheEntry {
        data: data.clone(),
        timestamp: now_ms(),
    };

    match serde_json::to_string(&entry) {
        Ok(json) => {
            if let Err(e) = store.set(key, json) {
                warn!("Cache write failed for key {}: {}. Continuing.", key, e);
            }
        }
        Err(e) => {
            warn!("Cache entry serialization failed for key {}: {}", key, e);
        }
    }
}

/// In-memory store backed by a Moka cache with a capacity bound.
pub struct MemoryStore {
    entries: Cache<String, String>,
}

impl MemoryStore {
    /// Create a store holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(max_capacity).build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.invalidate(key);
    }
}

/// File-backed store: one JSON file per key under a root directory.
///
/// Key characters outside `[A-Za-z0-9_-]` are mapped to `-` so keys are
/// always valid file names.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl ConfigStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| StoreError::Write(e.to_string()))
    }

    fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }
}
