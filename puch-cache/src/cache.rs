//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use puch_core::constants::{CACHE_SWEEP_TTL, DEFAULT_CACHE_MAX_ENTRIES};

use crate::clock::{Clock, SystemClock};

/// Cache entry. Never mutated after insertion; a `set` replaces it whole.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    written_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.written_at) < ttl
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Entries older than this are swept when the cache is full
    pub sweep_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            sweep_ttl_seconds: CACHE_SWEEP_TTL.as_secs(),
        }
    }
}

impl CacheConfig {
    /// Creates a config with the given bound.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Default::default()
        }
    }
}

/// In-memory cache keyed by string.
///
/// Thread-safe. Staleness is judged on read against the caller's TTL; stale
/// entries are skipped, not removed, until the cache fills up.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            clock,
        }
    }

    /// Returns the value under `key` if it was written less than `ttl` ago.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| e.is_fresh(now, ttl))
            .map(|e| e.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// A cache bounded to zero entries stores nothing.
    pub fn set(&self, key: impl Into<String>, value: V) {
        if self.config.max_entries == 0 {
            return;
        }
        let key = key.into();
        let now = self.clock.now();
        let mut entries = self.entries.write();

        if !entries.contains_key(&key) && entries.len() >= self.config.max_entries {
            let sweep_ttl = Duration::from_secs(self.config.sweep_ttl_seconds);
            let before = entries.len();
            entries.retain(|_, e| e.is_fresh(now, sweep_ttl));
            debug!(swept = before - entries.len(), "Cache full, swept stale entries");

            // Still at capacity? Remove oldest entry
            if entries.len() >= self.config.max_entries {
                if let Some(oldest_key) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.written_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest_key);
                }
            }
        }

        entries.insert(key, CacheEntry { value, written_at: now });
    }

    /// Removes a cached entry.
    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Drops every entry written `ttl` or longer ago.
    pub fn purge_older_than(&self, ttl: Duration) {
        let now = self.clock.now();
        self.entries.write().retain(|_, e| e.is_fresh(now, ttl));
    }

    /// Returns the number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics relative to `ttl`.
    pub fn stats(&self, ttl: Duration) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.read();
        let fresh = entries.values().filter(|e| e.is_fresh(now, ttl)).count();
        CacheStats {
            total_entries: entries.len(),
            fresh_entries: fresh,
            stale_entries: entries.len() - fresh,
            capacity: self.config.max_entries,
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Total entries (including stale)
    pub total_entries: usize,
    /// Entries younger than the queried TTL
    pub fresh_entries: usize,
    /// Entries at or past the queried TTL
    pub stale_entries: usize,
    /// Maximum capacity
    pub capacity: usize,
}
