//! Cache Store Module
//!
//! Main cache engine: a HashMap of priced entries, a byte budget enforced by
//! admission control, and lazy TTL expiration. All state sits behind one mutex.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{
    parse_size, ByteSize, CacheEntry, CacheStats, EstimateSize, DEFAULT_MAX_MEMORY,
};

// == Store State ==
/// Everything guarded by the store lock.
///
/// Invariant: whenever the lock is released, `used_bytes` equals the sum of
/// `size` over `entries`.
#[derive(Debug)]
struct StoreState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    used_bytes: u64,
    max_bytes: u64,
    stats: CacheStats,
}

impl<V> StoreState<V> {
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.used_bytes -= entry.size;
        Some(entry)
    }

    /// Looks up a live entry, evicting it first if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&CacheEntry<V>> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.remove(key);
            self.stats.record_expired(1);
            debug!("Lazily expired key '{}'", key);
            return None;
        }
        self.entries.get(key)
    }

    fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        let mut released = 0;

        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                released += entry.size;
                false
            } else {
                true
            }
        });

        self.used_bytes -= released;
        let removed = before - self.entries.len();
        self.stats.record_expired(removed);
        removed
    }
}

// == Cache Store ==
/// Memory-bounded key-value store with per-entry TTL.
///
/// Writes are priced with [`EstimateSize`] and refused when they would push the
/// total past the byte budget; nothing is ever evicted to make room. Expired
/// entries disappear lazily on access, on [`keys`](Self::keys), or when the
/// background reaper calls [`purge_expired`](Self::purge_expired).
///
/// Share it between threads and tasks with `Arc<CacheStore<V>>`.
#[derive(Debug)]
pub struct CacheStore<V> {
    state: Mutex<StoreState<V>>,
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheStore<V> {
    // == Constructors ==
    /// Creates an empty store with the default 100 MB budget.
    pub fn new() -> Self {
        Self::with_max_memory(DEFAULT_MAX_MEMORY)
    }

    /// Creates an empty store with a budget of `max_bytes`.
    pub fn with_max_memory(max_bytes: u64) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::new(),
                used_bytes: 0,
                max_bytes,
                stats: CacheStats::new(),
            }),
        }
    }

    // == Set Max Memory ==
    /// Replaces the byte budget.
    ///
    /// Existing entries are kept even if they now exceed the budget; only later
    /// writes are checked against it.
    pub fn set_max_memory(&self, max_bytes: u64) {
        let mut state = self.state.lock();
        state.max_bytes = max_bytes;
        if state.used_bytes > max_bytes {
            warn!(
                "Memory budget lowered to {} bytes below current usage of {} bytes",
                max_bytes, state.used_bytes
            );
        }
    }

    /// Parses a size string such as `"2MB"` and applies it as the budget.
    ///
    /// Unparseable input applies the 100 MB default. Returns the budget applied.
    pub fn set_max_memory_str(&self, size: &str) -> ByteSize {
        let parsed = parse_size(size);
        self.set_max_memory(parsed.bytes);
        info!("Memory budget set to {}", parsed);
        parsed
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry.
    ///
    /// A zero `ttl` means the entry never expires. Returns `false`, leaving the
    /// store untouched, when the write would exceed the byte budget.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) -> bool
    where
        V: EstimateSize,
    {
        let key = key.into();
        // Price outside the lock; estimation never touches store state.
        let new_size = value.estimated_size() as u64;

        let mut state = self.state.lock();
        let previous_size = state.entries.get(&key).map_or(0, |entry| entry.size);
        let projected = (state.used_bytes - previous_size).saturating_add(new_size);

        if projected > state.max_bytes {
            state.stats.record_rejection();
            warn!(
                "Rejected key '{}': {} bytes would raise usage from {} to {} over budget of {} bytes",
                key, new_size, state.used_bytes, projected, state.max_bytes
            );
            return false;
        }

        debug!(
            "Stored key '{}' ({} bytes, ttl {:?}), usage {} -> {} bytes",
            key, new_size, ttl, state.used_bytes, projected
        );
        state.entries.insert(key, CacheEntry::new(value, new_size, ttl));
        state.used_bytes = projected;
        true
    }

    /// Like [`set`](Self::set) with a TTL in whole seconds.
    ///
    /// Zero and negative values both mean the entry never expires.
    pub fn set_with_ttl_secs(&self, key: impl Into<String>, value: V, ttl_secs: i64) -> bool
    where
        V: EstimateSize,
    {
        let ttl = u64::try_from(ttl_secs)
            .map(Duration::from_secs)
            .unwrap_or(Duration::ZERO);
        self.set(key, value, ttl)
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Returns None for absent keys and for expired ones, which are removed.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let mut state = self.state.lock();
        let value = state.live_entry(key).map(|entry| entry.value.clone());
        match value {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        value
    }

    /// Like [`get`](Self::get), also returning the remaining TTL (None = no expiry)
    /// read under the same lock.
    pub fn get_with_ttl(&self, key: &str) -> Option<(V, Option<Duration>)>
    where
        V: Clone,
    {
        let mut state = self.state.lock();
        let found = state
            .live_entry(key)
            .map(|entry| (entry.value.clone(), entry.ttl_remaining()));
        match found {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        found
    }

    // == Delete ==
    /// Removes `key` if present. Deleting an absent key is a no-op.
    pub fn del(&self, key: &str) {
        let mut state = self.state.lock();
        if let Some(entry) = state.remove(key) {
            debug!("Deleted key '{}' ({} bytes released)", key, entry.size);
        }
    }

    // == Exists ==
    /// Returns true if `key` holds a live entry. Expired entries are removed.
    pub fn exists(&self, key: &str) -> bool {
        self.state.lock().live_entry(key).is_some()
    }

    // == TTL ==
    /// Returns the remaining TTL of `key`.
    ///
    /// The outer Option is None when the key is absent or expired; the inner one
    /// is None when the entry never expires.
    pub fn ttl(&self, key: &str) -> Option<Option<Duration>> {
        self.state
            .lock()
            .live_entry(key)
            .map(CacheEntry::ttl_remaining)
    }

    // == Flush ==
    /// Removes every entry and resets usage to zero. The budget is kept.
    pub fn flush(&self) {
        let mut state = self.state.lock();
        let removed = state.entries.len();
        state.entries.clear();
        state.used_bytes = 0;
        info!("Flushed {} entries", removed);
    }

    // == Keys ==
    /// Returns the number of live entries, purging expired ones first.
    pub fn keys(&self) -> usize {
        let mut state = self.state.lock();
        state.purge_expired();
        state.entries.len()
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.state.lock().purge_expired()
    }

    // == Accessors ==
    /// Sum of the estimated sizes of all stored entries.
    pub fn used_memory(&self) -> u64 {
        self.state.lock().used_bytes
    }

    /// Current byte budget.
    pub fn max_memory(&self) -> u64 {
        self.state.lock().max_bytes
    }

    /// Number of stored entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the statistics and memory gauges.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            total_entries: state.entries.len(),
            used_bytes: state.used_bytes,
            max_bytes: state.max_bytes,
            ..state.stats.clone()
        }
    }
}
