//! Time-to-live cache for catalog API responses.
//!
//! Staleness is a pure function of entry age: an entry is live while
//! `age <= ttl`. Expired entries are removed lazily on read, or in bulk by
//! [`TtlCache::sweep_expired`], which the surrounding application is expected
//! to drive from its own scheduler. The cache starts no timers of its own.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use atlas_core::{Character, CharacterId, CharacterPage};

/// Cache key for pages and individual characters.
///
/// Search results are deliberately not cached: the set of distinct queries is
/// unbounded and rarely repeated within a TTL window.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// One page of the character listing.
    Page(u32),
    /// A single character record.
    Character(CharacterId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Page(CharacterPage),
    Character(Box<Character>),
}

/// A value plus the instant it was stored.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: CacheValue,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.stored_at) > ttl
    }
}

/// Point-in-time cache occupancy counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// All entries, live and expired.
    pub total: usize,
    /// Entries with `age <= ttl`.
    pub valid: usize,
    /// Entries past their TTL that have not been swept yet.
    pub expired: usize,
}

/// In-memory TTL cache keyed by [`CacheKey`].
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl TtlCache {
    /// Create an empty cache with the given time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a key, treating an expired entry as a miss.
    ///
    /// An expired entry found here is removed on the spot (lazy sweep).
    pub fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        let mut entries = self.lock();
        let expired = entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(Instant::now(), self.ttl));
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value, superseding any previous entry for the key.
    pub fn insert(&self, key: CacheKey, value: CacheValue) {
        self.lock().insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Count live and expired entries without mutating the cache.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.lock();
        let expired = entries
            .values()
            .filter(|entry| entry.is_expired(now, self.ttl))
            .count();
        CacheStats {
            total: entries.len(),
            valid: entries.len() - expired,
            expired,
        }
    }

    /// Remove all expired entries, returning how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, self.ttl));
        before - entries.len()
    }
}
