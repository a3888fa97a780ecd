//! In-memory TTL cache with negative ("blocked") entries.
//!
//! Floor prices are memoised under their collection name for
//! [`DEFAULT_TTL`](crate::config::DEFAULT_TTL). Providers that were
//! rate-limited get a separate blocked marker with the shorter
//! [`BLOCKED_TTL`](crate::config::BLOCKED_TTL). Expired entries are evicted
//! lazily when they are next looked at.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::config;

/// A cached value and the instant after which it is stale.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug)]
struct Entries<V> {
    values: HashMap<String, CacheEntry<V>>,
    blocked: HashMap<String, CacheEntry<()>>,
}

/// Thread-safe string-keyed cache with per-entry expiry.
///
/// Values and blocked markers live in separate namespaces, so blocking a
/// key never hides or overwrites its value and vice versa. Concurrent
/// writes to the same key are last-write-wins.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<Entries<V>>,
    default_ttl: Duration,
    blocked_ttl: Duration,
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the default 60 minute / 10 minute TTLs.
    pub fn new() -> Self {
        Self::with_ttls(config::DEFAULT_TTL, config::BLOCKED_TTL)
    }

    pub fn with_ttls(default_ttl: Duration, blocked_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(Entries {
                values: HashMap::new(),
                blocked: HashMap::new(),
            }),
            default_ttl,
            blocked_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn blocked_ttl(&self) -> Duration {
        self.blocked_ttl
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries<V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries<V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the value for `key` if present and not expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.read();
            match entries.values.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.write();
        // Another writer may have refreshed the entry in between.
        match entries.values.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.values.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key` with the default TTL, replacing any
    /// previous value.
    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        self.write()
            .values
            .insert(key.to_string(), CacheEntry::new(value, ttl));
    }

    /// Mark `key` as blocked for the blocked TTL.
    pub fn set_blocked(&self, key: &str) {
        self.set_blocked_with_ttl(key, self.blocked_ttl);
    }

    pub fn set_blocked_with_ttl(&self, key: &str, ttl: Duration) {
        self.write()
            .blocked
            .insert(key.to_string(), CacheEntry::new((), ttl));
    }

    /// True while a non-expired blocked marker exists for `key`.
    pub fn is_blocked(&self, key: &str) -> bool {
        let now = Instant::now();
        {
            let entries = self.read();
            match entries.blocked.get(key) {
                None => return false,
                Some(entry) if !entry.is_expired(now) => return true,
                Some(_) => {}
            }
        }

        let mut entries = self.write();
        match entries.blocked.get(key) {
            Some(entry) if !entry.is_expired(now) => true,
            Some(_) => {
                entries.blocked.remove(key);
                false
            }
            None => false,
        }
    }

    /// Remove the value and any blocked marker for `key`.
    ///
    /// Returns `true` if anything was removed.
    pub fn delete(&self, key: &str) -> bool {
        let mut entries = self.write();
        let had_value = entries.values.remove(key).is_some();
        let had_block = entries.blocked.remove(key).is_some();
        had_value || had_block
    }

    pub fn clear(&self) {
        let mut entries = self.write();
        entries.values.clear();
        entries.blocked.clear();
    }

    /// Number of stored values, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired value and blocked marker; returns how many
    /// entries were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write();
        let before = entries.values.len() + entries.blocked.len();
        entries.values.retain(|_, e| !e.is_expired(now));
        entries.blocked.retain(|_, e| !e.is_expired(now));
        before - (entries.values.len() + entries.blocked.len())
    }
}
