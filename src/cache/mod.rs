//! Thread-safe bounded LRU cache with per-entry TTL.
//!
//! Memoizes whole resolution results keyed by a digest of the call
//! arguments. The store is the only state shared across concurrent calls;
//! every operation runs under one mutex and is O(1) amortized, so the lock
//! is never held anywhere near a geocoder call.

use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Collision-resistant digest of a call's arguments.
///
/// Built over a canonical JSON rendering of a sorted argument map, so the
/// order named arguments were supplied in never changes the key, while any
/// change in any value does.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    pub fn digest(parts: &BTreeMap<&str, Value>) -> Self {
        let canonical = serde_json::to_vec(parts).expect("serialize cache key parts");
        CacheKey(*blake3::hash(&canonical).as_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", &self.to_hex()[..8])
    }
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Bounded in-memory store: least-recently-used eviction at capacity, lazy
/// expiry after a fixed TTL.
pub struct MemoryCache<V> {
    entries: Mutex<LruCache<CacheKey, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> MemoryCache<V> {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Fetch a live entry, refreshing its recency but not its expiry. An
    /// expired entry is removed on the way out and reported absent.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    /// Insert or replace. Replacement refreshes both recency and expiry; a
    /// fresh insert at capacity evicts the least-recently-used entry.
    pub fn set(&self, key: CacheKey, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.lock().put(key, CacheEntry { value, expires_at });
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Drop every already-expired entry regardless of recency and return how
    /// many were removed. `get` self-cleans, so this is purely for periodic
    /// maintenance.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let expired: Vec<CacheKey> = entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn key(name: &str) -> CacheKey {
        let mut parts = BTreeMap::new();
        parts.insert("name", Value::from(name));
        CacheKey::digest(&parts)
    }

    fn cache(max_entries: usize, ttl_ms: u64) -> MemoryCache<String> {
        MemoryCache::new(max_entries, Duration::from_millis(ttl_ms))
    }

    #[test]
    fn set_then_get_returns_value() {
        let cache = cache(5, 1_000);
        cache.set(key("a"), "value".to_string());
        assert_eq!(cache.get(&key("a")), Some("value".to_string()));
        assert_eq!(cache.get(&key("missing")), None);
    }

    #[test]
    fn replacing_a_key_updates_its_value() {
        let cache = cache(5, 1_000);
        cache.set(key("a"), "one".to_string());
        cache.set(key("a"), "two".to_string());
        assert_eq!(cache.get(&key("a")), Some("two".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entries_expire_and_are_removed_on_get() {
        let cache = cache(5, 40);
        cache.set(key("a"), "value".to_string());
        assert_eq!(cache.get(&key("a")), Some("value".to_string()));

        thread::sleep(Duration::from_millis(80));
        assert_eq!(cache.get(&key("a")), None);
        assert!(cache.is_empty(), "expired entry should be gone after get");
    }

    #[test]
    fn replacement_restarts_the_ttl_window() {
        let cache = cache(5, 300);
        cache.set(key("a"), "one".to_string());
        thread::sleep(Duration::from_millis(200));
        cache.set(key("a"), "two".to_string());
        thread::sleep(Duration::from_millis(200));
        assert_eq!(cache.get(&key("a")), Some("two".to_string()));
    }

    #[test]
    fn capacity_overflow_evicts_least_recently_used() {
        let cache = cache(3, 1_000);
        cache.set(key("a"), "a".to_string());
        cache.set(key("b"), "b".to_string());
        cache.set(key("c"), "c".to_string());

        cache.set(key("d"), "d".to_string());
        assert_eq!(cache.get(&key("a")), None);
        assert_eq!(cache.get(&key("d")), Some("d".to_string()));

        // Touching "b" protects it from the next eviction.
        assert_eq!(cache.get(&key("b")), Some("b".to_string()));
        cache.set(key("e"), "e".to_string());
        assert_eq!(cache.get(&key("c")), None);
        assert_eq!(cache.get(&key("b")), Some("b".to_string()));
    }

    #[test]
    fn clear_removes_everything() {
        let cache = cache(5, 1_000);
        cache.set(key("a"), "a".to_string());
        cache.set(key("b"), "b".to_string());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key("a")), None);
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let cache = cache(5, 40);
        cache.set(key("a"), "a".to_string());
        cache.set(key("b"), "b".to_string());
        thread::sleep(Duration::from_millis(80));
        cache.set(key("c"), "c".to_string());

        assert_eq!(cache.sweep_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("c")), Some("c".to_string()));
    }

    #[test]
    fn key_digest_ignores_argument_order() {
        let mut forward = BTreeMap::new();
        forward.insert("input", Value::from("100 Gold St"));
        forward.insert("parallel", Value::from(true));

        let mut reversed = BTreeMap::new();
        reversed.insert("parallel", Value::from(true));
        reversed.insert("input", Value::from("100 Gold St"));

        assert_eq!(CacheKey::digest(&forward), CacheKey::digest(&reversed));
    }

    #[test]
    fn key_digest_is_sensitive_to_values() {
        let mut parts = BTreeMap::new();
        parts.insert("input", Value::from("100 Gold St"));
        parts.insert("parallel", Value::from(true));
        let original = CacheKey::digest(&parts);

        parts.insert("parallel", Value::from(false));
        assert_ne!(original, CacheKey::digest(&parts));

        parts.insert("parallel", Value::from(true));
        parts.insert("input", Value::from("100 Gold Ave"));
        assert_ne!(original, CacheKey::digest(&parts));
    }

    #[test]
    fn concurrent_access_stays_consistent() {
        let cache = Arc::new(cache(64, 1_000));
        let mut handles = Vec::new();
        for worker in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    let k = key(&format!("{worker}-{i}"));
                    cache.set(k.clone(), format!("{worker}-{i}"));
                    cache.get(&k);
                    cache.get(&key(&format!("{}-{i}", (worker + 1) % 8)));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("cache worker panicked");
        }
        assert!(cache.len() <= 64);
    }
}
