//! Per-source TTL caching with single-flight population.
//!
//! Each external domain gets its own cache instance so TTLs can differ
//! (traffic goes stale in minutes, fuel prices in hours). Concurrent
//! requests for the same key share one in-flight computation instead of
//! stampeding the upstream provider.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Time-bounded key/value cache. Values are cloned out, so keep them cheap
/// to clone (readings here are small structs behind no allocation or Arc).
pub struct TtlCache<V: Clone> {
    entries: DashMap<String, Entry<V>>,
    inflight: DashMap<String, Arc<Mutex<()>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            inflight: DashMap::new(),
            ttl,
        }
    }

    /// Fresh hit or None. Expired entries are dropped on read.
    pub fn get(&self, key: &str) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
        }
        self.entries.remove(key);
        None
    }

    pub fn insert(&self, key: &str, value: V) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Return the cached value or run `compute` to populate it. Only one
    /// computation runs per key at a time; losers of the race re-check the
    /// cache after the winner finishes.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(hit) = self.get(key) {
            return hit;
        }

        let gate = self
            .inflight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _held = gate.lock().await;

        // another task may have populated the entry while we waited
        if let Some(hit) = self.get(key) {
            return hit;
        }

        let value = compute().await;
        self.insert(key, value.clone());
        self.inflight.remove(key);
        value
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn expired_entries_are_misses() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::ZERO);
        cache.insert("sf", 7);
        assert_eq!(cache.get("sf"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn fresh_entries_hit() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("sf", 7);
        assert_eq!(cache.get("sf"), Some(7));
    }

    #[tokio::test]
    async fn compute_runs_once_per_key_window() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let a = cache
            .get_or_compute("sf", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            })
            .await;
        let b = cache
            .get_or_compute("sf", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                99
            })
            .await;

        assert_eq!(a, 42);
        assert_eq!(b, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_flight() {
        let cache = Arc::new(TtlCache::<u32>::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute("nyc", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        5
                    })
                    .await
            }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap(), 5);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
