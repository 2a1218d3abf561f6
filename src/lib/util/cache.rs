//! Module implementing a thread-safe LRU cache.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use antidote::Mutex;
use lru_cache::LruCache;
use serde::Serialize;


/// A thread-safe cache of keys & cached values.
/// Actual values stored in the cache are `Arc<V>'`s.
///
/// This is a wrapper around `LruCache` that also counts various cache statistics,
/// like cache hits or cache misses.
pub struct ThreadSafeCache<K, V, S = RandomState>
    where K: Eq + Hash, S: BuildHasher
{
    inner: Mutex<LruCache<K, Arc<V>, S>>,
    // Cache statistics.
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<K: Eq + Hash, V> ThreadSafeCache<K, V> {
    /// Create the cache with given capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> ThreadSafeCache<K, V, S>
    where K: Eq + Hash, S: BuildHasher
{
    /// Create the cache with custom hasher and given capacity.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        ThreadSafeCache{
            inner: Mutex::new(LruCache::with_hasher(capacity, hasher)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }
}

// LruCache interface wrappers.
impl<K, V, S> ThreadSafeCache<K, V, S>
    where K: Eq + Hash, S: BuildHasher
{
    /// Get the element corresponding to given key if it's present in the cache.
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
        where K: Borrow<Q>, Q: ?Sized + Eq + Hash
    {
        match self.inner.lock().get_mut(key) {
            Some(v) => { self.hit(); Some(v.clone()) }
            None => { self.miss(); None }
        }
    }

    /// Put an item into cache under given key.
    ///
    /// This is like insert(), except it always returns the (`Arc`'d) value
    /// that's now under the cached key.
    pub fn put(&self, k: K, v: V) -> Arc<V> {
        let value = Arc::new(v);
        self.inner.lock().insert(k, value.clone());
        value
    }

    /// Cache capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Current size of the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Remove all elements from the cache.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

// Cache statistics.
impl<K, V, S> ThreadSafeCache<K, V, S>
    where K: Eq + Hash, S: BuildHasher
{
    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let (capacity, len) = {
            let inner = self.inner.lock();
            (inner.capacity(), inner.len())
        };
        CacheStats{
            capacity,
            len,
            fill_rate: if capacity > 0 { len as f32 / capacity as f32 } else { 0.0 },
            hits: self.hits(),
            misses: self.misses(),
        }
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}

impl<K, V, S> fmt::Debug for ThreadSafeCache<K, V, S>
    where K: Eq + Hash, S: BuildHasher
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut ds = fmt.debug_struct("ThreadSafeCache");
        if let Ok(inner) = self.inner.try_lock() {
            ds.field("capacity", &inner.capacity());
            ds.field("len", &inner.len());
        }
        ds.field("hits", &self.hits());
        ds.field("misses", &self.misses());
        ds.finish()
    }
}


/// Statistics of a `ThreadSafeCache`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CacheStats {
    pub capacity: usize,
    pub len: usize,
    pub fill_rate: f32,
    pub hits: usize,
    pub misses: usize,
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use super::ThreadSafeCache;

    #[test]
    fn counts_hits_and_misses() {
        let cache = ThreadSafeCache::new(2);
        assert_that!(cache.get("a")).is_none();
        cache.put("a".to_owned(), 1);
        assert_that!(cache.get("a")).is_some();
        assert_that!(cache.get("a")).is_some();

        let stats = cache.stats();
        assert_eq!(2, stats.hits);
        assert_eq!(1, stats.misses);
        assert_eq!(1, stats.len);
        assert_that!(stats.fill_rate).is_close_to(0.5, 1e-6);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = ThreadSafeCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.get("a");
        cache.put("c", 3);
        assert_that!(cache.get("b")).is_none();
        assert_that!(cache.get("a").map(|v| *v)).is_some().is_equal_to(1);
        assert_eq!(2, cache.len());
    }
}
