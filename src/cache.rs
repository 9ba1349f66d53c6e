//! Bounded memo for exact lookups
//!
//! Each index keeps a small LRU of `StructuralKey -> words`. The cache never changes what a
//! lookup returns; capacity 0 turns it off entirely.

use crate::encoder::StructuralKey;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub type Words = Arc<[String]>;

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

#[derive(Debug)]
pub struct LookupCache {
    inner: Option<Mutex<LruCache<StructuralKey, Words, FxBuildHasher>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LookupCache {
    pub fn new(capacity: usize) -> Self {
        let inner = NonZeroUsize::new(capacity)
            .map(|cap| Mutex::new(LruCache::with_hasher(cap, FxBuildHasher)));
        Self {
            inner,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Return the cached words for `key`, computing and storing them on a miss.
    ///
    /// The lock is not held while `compute` runs; two racing misses both
    /// compute the same value and the later insert wins.
    pub fn get_or_insert_with<F>(&self, key: StructuralKey, compute: F) -> Words
    where
        F: FnOnce() -> Words,
    {
        let Some(inner) = &self.inner else {
            return compute();
        };

        let cached = inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(words) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return words;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let words = compute();
        inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, Arc::clone(&words));
        words
    }

    pub fn clear(&self) {
        if let Some(inner) = &self.inner {
            inner.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let (len, capacity) = match &self.inner {
            Some(inner) => {
                let cache = inner.lock().unwrap_or_else(PoisonError::into_inner);
                (cache.len(), cache.cap().get())
            }
            None => (0, 0),
        };
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len,
            capacity,
        }
    }
}
