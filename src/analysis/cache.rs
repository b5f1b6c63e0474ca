use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::types::{CacheKey, FetchKey, RawStats, StatsResult};

type SharedFlight<V> = Shared<BoxFuture<'static, Result<Arc<V>>>>;

/// Aggregated results, one per request shape
pub type StatsCache = FlightCache<CacheKey, StatsResult>;

/// Raw upstream data, one per user and organization setting
pub type RawStatsCache = FlightCache<FetchKey, RawStats>;

/// Optional bounds for a cache. The default keeps every entry forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Evict least-recently-used entries beyond this many
    pub max_entries: Option<NonZeroUsize>,
    /// Treat entries older than this as missing
    pub ttl: Option<Duration>,
}

struct CachedEntry<V> {
    value: Arc<V>,
    stored_at: Instant,
}

struct CacheState<K, V> {
    entries: LruCache<K, CachedEntry<V>>,
    inflight: HashMap<K, SharedFlight<V>>,
}

impl<K: Hash + Eq + Display, V> CacheState<K, V> {
    fn fresh(&mut self, key: &K, ttl: Option<Duration>) -> Option<Arc<V>> {
        let expired = match self.entries.get(key) {
            Some(entry) => ttl.is_some_and(|ttl| entry.stored_at.elapsed() > ttl),
            None => return None,
        };
        if expired {
            debug!(key = %key, "cache entry expired");
            self.entries.pop(key);
            return None;
        }
        self.entries.get(key).map(|entry| Arc::clone(&entry.value))
    }
}

struct CacheInner<K, V> {
    state: Mutex<CacheState<K, V>>,
    options: CacheOptions,
}

impl<K, V> CacheInner<K, V> {
    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Memoizes computed values per key with single-flight misses.
///
/// Concurrent lookups of the same missing key share one computation; lookups
/// of different keys only contend on the short map lock. Computations run on
/// their own task, so a caller that stops waiting does not cancel them and
/// the result still lands in the cache. Failures are handed to every waiter
/// and never stored.
pub struct FlightCache<K, V> {
    inner: Arc<CacheInner<K, V>>,
}

impl<K, V> Clone for FlightCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> FlightCache<K, V>
where
    K: Clone + Hash + Eq + Display + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Create a new cache
    pub fn new(options: CacheOptions) -> Self {
        let entries = match options.max_entries {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            inner: Arc::new(CacheInner {
                state: Mutex::new(CacheState {
                    entries,
                    inflight: HashMap::new(),
                }),
                options,
            }),
        }
    }

    pub fn options(&self) -> CacheOptions {
        self.inner.options
    }

    /// Return the cached value for `key`, or run `compute` once to produce it.
    ///
    /// `compute` is only invoked when the key is neither stored nor already
    /// being computed.
    pub async fn get_or_compute<F, Fut>(&self, key: K, compute: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let flight = {
            let mut state = self.inner.lock();
            if let Some(value) = state.fresh(&key, self.inner.options.ttl) {
                debug!(key = %key, "cache hit");
                return Ok(value);
            }
            if let Some(flight) = state.inflight.get(&key).cloned() {
                debug!(key = %key, "joining in-flight computation");
                flight
            } else {
                debug!(key = %key, "cache miss");
                let flight = self.start_flight(key.clone(), compute());
                state.inflight.insert(key, flight.clone());
                flight
            }
        };
        flight.await
    }

    fn start_flight<Fut>(&self, key: K, work: Fut) -> SharedFlight<V>
    where
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(outcome) => outcome.map(Arc::new),
                Err(_) => Err(StatsError::UpstreamUnavailable(
                    "cached computation panicked".to_string(),
                )),
            };

            let mut state = inner.lock();
            state.inflight.remove(&key);
            if let Ok(value) = &outcome {
                state.entries.put(
                    key,
                    CachedEntry {
                        value: Arc::clone(value),
                        stored_at: Instant::now(),
                    },
                );
            }
            outcome
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(err) => Err(err.into()),
            }
        }
        .boxed()
        .shared()
    }

    /// Retrieve a stored value without computing anything
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().fresh(key, self.inner.options.ttl)
    }

    /// Drop one stored value. Returns whether an entry was removed.
    pub fn invalidate(&self, key: &K) -> bool {
        self.inner.lock().entries.pop(key).is_some()
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of computations currently running
    pub fn in_flight(&self) -> usize {
        self.inner.lock().inflight.len()
    }
}

impl<K, V> Default for FlightCache<K, V>
where
    K: Clone + Hash + Eq + Display + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}
