//! The key -> entry store and its deduplication guarantee.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, trace};

use kanto_core::{Snapshot, SourceResult, Timestamp};

use super::key::CacheKey;

/// Counters describing cache usage. Snapshot-style, cheap to clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests that found an existing entry (pending or settled).
    pub hits: u64,
    /// Requests that created a new entry and invoked the accessor.
    pub misses: u64,
    /// Hits that landed while the entry was still pending, i.e. requests
    /// whose accessor invocation was elided by deduplication.
    pub dedup_hits: u64,
    /// Number of entries currently held.
    pub entries: usize,
}

/// Observability metadata for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    /// Number of requests that have asked for this key.
    pub subscribers: u32,
    pub created_at: Timestamp,
    pub last_accessed: Timestamp,
}

struct EntrySlot<T> {
    tx: watch::Sender<Snapshot<T>>,
    subscribers: u32,
    created_at: Timestamp,
    last_accessed: Timestamp,
}

struct Inner<T> {
    entries: Mutex<HashMap<CacheKey, EntrySlot<T>>>,
    stats: Mutex<CacheStats>,
}

/// Generic remote-resource cache with per-key deduplication.
///
/// For any [`CacheKey`], the accessor passed to [`ResourceCache::request`]
/// runs at most once for the cache's whole lifetime. The first request
/// creates a `Pending` entry and spawns the accessor; every request after
/// that, concurrent or later, observes the same entry. An entry settles
/// exactly once, to `Resolved` or `Failed`, and then never changes:
/// failures are cached, not retried, and there is no invalidation
/// operation. Dropping the cache is the only eviction.
///
/// One instance per value type, owned by the session. Never a global.
pub struct ResourceCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ResourceCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for ResourceCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves the data structurally intact;
    // continue with the inner value.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T> ResourceCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                stats: Mutex::new(CacheStats::default()),
            }),
        }
    }

    /// Request the value for `key`, running `accessor` only if this is the
    /// first request for that key.
    ///
    /// Returns the entry's current snapshot immediately; on a first request
    /// that is always the `Pending` snapshot, with the accessor spawned
    /// onto the runtime. Never blocks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request<F, Fut>(&self, key: CacheKey, accessor: F) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SourceResult<T>> + Send + 'static,
    {
        let now = Utc::now();
        let mut entries = lock(&self.inner.entries);

        if let Some(slot) = entries.get_mut(&key) {
            slot.subscribers += 1;
            slot.last_accessed = now;
            let snapshot = slot.tx.borrow().clone();
            let mut stats = lock(&self.inner.stats);
            stats.hits += 1;
            if snapshot.is_loading {
                stats.dedup_hits += 1;
                trace!(%key, "cache hit on in-flight entry");
            } else {
                trace!(%key, "cache hit");
            }
            return snapshot;
        }

        let (tx, _rx) = watch::channel(Snapshot::pending());
        entries.insert(
            key.clone(),
            EntrySlot {
                tx: tx.clone(),
                subscribers: 1,
                created_at: now,
                last_accessed: now,
            },
        );
        {
            let mut stats = lock(&self.inner.stats);
            stats.misses += 1;
            stats.entries = entries.len();
        }
        drop(entries);

        debug!(%key, "cache miss, invoking accessor");
        let fut = accessor();
        tokio::spawn(async move {
            let snapshot = Snapshot::from(fut.await);
            // Entries settle exactly once; nobody else writes to this
            // channel. Receivers may or may not exist.
            tx.send_replace(snapshot);
        });

        Snapshot::pending()
    }

    /// Request and then wait for the entry to settle.
    pub async fn resolve<F, Fut>(&self, key: CacheKey, accessor: F) -> Snapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SourceResult<T>> + Send + 'static,
    {
        let snapshot = self.request(key.clone(), accessor);
        if !snapshot.is_loading {
            return snapshot;
        }
        // The entry exists; wait cannot return None here.
        self.wait(&key).await.unwrap_or(snapshot)
    }

    /// Current snapshot for `key`, if a request was ever issued for it.
    /// Read-only: never invokes anything.
    pub fn snapshot(&self, key: &CacheKey) -> Option<Snapshot<T>> {
        let mut entries = lock(&self.inner.entries);
        let slot = entries.get_mut(key)?;
        slot.last_accessed = Utc::now();
        let snapshot = slot.tx.borrow().clone();
        Some(snapshot)
    }

    /// Observe state transitions for `key`.
    pub fn subscribe(&self, key: &CacheKey) -> Option<watch::Receiver<Snapshot<T>>> {
        let entries = lock(&self.inner.entries);
        entries.get(key).map(|slot| slot.tx.subscribe())
    }

    /// Wait until the entry for `key` leaves `Pending` and return its
    /// settled snapshot. Returns `None` if no request was ever issued for
    /// the key. A hung accessor leaves this waiting indefinitely, which is
    /// the documented degraded state.
    pub async fn wait(&self, key: &CacheKey) -> Option<Snapshot<T>> {
        let mut rx = self.subscribe(key)?;
        let settled = rx.wait_for(|snapshot| !snapshot.is_loading).await.ok()?;
        Some(settled.clone())
    }

    /// Whether a request has ever been issued for `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        lock(&self.inner.entries).contains_key(key)
    }

    /// Metadata for one entry.
    pub fn meta(&self, key: &CacheKey) -> Option<EntryMeta> {
        let entries = lock(&self.inner.entries);
        entries.get(key).map(|slot| EntryMeta {
            subscribers: slot.subscribers,
            created_at: slot.created_at,
            last_accessed: slot.last_accessed,
        })
    }

    /// Usage counters.
    pub fn stats(&self) -> CacheStats {
        let entries = lock(&self.inner.entries);
        let mut stats = lock(&self.inner.stats).clone();
        stats.entries = entries.len();
        stats
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kanto_core::SourceError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted_accessor(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = SourceResult<u32>> + Send>> {
        let calls = Arc::clone(calls);
        move || {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_invoke_accessor_once() {
        let cache = ResourceCache::<u32>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        // All three requests land before the spawned accessor runs.
        for _ in 0..3 {
            let snap = cache.request(CacheKey::Entry(1), counted_accessor(&calls, 7));
            assert!(snap.is_loading);
        }

        let settled = cache.wait(&CacheKey::Entry(1)).await.expect("entry exists");
        assert_eq!(settled.data, Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_settled_entry_served_without_reinvocation() {
        let cache = ResourceCache::<u32>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.request(CacheKey::Entry(1), counted_accessor(&calls, 7));
        cache.wait(&CacheKey::Entry(1)).await.expect("entry exists");

        let later = Arc::new(AtomicUsize::new(0));
        let snap = cache.request(CacheKey::Entry(1), counted_accessor(&later, 99));
        assert_eq!(snap.data, Some(7));
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_key_isolation() {
        let cache = ResourceCache::<u32>::new();

        cache.request(CacheKey::Entry(1), || async { Ok(1) });
        cache.request(CacheKey::Entry(2), || async {
            std::future::pending::<()>().await;
            unreachable!()
        });

        let first = cache.wait(&CacheKey::Entry(1)).await.expect("entry exists");
        assert_eq!(first.data, Some(1));

        // Resolving key 1 must not move key 2 out of Pending.
        let second = cache.snapshot(&CacheKey::Entry(2)).expect("entry exists");
        assert!(second.is_loading);
    }

    #[tokio::test]
    async fn test_failure_is_cached_and_terminal() {
        let cache = ResourceCache::<u32>::new();

        cache.request(CacheKey::Entry(9), || async {
            Err(SourceError::not_found("entry 9"))
        });
        let failed = cache.wait(&CacheKey::Entry(9)).await.expect("entry exists");
        assert_eq!(failed.error, Some(SourceError::not_found("entry 9")));

        // The exact key returns the cached failure; the accessor that
        // could have succeeded never runs.
        let calls = Arc::new(AtomicUsize::new(0));
        let again = cache.request(CacheKey::Entry(9), counted_accessor(&calls, 5));
        assert_eq!(again.error, Some(SourceError::not_found("entry 9")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_snapshots_are_detached_copies() {
        let cache = ResourceCache::<Vec<u32>>::new();

        cache.request(CacheKey::Entry(1), || async { Ok(vec![1, 2]) });
        let mut settled = cache.wait(&CacheKey::Entry(1)).await.expect("entry exists");
        if let Some(data) = settled.data.as_mut() {
            data.push(999);
        }

        let fresh = cache.snapshot(&CacheKey::Entry(1)).expect("entry exists");
        assert_eq!(fresh.data, Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_hung_accessor_stays_pending() {
        let cache = ResourceCache::<u32>::new();

        cache.request(CacheKey::Entry(1), || async {
            std::future::pending::<()>().await;
            unreachable!()
        });
        tokio::task::yield_now().await;

        let snap = cache.snapshot(&CacheKey::Entry(1)).expect("entry exists");
        assert!(snap.is_loading);
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_peeks_without_requesting() {
        let cache = ResourceCache::<u32>::new();
        assert_eq!(cache.snapshot(&CacheKey::Entry(1)), None);

        cache.request(CacheKey::Entry(1), || async { Ok(11) });
        let pending = cache.snapshot(&CacheKey::Entry(1)).expect("entry exists");
        assert!(pending.is_loading);

        cache.wait(&CacheKey::Entry(1)).await.expect("entry exists");
        let settled = cache.snapshot(&CacheKey::Entry(1)).expect("entry exists");
        assert_eq!(settled.data, Some(11));
    }

    #[tokio::test]
    async fn test_subscribe_observes_settlement() {
        let cache = ResourceCache::<u32>::new();

        cache.request(CacheKey::Entry(3), || async { Ok(42) });
        let mut rx = cache.subscribe(&CacheKey::Entry(3)).expect("entry exists");
        let settled = rx
            .wait_for(|snapshot| !snapshot.is_loading)
            .await
            .expect("sender lives in the cache");
        assert_eq!(settled.data, Some(42));
    }

    #[tokio::test]
    async fn test_stats_and_meta_track_requests() {
        let cache = ResourceCache::<u32>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.request(CacheKey::Entry(1), counted_accessor(&calls, 1));
        cache.request(CacheKey::Entry(1), counted_accessor(&calls, 1));
        cache.wait(&CacheKey::Entry(1)).await.expect("entry exists");
        cache.request(CacheKey::Entry(1), counted_accessor(&calls, 1));

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.dedup_hits, 1);
        assert_eq!(stats.entries, 1);

        let meta = cache.meta(&CacheKey::Entry(1)).expect("entry exists");
        assert_eq!(meta.subscribers, 3);
        assert!(meta.last_accessed >= meta.created_at);
    }
}
