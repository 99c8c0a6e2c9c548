//! Query cache.
//!
//! An explicit key/value store shared by every view. Entries are keyed by
//! [`QueryKey`], so all entries of a resource can be invalidated at once
//! after a mutation.
//!
//! Invalidation does not drop data: the old value stays visible while it is
//! marked stale, and the next [`QueryCache::fetch`] of the key refetches.
//!
//! # Overlapping fetches
//!
//! In-flight fetches are never cancelled. Each fetch captures the key's
//! epoch when it is issued, and invalidation moves the key to a new epoch.
//! A result from an older epoch is returned to its caller but not
//! installed.
//!
//! Within one epoch a key has at most one fetch in flight. Later callers
//! wait for it and share its value. If it fails, each waiter then fetches
//! on its own, one at a time.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tgadmin_core::{Page, QueryKey, Record, Resource};
use tokio::sync::{RwLock, watch};
use tracing::debug;

/// How long an untouched entry is kept by callers that sweep with
/// [`QueryCache::evict_idle`].
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(5 * 60);

// ============================================================================
// Entry
// ============================================================================

struct Entry<V> {
    value: Option<Arc<V>>,
    invalidated: bool,
    epoch: u64,
    in_flight: Arc<AtomicUsize>,
    leader: Option<Leader>,
    error: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    fetched_at: Option<Instant>,
    last_access: Instant,
}

impl<V> Entry<V> {
    fn new(epoch: u64, now: Instant) -> Self {
        Self {
            value: None,
            invalidated: false,
            epoch,
            in_flight: Arc::new(AtomicUsize::new(0)),
            leader: None,
            error: None,
            updated_at: None,
            fetched_at: None,
            last_access: now,
        }
    }

    fn is_stale(&self, stale_time: Option<Duration>, now: Instant) -> bool {
        if self.invalidated {
            return true;
        }
        match (stale_time, self.fetched_at) {
            (Some(limit), Some(at)) => now.duration_since(at) >= limit,
            _ => false,
        }
    }

    fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Returns a receiver for the live fetch of the current epoch, if any.
    fn live_leader(&self) -> Option<watch::Receiver<()>> {
        self.leader
            .as_ref()
            .filter(|l| l.epoch == self.epoch && l.done.has_changed().is_ok())
            .map(|l| l.done.clone())
    }
}

/// The fetch that owns an epoch. Its sender is dropped when it finishes,
/// which wakes every waiter.
struct Leader {
    epoch: u64,
    done: watch::Receiver<()>,
}

/// Decrements an entry's in-flight count when the fetch finishes or is dropped.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Snapshot of one cache entry.
#[derive(Debug, Clone)]
pub struct CacheEntryView<V> {
    /// Last installed value.
    pub value: Option<Arc<V>>,
    /// True if the value was invalidated or outlived the stale time.
    pub stale: bool,
    /// True while a fetch of this key is in flight.
    pub fetching: bool,
    /// Error text of the last failed fetch in the current epoch.
    pub error: Option<String>,
    /// When the value was installed.
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Query Cache
// ============================================================================

struct CacheState<V> {
    entries: HashMap<QueryKey, Entry<V>>,
    last_epoch: u64,
}

/// Key/value cache with invalidation by resource.
pub struct QueryCache<V> {
    state: RwLock<CacheState<V>>,
    stale_time: Option<Duration>,
    notify: watch::Sender<u64>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for QueryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("stale_time", &self.stale_time)
            .field("version", &*self.notify.borrow())
            .finish_non_exhaustive()
    }
}

impl<V> QueryCache<V> {
    /// Creates a cache whose entries stay fresh until invalidated.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                last_epoch: 0,
            }),
            stale_time: None,
            notify,
        }
    }

    /// Creates a cache whose entries also go stale after `stale_time`.
    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            stale_time: Some(stale_time),
            ..Self::new()
        }
    }

    /// Returns the stale time, if any.
    pub fn stale_time(&self) -> Option<Duration> {
        self.stale_time
    }

    /// Returns the cached value for `key`, fetching it if missing or stale.
    ///
    /// A fresh hit returns without calling `fetcher`. On failure the previous
    /// value is kept and the error text is recorded on the entry.
    pub async fn fetch<F, Fut, E>(&self, key: &QueryKey, fetcher: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: fmt::Display,
    {
        let (epoch, guard, done) = loop {
            let mut waiter = {
                let mut state = self.state.write().await;
                let now = Instant::now();
                let stale_time = self.stale_time;
                let CacheState {
                    entries,
                    last_epoch,
                } = &mut *state;

                let entry = entries.entry(key.clone()).or_insert_with(|| {
                    *last_epoch += 1;
                    Entry::new(*last_epoch, now)
                });
                entry.last_access = now;

                if let Some(value) = entry
                    .value
                    .as_ref()
                    .filter(|_| !entry.is_stale(stale_time, now))
                {
                    debug!(key = %key, "Cache hit");
                    return Ok(Arc::clone(value));
                }

                match entry.live_leader() {
                    Some(rx) => rx,
                    None => {
                        let (tx, rx) = watch::channel(());
                        entry.leader = Some(Leader {
                            epoch: entry.epoch,
                            done: rx,
                        });
                        break (entry.epoch, InFlight::start(&entry.in_flight), tx);
                    }
                }
            };

            debug!(key = %key, "Joining in-flight fetch");
            // Resolves with an error once the leader's sender is dropped.
            let _ = waiter.changed().await;
        };
        self.notify_change();

        debug!(key = %key, epoch, "Fetching");
        let result = fetcher().await.map(Arc::new);
        drop(guard);

        {
            let mut state = self.state.write().await;
            match state.entries.get_mut(key) {
                Some(entry) if entry.epoch == epoch => match &result {
                    Ok(value) => {
                        entry.value = Some(Arc::clone(value));
                        entry.invalidated = false;
                        entry.error = None;
                        entry.updated_at = Some(Utc::now());
                        entry.fetched_at = Some(Instant::now());
                        debug!(key = %key, "Installed");
                    }
                    Err(e) => {
                        entry.error = Some(e.to_string());
                        debug!(key = %key, error = %e, "Fetch failed");
                    }
                },
                Some(entry) => {
                    debug!(key = %key, epoch, current = entry.epoch, "Discarding superseded result");
                }
                None => {
                    debug!(key = %key, "Entry removed while fetching");
                }
            }
        }
        drop(done);
        self.notify_change();

        result
    }

    /// Returns the last installed value, fresh or not.
    pub async fn get(&self, key: &QueryKey) -> Option<Arc<V>> {
        self.state
            .read()
            .await
            .entries
            .get(key)
            .and_then(|e| e.value.clone())
    }

    /// Returns a snapshot of an entry without touching it.
    pub async fn peek(&self, key: &QueryKey) -> Option<CacheEntryView<V>> {
        let state = self.state.read().await;
        let now = Instant::now();
        state.entries.get(key).map(|e| CacheEntryView {
            value: e.value.clone(),
            stale: e.is_stale(self.stale_time, now),
            fetching: e.is_fetching(),
            error: e.error.clone(),
            updated_at: e.updated_at,
        })
    }

    /// Marks one key stale. Returns false if the key is not cached.
    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        let found = {
            let mut state = self.state.write().await;
            let CacheState {
                entries,
                last_epoch,
            } = &mut *state;
            match entries.get_mut(key) {
                Some(entry) => {
                    *last_epoch += 1;
                    mark_invalidated(entry, *last_epoch);
                    true
                }
                None => false,
            }
        };
        if found {
            debug!(key = %key, "Invalidated");
            self.notify_change();
        }
        found
    }

    /// Marks every key of a resource stale. Returns the number of keys.
    pub async fn invalidate_resource(&self, resource: Resource) -> usize {
        let count = self.invalidate_where(|k| k.matches_resource(resource)).await;
        debug!(resource = %resource, count, "Invalidated resource");
        count
    }

    /// Marks every key stale. Returns the number of keys.
    pub async fn invalidate_all(&self) -> usize {
        let count = self.invalidate_where(|_| true).await;
        debug!(count, "Invalidated all");
        count
    }

    async fn invalidate_where(&self, predicate: impl Fn(&QueryKey) -> bool) -> usize {
        let count = {
            let mut state = self.state.write().await;
            let CacheState {
                entries,
                last_epoch,
            } = &mut *state;
            let mut count = 0;
            for (key, entry) in entries.iter_mut() {
                if predicate(key) {
                    *last_epoch += 1;
                    mark_invalidated(entry, *last_epoch);
                    count += 1;
                }
            }
            count
        };
        if count > 0 {
            self.notify_change();
        }
        count
    }

    /// Removes every entry. In-flight fetches complete but install nothing.
    pub async fn clear(&self) {
        self.state.write().await.entries.clear();
        debug!("Cache cleared");
        self.notify_change();
    }

    /// Removes entries not read or written within `max_idle` that have no
    /// fetch in flight. Returns the number removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let removed = {
            let mut state = self.state.write().await;
            let now = Instant::now();
            let before = state.entries.len();
            state.entries.retain(|_, e| {
                let last_write = e.fetched_at.unwrap_or(e.last_access);
                let last_touch = e.last_access.max(last_write);
                e.is_fetching() || now.duration_since(last_touch) < max_idle
            });
            before - state.entries.len()
        };
        if removed > 0 {
            debug!(removed, "Evicted idle entries");
            self.notify_change();
        }
        removed
    }

    /// Returns the cached keys.
    pub async fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<_> = self.state.read().await.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the number of cached keys.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Subscribes to changes. The version increases on every fetch start,
    /// install, invalidation and removal.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn notify_change(&self) {
        self.notify.send_modify(|version| *version += 1);
    }
}

fn mark_invalidated<V>(entry: &mut Entry<V>, epoch: u64) {
    entry.invalidated = true;
    entry.epoch = epoch;
    entry.error = None;
}

// ============================================================================
// Query Data
// ============================================================================

/// Values stored in the shared cache.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    /// A list page.
    Page(Page),
    /// An unpaginated list.
    Records(Vec<Record>),
    /// A single record.
    Record(Record),
}

impl QueryData {
    /// Returns the page, if this is one.
    pub fn as_page(&self) -> Option<&Page> {
        match self {
            QueryData::Page(page) => Some(page),
            _ => None,
        }
    }

    /// Returns the records, if this is a list.
    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            QueryData::Records(records) => Some(records),
            _ => None,
        }
    }
}

/// The process-wide cache shared by views.
pub type SharedCache = Arc<QueryCache<QueryData>>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use tokio::sync::oneshot;

    fn key(resource: Resource, page: u32) -> QueryKey {
        QueryKey::new(resource).with("page", page)
    }

    async fn fetch_counted(
        cache: &QueryCache<u32>,
        key: &QueryKey,
        calls: &AtomicU32,
        value: u32,
    ) -> Arc<u32> {
        cache
            .fetch(key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(value)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_hit_does_not_refetch() {
        let cache = QueryCache::new();
        let calls = AtomicU32::new(0);
        let k = key(Resource::Bots, 1);

        assert_eq!(*fetch_counted(&cache, &k, &calls, 1).await, 1);
        assert_eq!(*fetch_counted(&cache, &k, &calls, 2).await, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_resource_only_touches_that_resource() {
        let cache = QueryCache::new();
        let calls = AtomicU32::new(0);
        let bots1 = key(Resource::Bots, 1);
        let bots2 = key(Resource::Bots, 2);
        let users = key(Resource::Users, 1);

        fetch_counted(&cache, &bots1, &calls, 1).await;
        fetch_counted(&cache, &bots2, &calls, 1).await;
        fetch_counted(&cache, &users, &calls, 1).await;

        assert_eq!(cache.invalidate_resource(Resource::Bots).await, 2);

        let bots_view = cache.peek(&bots1).await.unwrap();
        assert!(bots_view.stale);
        assert_eq!(bots_view.value.as_deref(), Some(&1));
        assert!(!cache.peek(&users).await.unwrap().stale);

        assert_eq!(*fetch_counted(&cache, &bots1, &calls, 2).await, 2);
        assert_eq!(*fetch_counted(&cache, &users, &calls, 2).await, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_value() {
        let cache = QueryCache::new();
        let k = key(Resource::Payments, 1);
        cache.fetch(&k, || async { Ok::<_, String>(7) }).await.unwrap();
        cache.invalidate(&k).await;

        let err = cache
            .fetch(&k, || async { Err::<u32, _>("HTTP 500".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "HTTP 500");

        let view = cache.peek(&k).await.unwrap();
        assert_eq!(view.value.as_deref(), Some(&7));
        assert_eq!(view.error.as_deref(), Some("HTTP 500"));
        assert!(view.stale);
    }

    #[tokio::test]
    async fn test_superseded_fetch_is_not_installed() {
        let cache = Arc::new(QueryCache::<u32>::new());
        let k = key(Resource::Bots, 1);
        let (tx, rx) = oneshot::channel::<u32>();

        let early = {
            let cache = Arc::clone(&cache);
            let k = k.clone();
            tokio::spawn(async move {
                cache
                    .fetch(&k, || async move { rx.await.map_err(|e| e.to_string()) })
                    .await
            })
        };

        while !cache.peek(&k).await.is_some_and(|v| v.fetching) {
            tokio::task::yield_now().await;
        }

        assert!(cache.invalidate(&k).await);
        let fresh = cache.fetch(&k, || async { Ok::<_, String>(2) }).await.unwrap();
        assert_eq!(*fresh, 2);

        tx.send(1).unwrap();
        let stale = early.await.unwrap().unwrap();
        assert_eq!(*stale, 1);

        let view = cache.peek(&k).await.unwrap();
        assert_eq!(view.value.as_deref(), Some(&2));
        assert!(!view.stale);
        assert!(!view.fetching);
    }

    #[tokio::test]
    async fn test_stale_time() {
        let cache = QueryCache::with_stale_time(Duration::ZERO);
        let calls = AtomicU32::new(0);
        let k = key(Resource::Users, 1);

        fetch_counted(&cache, &k, &calls, 1).await;
        fetch_counted(&cache, &k, &calls, 2).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get(&k).await.as_deref(), Some(&2));
    }

    #[tokio::test]
    async fn test_evict_idle() {
        let cache = QueryCache::new();
        let calls = AtomicU32::new(0);
        fetch_counted(&cache, &key(Resource::Bots, 1), &calls, 1).await;
        fetch_counted(&cache, &key(Resource::Bots, 2), &calls, 1).await;

        assert_eq!(cache.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(cache.evict_idle(Duration::ZERO).await, 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_during_fetch_installs_nothing() {
        let cache = Arc::new(QueryCache::<u32>::new());
        let k = key(Resource::Plans, 1);
        let (tx, rx) = oneshot::channel::<u32>();

        let pending = {
            let cache = Arc::clone(&cache);
            let k = k.clone();
            tokio::spawn(async move {
                cache
                    .fetch(&k, || async move { rx.await.map_err(|e| e.to_string()) })
                    .await
            })
        };
        while cache.is_empty().await {
            tokio::task::yield_now().await;
        }

        cache.clear().await;
        tx.send(5).unwrap();
        assert_eq!(*pending.await.unwrap().unwrap(), 5);
        assert!(cache.get(&k).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_call() {
        let cache = QueryCache::<u32>::new();
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let k = key(Resource::Bots, 1);
        let (tx, rx) = oneshot::channel::<u32>();

        let (first, second, ()) = tokio::join!(
            cache.fetch(&k, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                rx.await.map_err(|e| e.to_string())
            }),
            cache.fetch(&k, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(2)
            }),
            async {
                while !cache.peek(&k).await.is_some_and(|v| v.fetching) {
                    tokio::task::yield_now().await;
                }
                tx.send(1).unwrap();
            }
        );

        assert_eq!(*first.unwrap(), 1);
        assert_eq!(*second.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_waiter_fetches_after_failed_fetch() {
        let cache = QueryCache::<u32>::new();
        let k = key(Resource::Payments, 1);
        let (tx, rx) = oneshot::channel::<()>();

        let (first, second, ()) = tokio::join!(
            cache.fetch(&k, || async move {
                let _ = rx.await;
                Err::<u32, _>("HTTP 503".to_string())
            }),
            cache.fetch(&k, || async { Ok::<_, String>(4) }),
            async {
                while !cache.peek(&k).await.is_some_and(|v| v.fetching) {
                    tokio::task::yield_now().await;
                }
                tx.send(()).unwrap();
            }
        );

        assert_eq!(first.unwrap_err(), "HTTP 503");
        assert_eq!(*second.unwrap(), 4);
        assert_eq!(cache.get(&k).await.as_deref(), Some(&4));
    }

    #[tokio::test]
    async fn test_retention_keeps_recent_entries() {
        let cache = QueryCache::new();
        let calls = AtomicU32::new(0);
        fetch_counted(&cache, &key(Resource::Users, 1), &calls, 1).await;

        assert_eq!(cache.evict_idle(DEFAULT_RETENTION).await, 0);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let cache = QueryCache::new();
        let mut rx = cache.subscribe();
        let k = key(Resource::Users, 1);

        cache.fetch(&k, || async { Ok::<_, String>(1) }).await.unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        cache.invalidate_resource(Resource::Users).await;
        assert!(rx.has_changed().unwrap());
    }
}
