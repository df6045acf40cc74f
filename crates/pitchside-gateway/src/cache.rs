// Response cache owned by the gateway.
//
// One keyed map per resource kind, each with its own expiry. Values are
// `Arc`s, so a hit hands out the same snapshot every caller already shares.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use pitchside_core::catalog::fixture::Fixture;
use pitchside_core::catalog::live::LiveSnapshot;
use pitchside_core::Catalog;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Expiry per resource kind, in seconds. `0` keeps an entry for the session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub bootstrap_ttl_secs: u64,
    pub fixtures_ttl_secs: u64,
    pub live_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            bootstrap_ttl_secs: 0,
            fixtures_ttl_secs: 0,
            live_ttl_secs: 60,
        }
    }
}

fn ttl(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

// ---------------------------------------------------------------------------
// TtlCache
// ---------------------------------------------------------------------------

/// A keyed cache whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Option<Duration>,
    entries: Mutex<HashMap<K, (Instant, V)>>,
    /// Held across a fetch so concurrent misses populate a key once.
    filling: Mutex<()>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    /// `None` never expires.
    pub fn new(ttl: Option<Duration>) -> Self {
        TtlCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
            filling: Mutex::new(()),
        }
    }

    /// The cached value, unless it is missing or stale. Stale entries are evicted.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let fresh = match (entries.get(key), self.ttl) {
            (None, _) => return None,
            (Some(_), None) => true,
            (Some((stored, _)), Some(ttl)) => stored.elapsed() < ttl,
        };
        if fresh {
            entries.get(key).map(|(_, v)| v.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    /// The cached value, or the result of `fetch` stored under `key`.
    ///
    /// Misses are filled one at a time: a caller that waited on another
    /// fill gets that value instead of fetching again. Errors are not cached.
    pub async fn get_or_fill<E, F, Fut>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }
        let _filling = self.filling.lock().await;
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }
        let value = fetch().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    pub async fn insert(&self, key: K, value: V) {
        self.entries.lock().await.insert(key, (Instant::now(), value));
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

// ---------------------------------------------------------------------------
// ResponseCache
// ---------------------------------------------------------------------------

/// Cached gateway resources. Manager picks and team info are never cached.
#[derive(Debug)]
pub struct ResponseCache {
    pub(crate) catalog: TtlCache<(), Arc<Catalog>>,
    pub(crate) fixtures: TtlCache<(), Arc<Vec<Fixture>>>,
    pub(crate) live: TtlCache<u32, Arc<LiveSnapshot>>,
}

impl ResponseCache {
    pub fn new(settings: &CacheSettings) -> Self {
        ResponseCache {
            catalog: TtlCache::new(ttl(settings.bootstrap_ttl_secs)),
            fixtures: TtlCache::new(ttl(settings.fixtures_ttl_secs)),
            live: TtlCache::new(ttl(settings.live_ttl_secs)),
        }
    }

    /// Drop every cached resource.
    pub async fn clear(&self) {
        self.catalog.clear().await;
        self.fixtures.clear().await;
        self.live.clear().await;
    }
}
