//! Volatile asset cache with a freshness window and LRU bound.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anemone_core::ContentId;
use lru::LruCache;
use tracing::debug;

use crate::{Clock, ResolvedAsset};

/// Cache key: one identifier within one source collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    /// Source collection.
    pub collection: String,
    /// Identifier within the collection.
    pub content_id: ContentId,
}

impl CacheKey {
    /// Build a key.
    pub fn new(collection: impl Into<String>, content_id: ContentId) -> Self {
        Self {
            collection: collection.into(),
            content_id,
        }
    }
}

/// Resolved assets keyed by (collection, identifier).
///
/// Entries older than the freshness window are evicted on read. The window is
/// kept shorter than the upstream link lifetime so a cached link is never
/// served right as it expires. One coarse lock guards the whole map.
pub struct AssetCache {
    entries: Mutex<LruCache<CacheKey, ResolvedAsset>>,
    fresh_for: Duration,
    clock: Arc<dyn Clock>,
}

impl AssetCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize, fresh_for: Duration, clock: Arc<dyn Clock>) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            fresh_for,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, ResolvedAsset>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return a fresh entry, evicting it if it has gone stale.
    pub fn get(&self, key: &CacheKey) -> Option<ResolvedAsset> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let asset = entries.get(key)?;
        // A clock that stepped backwards counts as zero age.
        let age = now
            .signed_duration_since(asset.cached_at)
            .to_std()
            .unwrap_or_default();
        if age < self.fresh_for {
            return Some(asset.clone());
        }
        debug!(?key, ?age, "evicting stale asset");
        entries.pop(key);
        None
    }

    /// Store an asset, replacing any previous entry for the key.
    pub fn insert(&self, key: CacheKey, asset: ResolvedAsset) {
        self.lock().put(key, asset);
    }

    /// Drop the entry for `key`, if any.
    pub fn evict(&self, key: &CacheKey) {
        self.lock().pop(key);
    }

    /// Number of resident entries, fresh or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current time according to the cache's clock.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}
