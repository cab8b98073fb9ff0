//! The resolution state machine.

use std::future::Future;
use std::sync::Arc;

use anemone_core::ContentId;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::{
    display_date, AssetCache, AssetProvider, CacheKey, Clock, InspectedContent, OverrideStore,
    ProviderError, Resolution, ResolveGate, ResolvedAsset, ResolverConfig, RetryPolicy,
};

/// Result of one gated attempt that reached upstream without failing.
enum Fetched {
    Asset(ResolvedAsset),
    NoAsset,
    Denied,
}

/// Turns (collection, identifier) pairs into renderable assets.
///
/// Construct one per process and share it by reference. Lookups go:
/// persistent override store (eligible collections only), then the volatile
/// cache, then a gated and retried upstream resolution whose result is cached.
pub struct Resolver {
    config: ResolverConfig,
    cache: AssetCache,
    store: Option<Arc<dyn OverrideStore>>,
    provider: Arc<dyn AssetProvider>,
    gate: ResolveGate,
    policy: RetryPolicy,
}

impl Resolver {
    /// Create a resolver with a fresh cache and a serial gate.
    pub fn new(
        config: ResolverConfig,
        provider: Arc<dyn AssetProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = AssetCache::new(config.cache_capacity, config.fresh_ttl(), clock);
        let policy = config.retry_policy();
        Self {
            config,
            cache,
            store: None,
            provider,
            gate: ResolveGate::serial(),
            policy,
        }
    }

    /// Consult `store` first for eligible collections.
    pub fn with_store(mut self, store: Arc<dyn OverrideStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The volatile cache.
    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Resolve one identifier. Upstream faults never escape as errors.
    #[instrument(skip(self))]
    pub async fn resolve(&self, collection: &str, content_id: ContentId) -> Resolution {
        if self.config.uses_persistent_store(collection) {
            if let Some(asset) = self.from_store(collection, content_id).await {
                debug!("served from persistent store");
                return Resolution::Found(asset);
            }
        }

        let key = CacheKey::new(collection, content_id);
        if let Some(asset) = self.cache.get(&key) {
            debug!("cache hit");
            return Resolution::Found(asset);
        }

        match self
            .policy
            .run(|| self.attempt(collection, content_id, &key))
            .await
        {
            Ok(Fetched::Asset(asset)) => Resolution::Found(asset),
            Ok(Fetched::NoAsset) => {
                debug!("content has no usable image");
                Resolution::NotFound
            }
            Ok(Fetched::Denied) => {
                info!("source collection refused access");
                Resolution::AccessDenied
            }
            Err(err) => {
                warn!(%err, "resolution abandoned");
                Resolution::NotFound
            }
        }
    }

    async fn from_store(&self, collection: &str, content_id: ContentId) -> Option<ResolvedAsset> {
        let record = self.store.as_ref()?.lookup(collection, content_id)?;
        let materialized = async {
            let _permit = self.gate.acquire().await?;
            self.timed(self.provider.materialize_url(&record.stable_reference))
                .await
        }
        .await;

        match materialized {
            Ok(Some(url)) => {
                let details = InspectedContent {
                    accessible: true,
                    stable_reference: Some(record.stable_reference),
                    caption: record.caption,
                    timestamp: record.timestamp,
                    width: record.width,
                    height: record.height,
                };
                Some(self.assemble(collection, content_id, &url, details))
            }
            Ok(None) => {
                debug!("stored reference expired upstream");
                None
            }
            Err(err) => {
                warn!(%err, "stored reference did not materialize");
                None
            }
        }
    }

    /// One gated pass. Retry sleeps happen in the policy, after the permit drops.
    async fn attempt(
        &self,
        collection: &str,
        content_id: ContentId,
        key: &CacheKey,
    ) -> Result<Fetched, ProviderError> {
        let _permit = self.gate.acquire().await?;

        // Another waiter may have resolved this key while we queued.
        if let Some(asset) = self.cache.get(key) {
            return Ok(Fetched::Asset(asset));
        }

        let jitter = self.config.jitter();
        if !jitter.is_empty() {
            let pause = rand::thread_rng().gen_range(jitter);
            tokio::time::sleep(pause).await;
        }

        let inspected = self
            .timed(self.provider.forward_and_inspect(collection, content_id))
            .await?;
        if !inspected.accessible {
            return Ok(Fetched::Denied);
        }
        let Some(reference) = inspected.stable_reference.as_deref() else {
            return Ok(Fetched::NoAsset);
        };
        let Some(url) = self.timed(self.provider.materialize_url(reference)).await? else {
            return Ok(Fetched::NoAsset);
        };

        let asset = self.assemble(collection, content_id, &url, inspected);
        self.cache.insert(key.clone(), asset.clone());
        Ok(Fetched::Asset(asset))
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        let limit = self.config.call_timeout();
        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| ProviderError::Timeout(limit))?
    }

    fn assemble(
        &self,
        collection: &str,
        content_id: ContentId,
        url: &str,
        details: InspectedContent,
    ) -> ResolvedAsset {
        ResolvedAsset {
            url: self.config.proxy.wrap(url),
            width: details.width,
            height: details.height,
            caption: details.caption,
            display_date: details.timestamp.and_then(display_date),
            canonical_link: self.provider.canonical_link(collection, content_id),
            cached_at: self.cache.now(),
        }
    }
}
