//! Floor-price resolution across an ordered list of providers.
//!
//! ```text
//! cache hit ───────────────────────────────────────────────► return
//! cache miss ─► provider[i] blocked? ──yes──► provider[i+1]
//!                    │ no
//!                    ▼
//!               retry(provider[i]) ──price──► cache + return
//!                    │ not found / transport exhausted ──► provider[i+1]
//!                    │ blocked ──► mark blocked ───────► provider[i+1]
//! providers exhausted ─────────────────────────────────────► None
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::models::FloorQuote;
use crate::providers::{FloorProvider, ProviderError};
use crate::retry::{retry_with_policy, RetryPolicy};

/// Resolves collection floors with caching, ordered fallback, retries and
/// negative caching of blocked providers.
///
/// Provider failures never reach the caller: the result is either a floor
/// or `None`.
pub struct FloorResolver {
    providers: Vec<Arc<dyn FloorProvider>>,
    cache: Arc<TtlCache<FloorQuote>>,
    retry: RetryPolicy,
}

impl FloorResolver {
    /// `providers` are consulted in the given order.
    pub fn new(
        providers: Vec<Arc<dyn FloorProvider>>,
        cache: Arc<TtlCache<FloorQuote>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            providers,
            cache,
            retry,
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache<FloorQuote>> {
        &self.cache
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Floor price of `collection` in TON, or `None` if no provider had one.
    pub async fn resolve_floor_price(&self, collection: &str) -> Option<f64> {
        self.resolve(collection).await.map(|q| q.floor_ton)
    }

    /// Like [`resolve_floor_price`](Self::resolve_floor_price) but also
    /// reports which provider produced the floor and whether it came from
    /// the cache.
    pub async fn resolve(&self, collection: &str) -> Option<FloorQuote> {
        let collection = collection.trim();
        if collection.is_empty() {
            return None;
        }

        if let Some(mut quote) = self.cache.get(collection) {
            debug!(collection, source = %quote.source, floor = quote.floor_ton, "floor cache hit");
            quote.cached = true;
            return Some(quote);
        }

        for provider in &self.providers {
            let name = provider.name();
            if self.cache.is_blocked(name) {
                info!(provider = name, "provider temporarily blocked, skipping");
                continue;
            }

            match self.query(provider.as_ref(), collection).await {
                Ok(Some(floor)) if floor.is_finite() && floor > 0.0 => {
                    info!(collection, provider = name, floor, "floor found");
                    let quote = FloorQuote {
                        collection: collection.to_string(),
                        floor_ton: floor,
                        source: name.to_string(),
                        cached: false,
                    };
                    self.cache.set(collection, quote.clone());
                    return Some(quote);
                }
                Ok(_) => {
                    debug!(collection, provider = name, "no matching listings");
                }
                Err(err) if err.is_blocked() => {
                    warn!(provider = name, error = %err, "provider blocked, backing off");
                    self.cache.set_blocked(name);
                }
                Err(err) => {
                    warn!(collection, provider = name, error = %err, "provider failed after retries");
                }
            }
        }

        info!(collection, "no floor found on any provider");
        None
    }

    async fn query(
        &self,
        provider: &dyn FloorProvider,
        collection: &str,
    ) -> Result<Option<f64>, ProviderError> {
        retry_with_policy(&self.retry, ProviderError::is_retryable, move |attempt| {
            if attempt > 0 {
                debug!(provider = provider.name(), attempt, "retrying provider");
            }
            provider.resolve_floor(collection)
        })
        .await
    }

    /// Forget the cached floor for `collection`.
    pub fn invalidate(&self, collection: &str) -> bool {
        self.cache.delete(collection.trim())
    }
}
