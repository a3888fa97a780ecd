//! Gift price SDK for Rust.
//!
//! Estimates a fair resale range for Telegram gift NFTs on TON. A
//! collection's floor price is resolved from marketplace providers (cached,
//! with ordered fallback, retries and temporary blocking of rate-limited
//! sources), then combined with the rarity of the gift's attributes.
//!
//! # Quick start
//!
//! ```no_run
//! use giftprice_sdk::{Attribute, GiftPriceSdk};
//!
//! # async fn example() -> giftprice_sdk::Result<()> {
//! let sdk = GiftPriceSdk::builder().build()?;
//!
//! let attributes = vec![
//!     Attribute::new("Model", 1.2),      // 1.2 %
//!     Attribute::new("Backdrop", 0.008), // 0.8 %
//! ];
//! let appraisal = sdk.appraise("Plush Pepe", &attributes).await?;
//! println!("fast {} / market {} / max {}", appraisal.estimate.fast,
//!     appraisal.estimate.market, appraisal.estimate.max);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod estimator;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod retry;

pub use cache::TtlCache;
pub use config::{MarketConfig, PricingConfig};
pub use error::{GiftPriceError, Result};
pub use estimator::{estimate_price, rarity_bonus, PriceEstimator};
pub use models::{Appraisal, Attribute, FloorQuote, FloorResponse, PriceEstimate};
pub use providers::{FloorProvider, ProviderError};
pub use resolver::FloorResolver;
pub use retry::RetryPolicy;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use providers::{EdgeProxyProvider, TonnelProvider};

// ---------------------------------------------------------------------------
// GiftPriceSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`GiftPriceSdk`] instance.
///
/// Use [`GiftPriceSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](GiftPriceSdkBuilder::build) to create the SDK.
pub struct GiftPriceSdkBuilder {
    market: MarketConfig,
    pricing: PricingConfig,
    retry: RetryPolicy,
    cache_ttl: Duration,
    blocked_ttl: Duration,
    providers: Vec<Arc<dyn FloorProvider>>,
}

impl Default for GiftPriceSdkBuilder {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            pricing: PricingConfig::default(),
            retry: RetryPolicy::default(),
            cache_ttl: config::DEFAULT_TTL,
            blocked_ttl: config::BLOCKED_TTL,
            providers: Vec::new(),
        }
    }
}

impl GiftPriceSdkBuilder {
    /// Marketplace HTTP settings (timeout, user agent, proxies).
    ///
    /// Defaults to [`MarketConfig::default()`]; use
    /// [`MarketConfig::from_env()`] to pick up `MARKET_*` variables.
    pub fn market_config(mut self, market: MarketConfig) -> Self {
        self.market = market;
        self
    }

    /// Estimator multipliers and bounds.
    pub fn pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// Per-provider retry policy. Defaults to 3 attempts, 300 ms base,
    /// doubling, up to 100 ms jitter.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// How long resolved floors are cached. Defaults to 60 minutes.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// How long a blocked provider is skipped. Defaults to 10 minutes.
    pub fn blocked_ttl(mut self, ttl: Duration) -> Self {
        self.blocked_ttl = ttl;
        self
    }

    /// Append a provider. Providers are consulted in the order added.
    ///
    /// When no provider is added, the SDK uses Tonnel followed by the floor
    /// proxy (if `MarketConfig::proxy_url` is set).
    pub fn provider<P: FloorProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Append an already shared provider.
    pub fn shared_provider(mut self, provider: Arc<dyn FloorProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Build the SDK. No network traffic happens until the first lookup.
    pub fn build(self) -> Result<GiftPriceSdk> {
        let providers = if self.providers.is_empty() {
            default_providers(&self.market)?
        } else {
            self.providers
        };
        let cache = Arc::new(TtlCache::with_ttls(self.cache_ttl, self.blocked_ttl));
        Ok(GiftPriceSdk {
            resolver: FloorResolver::new(providers, cache, self.retry),
            estimator: PriceEstimator::new(self.pricing),
        })
    }
}

fn default_providers(market: &MarketConfig) -> Result<Vec<Arc<dyn FloorProvider>>> {
    let mut providers: Vec<Arc<dyn FloorProvider>> = vec![Arc::new(TonnelProvider::new(market)?)];
    if let Some(proxy) = EdgeProxyProvider::from_config(market)? {
        providers.push(Arc::new(proxy));
    }
    Ok(providers)
}

// ---------------------------------------------------------------------------
// GiftPriceSdk
// ---------------------------------------------------------------------------

/// The main entry point: floor resolution plus price estimation.
///
/// Created via [`GiftPriceSdk::builder()`]. Cheap to share behind an `Arc`;
/// all methods take `&self`.
pub struct GiftPriceSdk {
    resolver: FloorResolver,
    estimator: PriceEstimator,
}

impl GiftPriceSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> GiftPriceSdkBuilder {
        GiftPriceSdkBuilder::default()
    }

    /// Estimate a price range from a known floor. Pure; no I/O.
    pub fn estimate_price(&self, floor_price: Option<f64>, attributes: &[Attribute]) -> Result<PriceEstimate> {
        self.estimator.estimate(floor_price, attributes)
    }

    /// Resolve the floor price of `collection` in TON.
    pub async fn resolve_floor_price(&self, collection: &str) -> Option<f64> {
        self.resolver.resolve_floor_price(collection).await
    }

    /// Resolve the floor of `collection` along with its source.
    pub async fn resolve(&self, collection: &str) -> Option<FloorQuote> {
        self.resolver.resolve(collection).await
    }

    /// Resolve the collection floor and estimate the gift's price range.
    ///
    /// Fails with [`GiftPriceError::InvalidFloorPrice`] when no provider
    /// has a floor for the collection.
    pub async fn appraise(&self, collection: &str, attributes: &[Attribute]) -> Result<Appraisal> {
        let quote = self.resolver.resolve(collection).await.ok_or_else(|| {
            GiftPriceError::InvalidFloorPrice(format!("no floor found for '{}'", collection.trim()))
        })?;
        let estimate = self.estimator.estimate(Some(quote.floor_ton), attributes)?;
        Ok(Appraisal {
            collection: quote.collection,
            floor_ton: quote.floor_ton,
            source: quote.source,
            cached: quote.cached,
            estimate,
        })
    }

    /// Drop the cached floor of `collection` so the next lookup hits the
    /// providers again.
    pub fn invalidate(&self, collection: &str) -> bool {
        self.resolver.invalidate(collection)
    }

    /// Floor cache shared with the resolver.
    pub fn cache(&self) -> &TtlCache<FloorQuote> {
        self.resolver.cache()
    }

    /// Underlying floor resolver.
    pub fn resolver(&self) -> &FloorResolver {
        &self.resolver
    }

    /// Estimator configured by the builder's pricing settings.
    pub fn estimator(&self) -> &PriceEstimator {
        &self.estimator
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for GiftPriceSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GiftPriceSdk(providers=[{}], cached_floors={})",
            self.resolver.provider_names().join(", "),
            self.resolver.cache().len()
        )
    }
}
