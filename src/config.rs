use std::env;
use std::time::Duration;

pub const TONNEL_API_URL: &str = "https://gifts2.tonnel.network/api/pageGifts";
pub const TONNEL_SESSION_URL: &str = "https://gifts2.tonnel.network/";
pub const TONNEL_ORIGIN: &str = "https://market.tonnel.network";
pub const TONNEL_REFERER: &str = "https://market.tonnel.network/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Lifetime of a cached floor price.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
/// Lifetime of a "provider blocked" marker.
pub const BLOCKED_TTL: Duration = Duration::from_secs(10 * 60);
/// Lifetime of a marketplace session (cookies + user agent).
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60);
/// Per-request timeout for provider calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Raw prices above this are assumed to be nano-TON.
pub const NANO_THRESHOLD: f64 = 1_000_000.0;
pub const NANO_PER_TON: f64 = 1_000_000_000.0;

/// Listings requested per marketplace search page.
pub const PAGE_LIMIT: u32 = 50;

// ---------------------------------------------------------------------------
// PricingConfig
// ---------------------------------------------------------------------------

/// Tunable constants of the price estimator.
///
/// Several multiplier sets have been used historically (0.9/1.15 and
/// 0.95/1.2); the default is the 0.95/1.2 set with a 60% bonus cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    /// `fast = base * fast_multiplier`
    pub fast_multiplier: f64,
    /// `max = base * max_multiplier`
    pub max_multiplier: f64,
    /// Upper bound on the summed rarity bonus.
    pub bonus_cap: f64,
    /// `fast` never drops below `floor * hard_min_factor`.
    pub hard_min_factor: f64,
    /// `max` never exceeds `floor * hard_max_factor`.
    pub hard_max_factor: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fast_multiplier: 0.95,
            max_multiplier: 1.2,
            bonus_cap: 0.6,
            hard_min_factor: 0.9,
            hard_max_factor: 3.0,
        }
    }
}

// ---------------------------------------------------------------------------
// MarketConfig
// ---------------------------------------------------------------------------

/// Settings shared by the HTTP-backed floor providers.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketConfig {
    /// Timeout applied to every upstream request.
    pub timeout: Duration,
    /// User agent sent to marketplaces.
    pub user_agent: String,
    /// Base URL of a floor-proxy edge (`GET {url}/floor?collection=`).
    pub proxy_url: Option<String>,
    /// Outbound HTTP(S) proxy for marketplace traffic.
    pub http_proxy: Option<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy_url: None,
            http_proxy: None,
        }
    }
}

impl MarketConfig {
    /// Read settings from `MARKET_TIMEOUT_MS`, `MARKET_USER_AGENT`,
    /// `MARKET_PROXY_URL` and `MARKET_HTTP_PROXY`.
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary
    /// key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let timeout = non_empty("MARKET_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);

        Self {
            timeout,
            user_agent: non_empty("MARKET_USER_AGENT").unwrap_or(defaults.user_agent),
            proxy_url: non_empty("MARKET_PROXY_URL").map(|u| u.trim_end_matches('/').to_string()),
            http_proxy: non_empty("MARKET_HTTP_PROXY"),
        }
    }

    /// Build an async HTTP client honouring timeout and outbound proxy.
    pub fn http_client(&self) -> crate::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10));
        if let Some(proxy) = &self.http_proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn market_config_defaults_when_unset() {
        let cfg = MarketConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, MarketConfig::default());
        assert_eq!(cfg.timeout, Duration::from_secs(8));
    }

    #[test]
    fn market_config_reads_overrides() {
        let cfg = MarketConfig::from_lookup(lookup(&[
            ("MARKET_TIMEOUT_MS", "2500"),
            ("MARKET_USER_AGENT", "test-agent"),
            ("MARKET_PROXY_URL", "https://edge.example/"),
        ]));
        assert_eq!(cfg.timeout, Duration::from_millis(2500));
        assert_eq!(cfg.user_agent, "test-agent");
        assert_eq!(cfg.proxy_url.as_deref(), Some("https://edge.example"));
        assert!(cfg.http_proxy.is_none());
    }

    #[test]
    fn market_config_ignores_bad_timeout() {
        let cfg = MarketConfig::from_lookup(lookup(&[("MARKET_TIMEOUT_MS", "soon")]));
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        let cfg = MarketConfig::from_lookup(lookup(&[("MARKET_TIMEOUT_MS", "0")]));
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }
}
