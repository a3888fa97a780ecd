//! Provider backed by a floor-proxy edge (`GET {base}/floor?collection=`).
//!
//! Useful when the marketplace blocks the bot's own network but answers a
//! proxy running elsewhere.

use async_trait::async_trait;
use tracing::debug;

use super::{FloorProvider, ProviderError, ProviderResult};
use crate::config::MarketConfig;
use crate::error::{GiftPriceError, Result};
use crate::models::FloorResponse;

#[derive(Debug)]
pub struct EdgeProxyProvider {
    client: reqwest::Client,
    base_url: String,
}

impl EdgeProxyProvider {
    pub fn new(config: &MarketConfig, base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(GiftPriceError::InvalidArgument(
                "proxy base URL must not be empty".to_string(),
            ));
        }
        Ok(Self {
            client: config.http_client()?,
            base_url: base_url.to_string(),
        })
    }

    /// Build from `config.proxy_url`, if one is configured.
    pub fn from_config(config: &MarketConfig) -> Result<Option<Self>> {
        config
            .proxy_url
            .as_deref()
            .map(|url| Self::new(config, url))
            .transpose()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl FloorProvider for EdgeProxyProvider {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn resolve_floor(&self, collection: &str) -> ProviderResult {
        let url = format!("{}/floor", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("collection", collection)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status));
        }

        let body: FloorResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        debug!(collection, ok = body.ok, floor = ?body.floor_ton, cached = body.cached, "proxy answered");

        if !body.ok {
            return Err(ProviderError::Transport(
                body.error.unwrap_or_else(|| "proxy reported failure".to_string()),
            ));
        }
        Ok(body.floor_ton.filter(|p| p.is_finite() && *p > 0.0))
    }
}
