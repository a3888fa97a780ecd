//! Tonnel marketplace provider (primary source).

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE, ORIGIN, REFERER, USER_AGENT};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::extract::{floor_from_listings, listings_from_value};
use super::session::{Session, SessionManager};
use super::{FloorProvider, ProviderError, ProviderResult};
use crate::config::{self, MarketConfig};
use crate::error::Result;

/// Queries Tonnel's gift search API for the cheapest matching listings.
///
/// Holds a lazily-established session; when Tonnel answers 401/403 the
/// session is refreshed and the request repeated once before the provider
/// reports itself blocked.
#[derive(Debug)]
pub struct TonnelProvider {
    client: reqwest::Client,
    api_url: String,
    origin: String,
    referer: String,
    user_agent: String,
    session: SessionManager,
}

impl TonnelProvider {
    /// Provider against the public Tonnel endpoints.
    pub fn new(config: &MarketConfig) -> Result<Self> {
        Self::with_urls(config, config::TONNEL_API_URL, config::TONNEL_SESSION_URL)
    }

    /// Provider against custom API and session URLs.
    pub fn with_urls(config: &MarketConfig, api_url: &str, session_url: &str) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self {
            session: SessionManager::new(
                client.clone(),
                session_url,
                &config.user_agent,
                config::SESSION_TTL,
            ),
            client,
            api_url: api_url.to_string(),
            origin: config::TONNEL_ORIGIN.to_string(),
            referer: config::TONNEL_REFERER.to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Search request body: first page, cheapest first.
    pub fn search_payload(collection: &str) -> Value {
        json!({
            "page": 1,
            "limit": config::PAGE_LIMIT,
            "sort": { "price": 1 },
            "filter": { "search": collection },
        })
    }

    async fn fetch_page(&self, collection: &str, session: Option<&Session>) -> std::result::Result<Value, ProviderError> {
        let user_agent = session
            .map(|s| s.user_agent.as_str())
            .unwrap_or(&self.user_agent);

        let mut request = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(USER_AGENT, user_agent)
            .header(ORIGIN, &self.origin)
            .header(REFERER, &self.referer)
            .json(&Self::search_payload(collection));

        if let Some(s) = session.filter(|s| !s.cookie_header.is_empty()) {
            request = request.header(COOKIE, &s.cookie_header);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FloorProvider for TonnelProvider {
    fn name(&self) -> &str {
        "tonnel"
    }

    async fn resolve_floor(&self, collection: &str) -> ProviderResult {
        let session = self.session.get().await;
        let body = match self.fetch_page(collection, session.as_ref()).await {
            Err(ProviderError::Blocked { status }) if status == 401 || status == 403 => {
                warn!(collection, status, "tonnel rejected session, refreshing once");
                let fresh = self.session.refresh().await;
                self.fetch_page(collection, fresh.as_ref()).await?
            }
            other => other?,
        };

        let listings = listings_from_value(&body);
        let floor = floor_from_listings(&listings, collection);
        debug!(collection, listings = listings.len(), ?floor, "tonnel search finished");
        Ok(floor)
    }
}
