//! Floor-price providers: one implementation per upstream data source.
//!
//! Every provider answers a single question, "what is the floor price of
//! this collection right now?", and reports one of three outcomes:
//!
//! * `Ok(Some(price))` -- a positive floor in TON,
//! * `Ok(None)` -- the upstream answered but nothing matched,
//! * `Err(ProviderError)` -- blocked (403/429) or a transport failure.
//!
//! Session handling, headers and response parsing stay inside the provider;
//! the [`FloorResolver`](crate::resolver::FloorResolver) only sees outcomes.

pub mod extract;
pub mod proxy;
pub mod session;
pub mod static_table;
pub mod tonnel;

pub use proxy::EdgeProxyProvider;
pub use static_table::StaticProvider;
pub use tonnel::TonnelProvider;

use async_trait::async_trait;
use reqwest::StatusCode;

/// Why a provider could not produce a floor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The upstream refused service (forbidden / rate-limited).
    #[error("blocked by upstream (HTTP {status})")]
    Blocked { status: u16 },

    /// Network error, timeout or unexpected HTTP status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The upstream answered with a body that could not be understood.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Blocked providers are not retried; everything else is.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProviderError::Blocked { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ProviderError::Blocked { .. })
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                ProviderError::Blocked {
                    status: status.as_u16(),
                }
            }
            other => ProviderError::Transport(format!("HTTP {}", other)),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

pub type ProviderResult = Result<Option<f64>, ProviderError>;

/// One upstream source of collection floor prices.
#[async_trait]
pub trait FloorProvider: Send + Sync {
    /// Stable identifier, used for logging, blocked markers and as the
    /// reported source of a floor.
    fn name(&self) -> &str;

    /// Resolve the floor price of `collection` in TON.
    async fn resolve_floor(&self, collection: &str) -> ProviderResult;
}
