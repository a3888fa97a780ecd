use std::sync::Arc;

use giftprice_sdk::{FloorProvider, FloorResponse, RetryPolicy, TtlCache};

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Upstream marketplace queried on a cache miss.
    pub provider: Arc<dyn FloorProvider>,

    /// Retry policy for upstream lookups.
    pub retry: RetryPolicy,

    /// Successful responses keyed by request path and query.
    pub responses: TtlCache<FloorResponse>,
}
