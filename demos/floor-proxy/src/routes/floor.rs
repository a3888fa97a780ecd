use std::sync::Arc;

use axum::extract::{OriginalUri, Query, State};
use axum::response::Json;
use giftprice_sdk::retry::retry_with_policy;
use giftprice_sdk::{FloorResponse, ProviderError};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FloorParams {
    pub collection: Option<String>,
}

/// GET /floor?collection=Plush+Pepe
///
/// Look up the collection floor on the upstream marketplace. Successful
/// answers (including "no listings") are cached per request URL and replayed
/// with `cached: true`; failures are never cached.
pub async fn get_floor(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<FloorParams>,
) -> Result<Json<FloorResponse>, AppError> {
    let collection = params
        .collection
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing collection param"))?;

    // 1. Replay a cached answer for the exact same URL.
    let cache_key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.to_string());
    if let Some(mut cached) = state.responses.get(&cache_key) {
        cached.cached = true;
        return Ok(Json(cached));
    }

    // 2. Ask the marketplace, retrying transport failures.
    let provider = state.provider.as_ref();
    let source = provider.name();
    let name: &str = &collection;
    let outcome = retry_with_policy(&state.retry, ProviderError::is_retryable, move |_| {
        provider.resolve_floor(name)
    })
    .await;

    // 3. Cache only successful lookups.
    let response = match outcome {
        Ok(floor) => {
            info!(collection = %collection, ?floor, source, "floor lookup succeeded");
            let response = FloorResponse::found(&collection, floor, source);
            state.responses.set(&cache_key, response.clone());
            response
        }
        Err(e) => {
            warn!(collection = %collection, error = %e, source, "floor lookup failed");
            FloorResponse::failed(&collection, source, e.to_string())
        }
    };

    Ok(Json(response))
}

/// OPTIONS /floor
///
/// CORS headers are added by the router's `CorsLayer`.
pub async fn options_floor() {}
