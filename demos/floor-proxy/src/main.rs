mod error;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use giftprice_sdk::providers::TonnelProvider;
use giftprice_sdk::{MarketConfig, RetryPolicy, TtlCache};
use tokio::time::MissedTickBehavior;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

use error::AppError;
use state::AppState;

const RESPONSE_TTL: Duration = Duration::from_secs(60 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Periodically drop expired responses. Lookups only evict the exact key
/// they read, so URLs that are never requested again would otherwise stay.
fn spawn_sweeper(state: Arc<AppState>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = state.responses.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = state.responses.len(), "swept expired responses");
            }
        }
    })
}

fn cors(allowed_origins: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    let allow_origin = if origins.is_empty() || allowed_origins.split(',').any(|o| o.trim() == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

fn app(state: Arc<AppState>, allowed_origins: &str) -> Router {
    Router::new()
        .route(
            "/floor",
            get(routes::floor::get_floor).options(routes::floor::options_floor),
        )
        .fallback(|| async { AppError::not_found("Not Found") })
        .layer(cors(allowed_origins))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let market = MarketConfig::from_env();
    let provider = TonnelProvider::new(&market).expect("Failed to build marketplace client");

    let state = Arc::new(AppState {
        provider: Arc::new(provider),
        retry: RetryPolicy::edge(),
        responses: TtlCache::with_ttls(RESPONSE_TTL, RESPONSE_TTL),
    });
    spawn_sweeper(state.clone(), SWEEP_INTERVAL);

    let allowed_origins = std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    tracing::info!("Floor proxy listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app(state, &allowed_origins))
        .await
        .expect("Server error");
}
