//! HTTP provider tests against local mock servers.

use std::time::Duration;

use giftprice_sdk::providers::{EdgeProxyProvider, StaticProvider, TonnelProvider};
use giftprice_sdk::{FloorProvider, MarketConfig, ProviderError};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn market_config() -> MarketConfig {
    MarketConfig {
        timeout: Duration::from_secs(5),
        user_agent: "giftprice-test".to_string(),
        ..MarketConfig::default()
    }
}

fn tonnel_for(server: &ServerGuard) -> TonnelProvider {
    TonnelProvider::with_urls(
        &market_config(),
        &format!("{}/api/pageGifts", server.url()),
        &format!("{}/", server.url()),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// TonnelProvider
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tonnel_returns_min_matching_price_and_sends_session_cookies() {
    let mut server = Server::new_async().await;
    let session = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "cf_clearance=abc123; Path=/; HttpOnly")
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/pageGifts")
        .match_header("cookie", "cf_clearance=abc123")
        .match_header("origin", "https://market.tonnel.network")
        .match_body(Matcher::PartialJson(json!({
            "page": 1,
            "limit": 50,
            "sort": { "price": 1 },
            "filter": { "search": "Plush Pepe" },
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "docs": [
                { "name": "Plush Pepe", "price": 5200000000000_u64 },
                { "giftName": "plush pepe #77", "price": 4999.5 },
                { "name": "Swiss Watch", "price": 12 },
                { "name": "Plush Pepe", "price": 0 },
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let provider = tonnel_for(&server);
    assert_eq!(provider.name(), "tonnel");
    let floor = provider.resolve_floor("Plush Pepe").await.unwrap();
    assert_eq!(floor, Some(4999.5));

    session.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn tonnel_session_is_reused_between_calls() {
    let mut server = Server::new_async().await;
    let session = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "sid=1")
        .expect(1)
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/pageGifts")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "items": [] }).to_string())
        .expect(2)
        .create_async()
        .await;

    let provider = tonnel_for(&server);
    assert_eq!(provider.resolve_floor("Swiss Watch").await.unwrap(), None);
    assert_eq!(provider.resolve_floor("Homemade Cake").await.unwrap(), None);

    session.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn tonnel_forbidden_refreshes_session_once_then_reports_blocked() {
    let mut server = Server::new_async().await;
    let session = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("set-cookie", "sid=stale")
        .expect(2)
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/pageGifts")
        .with_status(403)
        .expect(2)
        .create_async()
        .await;

    let provider = tonnel_for(&server);
    let err = provider.resolve_floor("Plush Pepe").await.unwrap_err();
    assert_eq!(err, ProviderError::Blocked { status: 403 });
    assert!(!err.is_retryable());

    session.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn tonnel_rate_limit_is_blocked_without_session_refresh() {
    let mut server = Server::new_async().await;
    let session = server
        .mock("GET", "/")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/pageGifts")
        .with_status(429)
        .expect(1)
        .create_async()
        .await;

    let provider = tonnel_for(&server);
    let err = provider.resolve_floor("Plush Pepe").await.unwrap_err();
    assert_eq!(err, ProviderError::Blocked { status: 429 });

    session.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn tonnel_server_error_is_retryable_transport_failure() {
    let mut server = Server::new_async().await;
    let _session = server.mock("GET", "/").with_status(200).create_async().await;
    let _search = server
        .mock("POST", "/api/pageGifts")
        .with_status(502)
        .create_async()
        .await;

    let provider = tonnel_for(&server);
    let err = provider.resolve_floor("Plush Pepe").await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn tonnel_works_without_a_session() {
    let mut server = Server::new_async().await;
    let _session = server.mock("GET", "/").with_status(500).create_async().await;
    let search = server
        .mock("POST", "/api/pageGifts")
        .match_header("cookie", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "title": "Homemade Cake", "amount": "2.75" }]).to_string())
        .create_async()
        .await;

    let provider = tonnel_for(&server);
    assert_eq!(provider.resolve_floor("homemade cake").await.unwrap(), Some(2.75));
    search.assert_async().await;
}

#[tokio::test]
async fn tonnel_malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    let _session = server.mock("GET", "/").with_status(200).create_async().await;
    let _search = server
        .mock("POST", "/api/pageGifts")
        .with_status(200)
        .with_body("<html>challenge</html>")
        .create_async()
        .await;

    let provider = tonnel_for(&server);
    let err = provider.resolve_floor("Plush Pepe").await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
}

// ---------------------------------------------------------------------------
// EdgeProxyProvider
// ---------------------------------------------------------------------------

#[tokio::test]
async fn proxy_maps_floor_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/floor")
        .match_query(Matcher::UrlEncoded("collection".into(), "Plush Pepe".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "ok": true,
                "collection": "Plush Pepe",
                "floorTon": 4999.5,
                "source": "tonnel",
                "cached": true,
                "error": null,
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = EdgeProxyProvider::new(&market_config(), &format!("{}/", server.url())).unwrap();
    assert_eq!(provider.name(), "proxy");
    assert_eq!(provider.resolve_floor("Plush Pepe").await.unwrap(), Some(4999.5));
    mock.assert_async().await;
}

#[tokio::test]
async fn proxy_null_floor_is_not_found() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/floor")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({ "ok": true, "collection": "X", "floorTon": null, "source": "tonnel", "cached": false, "error": null })
                .to_string(),
        )
        .create_async()
        .await;

    let provider = EdgeProxyProvider::new(&market_config(), &server.url()).unwrap();
    assert_eq!(provider.resolve_floor("X").await.unwrap(), None);
}

#[tokio::test]
async fn proxy_failure_is_transport_error() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/floor")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({ "ok": false, "collection": "X", "floorTon": null, "source": "tonnel", "cached": false, "error": "TONNEL status 403" })
                .to_string(),
        )
        .create_async()
        .await;

    let provider = EdgeProxyProvider::new(&market_config(), &server.url()).unwrap();
    let err = provider.resolve_floor("X").await.unwrap_err();
    assert_eq!(err, ProviderError::Transport("TONNEL status 403".to_string()));
}

#[tokio::test]
async fn proxy_forbidden_is_blocked() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/floor")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let provider = EdgeProxyProvider::new(&market_config(), &server.url()).unwrap();
    let err = provider.resolve_floor("X").await.unwrap_err();
    assert!(err.is_blocked());
}

#[test]
fn proxy_from_config_requires_url() {
    assert!(EdgeProxyProvider::from_config(&market_config()).unwrap().is_none());

    let cfg = MarketConfig {
        proxy_url: Some("https://edge.example".to_string()),
        ..market_config()
    };
    let provider = EdgeProxyProvider::from_config(&cfg).unwrap().unwrap();
    assert_eq!(provider.base_url(), "https://edge.example");

    assert!(EdgeProxyProvider::new(&cfg, "  ").is_err());
}

// ---------------------------------------------------------------------------
// StaticProvider
// ---------------------------------------------------------------------------

#[tokio::test]
async fn static_provider_uses_shared_matching_rules() {
    let provider = StaticProvider::new("static")
        .with_floor("Plush Pepe", 5000.0)
        .with_floor("Plush Pepe (old)", 4800.0)
        .with_floor("Swiss Watch", 20.0);

    assert_eq!(provider.resolve_floor("plush pepe").await.unwrap(), Some(4800.0));
    assert_eq!(provider.resolve_floor("Durov's Cap").await.unwrap(), None);
}
