//! Yahoo chart client against a local stand-in for the upstream API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use stock_analyzer_backend::app::create_app;
use stock_analyzer_backend::config::{AnalysisConfig, UpstreamConfig, DEFAULT_USER_AGENT};
use stock_analyzer_backend::external::price_provider::{PriceProvider, PriceProviderError};
use stock_analyzer_backend::external::yahoo::YahooProvider;
use stock_analyzer_backend::services::price_service::{fetch_history, fetch_series};
use stock_analyzer_backend::state::AppState;

#[derive(Debug, Clone)]
struct SeenRequest {
    symbol: String,
    query: HashMap<String, String>,
    user_agent: Option<String>,
}

#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

async fn chart(
    Path(symbol): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    State(upstream): State<Upstream>,
) -> (StatusCode, String) {
    upstream.seen.lock().unwrap().push(SeenRequest {
        symbol,
        query,
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    (upstream.status, upstream.body.clone())
}

/// Serve `body` with `status` for every chart request; returns the base URL.
async fn spawn_upstream(status: StatusCode, body: &str) -> (String, Arc<Mutex<Vec<SeenRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let upstream = Upstream {
        status,
        body: body.to_string(),
        seen: seen.clone(),
    };
    let router = Router::new()
        .route("/v8/finance/chart/:symbol", get(chart))
        .with_state(upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

fn provider_for(base_url: &str) -> YahooProvider {
    YahooProvider::new(&UpstreamConfig {
        base_url: base_url.to_string(),
        ..UpstreamConfig::default()
    })
    .unwrap()
}

/// Five sessions starting 2024-01-02 14:30 UTC; the second has no close.
fn chart_body(closes: &[&str]) -> String {
    let timestamps: Vec<String> = (0..closes.len())
        .map(|i| (1_704_205_800_i64 + 86_400 * i as i64).to_string())
        .collect();
    let volumes: Vec<String> = (0..closes.len()).map(|i| (1_000 * (i + 1)).to_string()).collect();
    format!(
        r#"{{"chart":{{"result":[{{"meta":{{"symbol":"AAPL"}},"timestamp":[{}],"indicators":{{"quote":[{{"open":[],"close":[{}],"volume":[{}]}}]}}}}],"error":null}}}}"#,
        timestamps.join(","),
        closes.join(","),
        volumes.join(",")
    )
}

#[tokio::test]
async fn fetches_one_year_of_daily_history_with_browser_user_agent() {
    let body = chart_body(&["185.64", "null", "181.91", "0", "185.14"]);
    let (base_url, seen) = spawn_upstream(StatusCode::OK, &body).await;
    let provider = provider_for(&base_url);

    let points = provider.fetch_daily_history("AAPL", 365).await.unwrap();

    assert_eq!(points.len(), 3);
    assert_eq!(points[0].date.to_string(), "2024-01-02");
    assert_eq!(points[0].close, 185.64);
    assert_eq!(points[0].volume, 1_000);
    assert_eq!(points[1].date.to_string(), "2024-01-04");
    assert_eq!(points[2].date.to_string(), "2024-01-06");
    assert_eq!(points[2].volume, 5_000);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].symbol, "AAPL");
    assert_eq!(seen[0].query.get("interval").map(String::as_str), Some("1d"));
    assert_eq!(seen[0].query.get("range").map(String::as_str), Some("1y"));
    assert_eq!(seen[0].user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
}

#[tokio::test]
async fn server_error_is_network_failure_and_legacy_fetch_is_empty() {
    let (base_url, _) = spawn_upstream(StatusCode::INTERNAL_SERVER_ERROR, "oops").await;
    let provider = provider_for(&base_url);

    let err = fetch_history(&provider, "AAPL", 365).await.unwrap_err();
    assert!(matches!(err, PriceProviderError::Network(_)));

    assert!(fetch_series(&provider, "AAPL").await.is_empty());
}

#[tokio::test]
async fn missing_result_is_malformed_and_legacy_fetch_is_empty() {
    let (base_url, _) = spawn_upstream(StatusCode::OK, r#"{"chart":{"error":null}}"#).await;
    let provider = provider_for(&base_url);

    let err = provider.fetch_daily_history("AAPL", 365).await.unwrap_err();
    assert!(matches!(err, PriceProviderError::MalformedResponse(_)));

    assert!(fetch_series(&provider, "AAPL").await.is_empty());
}

#[tokio::test]
async fn upstream_404_is_not_found() {
    let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
    let (base_url, _) = spawn_upstream(StatusCode::NOT_FOUND, body).await;
    let provider = provider_for(&base_url);

    let err = provider.fetch_daily_history("NOPE", 365).await.unwrap_err();
    assert_eq!(err, PriceProviderError::NotFound);
}

#[tokio::test]
async fn upstream_429_is_rate_limited() {
    let (base_url, _) = spawn_upstream(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").await;
    let provider = provider_for(&base_url);

    let err = provider.fetch_daily_history("AAPL", 365).await.unwrap_err();
    assert_eq!(err, PriceProviderError::RateLimited);
}

#[tokio::test]
async fn unreachable_upstream_is_network_failure() {
    // grab a free port, then close it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = provider_for(&format!("http://{}", addr));

    let err = provider.fetch_daily_history("AAPL", 365).await.unwrap_err();
    assert!(matches!(err, PriceProviderError::Network(_)));
    assert!(fetch_series(&provider, "AAPL").await.is_empty());
}

#[tokio::test]
async fn end_to_end_analysis_through_yahoo_client() {
    let closes: Vec<String> = (0..60).map(|i| format!("{}.0", 100 + i)).collect();
    let closes: Vec<&str> = closes.iter().map(String::as_str).collect();
    let (base_url, seen) = spawn_upstream(StatusCode::OK, &chart_body(&closes)).await;

    let app = create_app(AppState::new(
        Arc::new(provider_for(&base_url)),
        AnalysisConfig::default(),
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stock?symbol=aapl")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["signal"], "BUY");
    assert_eq!(body["data"].as_array().unwrap().len(), 60);
    assert_eq!(seen.lock().unwrap()[0].symbol, "AAPL");
}
