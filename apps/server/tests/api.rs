use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use rust_decimal_macros::dec;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use currva_core::formatting::messages::{OVERSIZED_OUTPUT_NOTICE, ZERO_AMOUNT_MESSAGE};
use currva_market_data::ManualQuoteProvider;
use currva_server::{api::app_router, build_state_with_provider, config::Config};

async fn build_test_router(provider: Arc<ManualQuoteProvider>) -> (axum::Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        snapshot_path: tmp.path().join("rates.json"),
        ..Config::new("test-key")
    };
    let state = build_state_with_provider(&config, provider).await.unwrap();
    (app_router(state, &config), tmp)
}

fn provider() -> Arc<ManualQuoteProvider> {
    Arc::new(ManualQuoteProvider::from_pairs([
        ("EUR", dec!(0.92)),
        ("ILS", dec!(3.6)),
        ("RUB", dec!(90)),
        ("GBP", dec!(0.8)),
        ("JPY", dec!(150)),
        ("AMD", dec!(400)),
    ]))
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn post_message(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/messages")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn message_with_mentions_is_converted() {
    let (app, _tmp) = build_test_router(provider()).await;

    let (status, json) = send(
        &app,
        post_message(serde_json::json!({ "text": "взял за 10$", "currencies": ["EUR", "XXX"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mentions"].as_array().unwrap().len(), 1);
    assert_eq!(json["mentions"][0]["currency"], "USD");
    assert_eq!(json["mentions"][0]["originalText"], "10$");
    assert_eq!(json["reply"], "10$ (🇺🇸) это 🇪🇺 €9.2");
    assert_eq!(json["preview"], "10$ (🇪🇺 €9.2)");
    assert_eq!(json["annotated"], "взял за 10$ (🇪🇺 €9.2)");
}

#[tokio::test]
async fn message_without_mentions_has_no_reply() {
    let (app, _tmp) = build_test_router(provider()).await;

    let (status, json) = send(&app, post_message(serde_json::json!({ "text": "привет" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["mentions"].as_array().unwrap().is_empty());
    assert!(json.get("reply").is_none());
    assert!(json.get("annotated").is_none());
}

#[tokio::test]
async fn zero_amount_gets_sentinel() {
    let (app, _tmp) = build_test_router(provider()).await;

    let (_, json) = send(&app, post_message(serde_json::json!({ "text": "0 долларов" }))).await;

    assert_eq!(json["reply"], ZERO_AMOUNT_MESSAGE);
}

#[tokio::test]
async fn oversized_reply_is_replaced() {
    let (app, _tmp) = build_test_router(provider()).await;
    let text = "я".repeat(4100) + " 5$";

    let (_, json) = send(&app, post_message(serde_json::json!({ "text": text }))).await;

    assert_eq!(json["annotated"], OVERSIZED_OUTPUT_NOTICE);
    assert_ne!(json["reply"], OVERSIZED_OUTPUT_NOTICE);
}

#[tokio::test]
async fn rates_endpoint() {
    let (app, _tmp) = build_test_router(provider()).await;

    let (status, json) = send(&app, get("/api/v1/rates/usd/ILS")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["base"], "USD");
    assert_eq!(json["rate"], 3.6);
    assert!(json["lastUpdate"].is_string());

    let (_, identity) = send(&app, get("/api/v1/rates/EUR/EUR")).await;
    assert_eq!(identity["rate"], 1.0);

    let (status, _) = send(&app, get("/api/v1/rates/USD/XXX")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn currencies_and_health() {
    let (app, _tmp) = build_test_router(provider()).await;

    let (status, currencies) = send(&app, get("/api/v1/currencies")).await;
    assert_eq!(status, StatusCode::OK);
    let usd = currencies
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["code"] == "USD")
        .unwrap();
    assert_eq!(usd["symbolBeforeAmount"], true);
    assert_eq!(usd["flag"], "🇺🇸");

    let (status, health) = send(&app, get("/api/v1/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["currencies"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn failing_quote_source_still_serves() {
    let provider = provider();
    provider.fail_with("offline");
    let (app, _tmp) = build_test_router(provider).await;

    let (_, health) = send(&app, get("/api/v1/healthz")).await;
    assert_eq!(health["status"], "empty");

    let (_, json) = send(&app, post_message(serde_json::json!({ "text": "100 шекелей" }))).await;
    assert_eq!(json["reply"], "100 шекелей (🇮🇱) это (нет доступных курсов конвертации)");
}
