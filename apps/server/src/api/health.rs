use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::main_lib::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    /// `ok`, `stale` (rates older than the TTL) or `empty` (no rates yet)
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_update: Option<DateTime<Utc>>,
    /// Currencies with at least one known rate
    currencies: Vec<String>,
}

async fn healthz(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let table = state.rate_cache.snapshot();
    let status = if table.is_empty() {
        "empty"
    } else if table.is_stale(state.rate_cache.config().ttl, Utc::now()) {
        "stale"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status,
        last_update: table.last_update,
        currencies: table.currencies(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/healthz", get(healthz))
}
