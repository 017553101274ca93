use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use currva_core::registry;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateResponse {
    base: String,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_update: Option<DateTime<Utc>>,
}

fn known_code(code: &str) -> ApiResult<String> {
    registry()
        .get(code)
        .map(|descriptor| descriptor.code.clone())
        .ok_or_else(|| ApiError::NotFound(format!("Unknown currency: {}", code)))
}

async fn get_rate(
    Path((base, target)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RateResponse>> {
    let base = known_code(&base)?;
    let target = known_code(&target)?;

    let table = state.rate_cache.snapshot();
    let rate = if base == target {
        Some(Decimal::ONE)
    } else {
        table.get_rate(&base, &target)
    };

    Ok(Json(RateResponse {
        base,
        target,
        rate,
        last_update: table.last_update,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/rates/{base}/{target}", get(get_rate))
}
