use std::sync::Arc;

use axum::{routing::get, Json, Router};

use crate::main_lib::AppState;
use currva_core::{registry, CurrencyDescriptor};

async fn list_currencies() -> Json<Vec<CurrencyDescriptor>> {
    Json(registry().all().to_vec())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/currencies", get(list_currencies))
}
