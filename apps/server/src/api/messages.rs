use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::output_guard::guard_output;
use crate::{error::ApiResult, main_lib::AppState};
use currva_core::{CurrencyMention, TargetCurrencies};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageRequest {
    text: String,
    /// Overrides the server's default targets
    #[serde(default)]
    currencies: Option<Vec<String>>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct MessageResponse {
    mentions: Vec<CurrencyMention>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotated: Option<String>,
}

/// Scans one message and renders conversions for every mention.
///
/// A processing failure is logged and answered like a message without
/// mentions.
async fn process_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let defaults = &state.processor.config().default_targets;
    let targets = TargetCurrencies::resolve(request.currencies.as_deref(), defaults);

    let rendered =
        match state
            .processor
            .process_with_cache(&request.text, &targets, &state.rate_cache)
        {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::error!("Failed to process message: {}", e);
                None
            }
        };

    let response = match rendered {
        Some(rendered) => MessageResponse {
            mentions: rendered.mentions,
            reply: Some(guard_output(rendered.reply)),
            preview: Some(guard_output(rendered.preview)),
            annotated: Some(guard_output(rendered.annotated)),
        },
        None => MessageResponse::default(),
    };
    Ok(Json(response))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/messages", post(process_message))
}
