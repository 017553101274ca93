use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::main_lib::AppState;

mod currencies;
mod health;
mod messages;
pub mod output_guard;
mod rates;

/// Upper bound for one request, rate lookups and processing included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    tracing::debug!(
        "Building router (max {} mentions per message)",
        config.max_mentions
    );

    let api = Router::new()
        .merge(messages::router())
        .merge(currencies::router())
        .merge(rates::router())
        .merge(health::router());

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}
