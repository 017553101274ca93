//! Background exchange-rate refresh for the server.

use std::sync::Arc;
use tracing::info;

use crate::main_lib::AppState;
use currva_core::RateRefresher;

/// Starts the rate refresher. Stop it with [`RateRefresher::stop`] on
/// shutdown so an in-flight snapshot write is not cut short.
pub fn start_rate_refresher(state: &Arc<AppState>) -> RateRefresher {
    let config = state.rate_cache.config();
    info!(
        "Rate refresher started (poll every {}s, refresh after {}s)",
        config.poll_interval.as_secs(),
        config.ttl.as_secs()
    );
    state.rate_cache.start()
}
