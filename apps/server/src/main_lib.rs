use std::sync::Arc;

use crate::config::Config;
use currva_core::{
    MessageProcessor, ProcessorConfig, RateCache, RateCacheConfig, TargetCurrencies,
};
use currva_market_data::{ApiLayerProvider, QuoteProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub processor: MessageProcessor,
    pub rate_cache: Arc<RateCache>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CURRVA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Builds state around the apilayer quote source.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = ApiLayerProvider::with_options(
        config.api_key.clone(),
        config.quotes_url.clone(),
        config.request_timeout,
    );
    build_state_with_provider(config, Arc::new(provider)).await
}

/// Builds state around any quote source and loads or fetches rates before
/// returning.
pub async fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn QuoteProvider>,
) -> anyhow::Result<Arc<AppState>> {
    if config.max_mentions == 0 {
        anyhow::bail!("CURRVA_MAX_MENTIONS must be at least 1");
    }

    let default_targets = match &config.default_currencies {
        Some(list) => TargetCurrencies::parse_list(list, &TargetCurrencies::default()),
        None => TargetCurrencies::default(),
    };
    tracing::info!("Default target currencies: {:?}", default_targets.as_slice());

    let rate_cache = Arc::new(RateCache::new(
        provider,
        RateCacheConfig {
            snapshot_path: config.snapshot_path.clone(),
            ttl: config.rates_ttl,
            poll_interval: config.poll_interval,
            request_timeout: config.request_timeout,
        },
    ));
    rate_cache.initialize().await;

    let processor = MessageProcessor::new(ProcessorConfig {
        max_mentions: config.max_mentions,
        implausible_ceiling: config.implausible_ceiling,
        default_targets,
    });

    Ok(Arc::new(AppState {
        processor,
        rate_cache,
    }))
}
