use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use currva_core::constants::{
    DEFAULT_IMPLAUSIBLE_CEILING, DEFAULT_MAX_MENTIONS, DEFAULT_POLL_INTERVAL, DEFAULT_RATES_TTL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_SNAPSHOT_PATH,
};
use currva_market_data::provider::apilayer::DEFAULT_LIVE_URL;
use rust_decimal::Decimal;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8088";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// apilayer key for the quote source
    pub api_key: String,
    pub quotes_url: String,
    pub snapshot_path: PathBuf,
    pub rates_ttl: Duration,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// Comma-separated codes; the built-in list when unset
    pub default_currencies: Option<String>,
    pub implausible_ceiling: Decimal,
    pub max_mentions: usize,
}

impl Config {
    /// Defaults for everything except the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8088)),
            api_key: api_key.into(),
            quotes_url: DEFAULT_LIVE_URL.to_string(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            rates_ttl: DEFAULT_RATES_TTL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_currencies: None,
            implausible_ceiling: Decimal::from(DEFAULT_IMPLAUSIBLE_CEILING),
            max_mentions: DEFAULT_MAX_MENTIONS,
        }
    }

    /// Reads `CURRVA_*` variables, after loading a `.env` file if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("CURRVA_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("CURRVA_API_KEY must be set"))?;
        let defaults = Self::new(api_key);

        Ok(Self {
            api_key: defaults.api_key,
            listen_addr: parse_var("CURRVA_LISTEN_ADDR")?.unwrap_or(defaults.listen_addr),
            quotes_url: env::var("CURRVA_QUOTES_URL").unwrap_or(defaults.quotes_url),
            snapshot_path: env::var("CURRVA_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            rates_ttl: secs_var("CURRVA_RATES_TTL_SECS")?.unwrap_or(defaults.rates_ttl),
            poll_interval: secs_var("CURRVA_POLL_INTERVAL_SECS")?
                .unwrap_or(defaults.poll_interval),
            request_timeout: secs_var("CURRVA_REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout),
            default_currencies: env::var("CURRVA_DEFAULT_CURRENCIES").ok(),
            implausible_ceiling: parse_var("CURRVA_IMPLAUSIBLE_CEILING")?
                .unwrap_or(defaults.implausible_ceiling),
            max_mentions: parse_var("CURRVA_MAX_MENTIONS")?.unwrap_or(defaults.max_mentions),
        })
    }
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: {}", key, raw)),
        _ => Ok(None),
    }
}

fn secs_var(key: &str) -> anyhow::Result<Option<Duration>> {
    Ok(parse_var::<u64>(key)?.map(Duration::from_secs))
}
