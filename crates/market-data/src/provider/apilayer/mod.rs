//! apilayer Currency Data provider.
//!
//! Fetches live quotes from `https://api.apilayer.com/currency_data/live`.
//! The endpoint answers with every currency quoted against USD, keyed as
//! `"USD<CODE>"`:
//!
//! ```json
//! {"success": true, "source": "USD", "timestamp": 1700000000,
//!  "quotes": {"USDEUR": 0.92, "USDILS": 3.71}}
//! ```

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::AnchorQuotes;
use crate::provider::{QuoteProvider, DEFAULT_ANCHOR};

/// Provider ID constant
const PROVIDER_ID: &str = "APILAYER";

/// Live quotes endpoint
pub const DEFAULT_LIVE_URL: &str = "https://api.apilayer.com/currency_data/live";

/// Header carrying the API key
const API_KEY_HEADER: &str = "apikey";

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// API response from the live endpoint
#[derive(Debug, Deserialize)]
struct LiveResponse {
    /// Whether the request was successful
    success: bool,
    /// Anchor currency of the quotes
    #[serde(default)]
    source: Option<String>,
    /// Unix timestamp of the quotes
    #[serde(default)]
    timestamp: Option<i64>,
    /// `"<ANCHOR><CODE>" -> units of CODE per anchor`
    #[serde(default)]
    quotes: HashMap<String, f64>,
    /// Present when `success` is false
    #[serde(default)]
    error: Option<LiveError>,
}

#[derive(Debug, Deserialize)]
struct LiveError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    info: Option<String>,
}

/// apilayer Currency Data provider.
///
/// # Example
///
/// ```ignore
/// use currva_market_data::ApiLayerProvider;
///
/// let provider = ApiLayerProvider::new("your_api_key".to_string());
/// ```
pub struct ApiLayerProvider {
    client: Client,
    api_key: String,
    url: String,
}

impl ApiLayerProvider {
    /// Create a provider for the public endpoint with the default timeout.
    pub fn new(api_key: String) -> Self {
        Self::with_options(api_key, DEFAULT_LIVE_URL.to_string(), DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a provider with an explicit endpoint and request timeout.
    pub fn with_options(api_key: String, url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            url,
        }
    }

    fn provider_error(message: impl Into<String>) -> MarketDataError {
        MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: message.into(),
        }
    }

    fn map_status(status: StatusCode) -> MarketDataError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MarketDataError::Unauthorized {
                provider: PROVIDER_ID.to_string(),
            },
            StatusCode::TOO_MANY_REQUESTS => MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            },
            other => Self::provider_error(format!("HTTP {}", other)),
        }
    }

    /// Decode a live response body into anchor quotes.
    ///
    /// Keys that do not start with the anchor code and values that are not
    /// finite positive numbers are skipped.
    pub fn parse_live_response(body: &str) -> Result<AnchorQuotes, MarketDataError> {
        let response: LiveResponse =
            serde_json::from_str(body).map_err(|e| MarketDataError::InvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })?;

        if !response.success {
            let message = match response.error {
                Some(LiveError {
                    info: Some(info), ..
                }) => info,
                Some(LiveError {
                    code: Some(code), ..
                }) => format!("error code {}", code),
                _ => "API request failed".to_string(),
            };
            return Err(Self::provider_error(message));
        }

        let anchor = response
            .source
            .unwrap_or_else(|| DEFAULT_ANCHOR.to_string());
        let timestamp: DateTime<Utc> = response
            .timestamp
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        let mut quotes = AnchorQuotes::new(anchor.clone(), timestamp, PROVIDER_ID.to_string());
        for (key, value) in response.quotes {
            let Some(code) = key.strip_prefix(anchor.as_str()) else {
                log::debug!("{}: skipping quote key without anchor prefix: {}", PROVIDER_ID, key);
                continue;
            };
            if !value.is_finite() || value <= 0.0 {
                log::warn!("{}: ignoring invalid quote {} = {}", PROVIDER_ID, key, value);
                continue;
            }
            match Decimal::try_from(value) {
                Ok(rate) => quotes = quotes.with_quote(code, rate),
                Err(_) => {
                    log::warn!("{}: quote {} = {} does not fit a decimal", PROVIDER_ID, key, value);
                }
            }
        }

        if quotes.is_empty() {
            return Err(MarketDataError::InvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: "response contained no usable quotes".to_string(),
            });
        }

        Ok(quotes)
    }
}

#[async_trait]
impl QuoteProvider for ApiLayerProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quotes(&self, currencies: &[String]) -> Result<AnchorQuotes, MarketDataError> {
        let mut request = self
            .client
            .get(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("source", DEFAULT_ANCHOR)]);
        if !currencies.is_empty() {
            request = request.query(&[("currencies", currencies.join(","))]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status(status));
        }

        let body = response.text().await?;
        Self::parse_live_response(&body)
    }
}
