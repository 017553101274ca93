//! Manual quote provider.
//!
//! Serves quotes that were set in-process instead of fetched over the
//! network. Used as the quote source in tests; enabled by the `test-utils`
//! feature outside this crate.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::MarketDataError;
use crate::models::AnchorQuotes;
use crate::provider::{QuoteProvider, DEFAULT_ANCHOR};

/// Provider ID constant
const PROVIDER_ID: &str = "MANUAL";

enum ManualState {
    Quotes(AnchorQuotes),
    Failing(String),
}

/// In-memory quote provider with switchable quotes and failures.
pub struct ManualQuoteProvider {
    state: Mutex<ManualState>,
    calls: AtomicUsize,
}

impl ManualQuoteProvider {
    /// Create a provider serving the given quotes.
    pub fn new(quotes: AnchorQuotes) -> Self {
        Self {
            state: Mutex::new(ManualState::Quotes(quotes)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider from `(code, units per USD)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Decimal)>) -> Self {
        let quotes = pairs.into_iter().fold(
            AnchorQuotes::new(DEFAULT_ANCHOR, Utc::now(), PROVIDER_ID.to_string()),
            |quotes, (code, rate)| quotes.with_quote(code, rate),
        );
        Self::new(quotes)
    }

    /// Serve new quotes from the next fetch on.
    pub fn set_quotes(&self, quotes: AnchorQuotes) {
        if let Ok(mut state) = self.state.lock() {
            *state = ManualState::Quotes(quotes);
        }
    }

    /// Fail every fetch with the given message until quotes are set again.
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            *state = ManualState::Failing(message.into());
        }
    }

    /// Number of fetches served so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for ManualQuoteProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quotes(&self, _currencies: &[String]) -> Result<AnchorQuotes, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().map_err(|e| MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })?;
        match &*state {
            ManualState::Quotes(quotes) => {
                let mut quotes = quotes.clone();
                quotes.timestamp = Utc::now();
                Ok(quotes)
            }
            ManualState::Failing(message) => Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: message.clone(),
            }),
        }
    }
}
