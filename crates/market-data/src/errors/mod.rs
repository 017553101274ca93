//! Error types for the market data crate.
//!
//! [`MarketDataError`] covers every way a quote fetch can fail. The rate
//! cache never propagates these past a refresh attempt; it only uses
//! [`MarketDataError::is_transient`] to pick a log level before retrying
//! on the next tick.

use thiserror::Error;

/// Errors that can occur while fetching exchange-rate quotes.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider rejected the API key (HTTP 401/403).
    /// Retrying won't help until the key is fixed.
    #[error("Unauthorized: {provider}")]
    Unauthorized {
        /// The provider that rejected the credentials
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with an error status or `success: false`.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The response body could not be decoded into quotes.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that sent the body
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the failure is expected to clear up by itself.
    ///
    /// Transient failures are logged as warnings; everything else points at
    /// a configuration or provider problem and is logged as an error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } => true,
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Unauthorized { .. } | Self::ProviderError { .. } | Self::InvalidResponse { .. } => {
                false
            }
        }
    }
}
