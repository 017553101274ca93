//! Core error types for currva.
//!
//! Most failures in the message pipeline are not errors at all: a malformed
//! numeral becomes a zero amount and a missing rate drops one target. The
//! types here cover what is left: bad rule tables, cache I/O and quote
//! fetching.

use thiserror::Error;

use crate::fx::FxError;
use currva_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Currency '{0}' is not supported")]
    UnsupportedCurrency(String),

    #[error("Invalid matching rule for {currency}: {message}")]
    InvalidRule { currency: String, message: String },

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for text parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse amount '{input}': {source}")]
    AmountParse {
        input: String,
        source: rust_decimal::Error,
    },

    #[error("Amount '{0}' is out of range")]
    AmountOverflow(String),
}
