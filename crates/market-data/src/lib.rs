//! Currva Market Data Crate
//!
//! This crate fetches exchange-rate quotes from external sources for the
//! currva rate cache.
//!
//! # Overview
//!
//! Every source answers the same question: how many units of each currency
//! one unit of a fixed anchor currency buys. The rate cache derives every
//! cross-rate from that single vector.
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |  QuoteProvider   | --> |   AnchorQuotes   | --> |    RateCache     |
//! | (apilayer, ...)  |     | (USD -> CODE)    |     |  (currva-core)   |
//! +------------------+     +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`QuoteProvider`] - Async trait implemented by every quote source
//! - [`AnchorQuotes`] - Units of each currency per one unit of the anchor
//! - [`MarketDataError`] - Errors raised while fetching or decoding quotes

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{AnchorQuotes, Currency};
pub use provider::apilayer::ApiLayerProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use provider::manual::ManualQuoteProvider;
pub use provider::{QuoteProvider, DEFAULT_ANCHOR};
