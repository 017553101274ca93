use std::time::Duration;
use thiserror::Error;

use currva_market_data::MarketDataError;

/// Failures of the exchange-rate cache.
///
/// None of these reach a chat user: a failed refresh leaves the previous
/// table in place and is only logged.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Rate cache error: {0}")]
    CacheError(String),

    #[error("Quote fetch timed out after {0:?}")]
    FetchTimeout(Duration),

    #[error("Quote fetch failed: {0}")]
    Fetch(#[from] MarketDataError),

    #[error("Quotes from {provider} are anchored to {found}, expected {expected}")]
    AnchorMismatch {
        provider: String,
        expected: String,
        found: String,
    },

    #[error("Snapshot I/O failed for {path}: {source}")]
    SnapshotIo {
        path: String,
        source: std::io::Error,
    },

    #[error("Snapshot is malformed: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
}

impl FxError {
    /// Whether the next scheduled refresh is likely to succeed without
    /// operator action.
    pub fn is_transient(&self) -> bool {
        match self {
            FxError::FetchTimeout(_) => true,
            FxError::Fetch(e) => e.is_transient(),
            _ => false,
        }
    }
}
