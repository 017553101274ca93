use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::Currency;

/// Quotes for a set of currencies against one anchor currency.
///
/// `quotes[code]` is the number of units of `code` that one unit of
/// `anchor` buys. The anchor itself is never stored in the map; it is
/// reported as `1` by [`AnchorQuotes::quote`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnchorQuotes {
    /// Anchor currency all quotes are expressed against (e.g. "USD")
    pub anchor: Currency,

    /// Units of each currency per one unit of the anchor
    pub quotes: HashMap<Currency, Decimal>,

    /// When the source produced these quotes
    pub timestamp: DateTime<Utc>,

    /// Source of the quotes (APILAYER, MANUAL, etc.)
    pub source: String,
}

impl AnchorQuotes {
    /// Create an empty quote set for the given anchor
    pub fn new(anchor: impl Into<Currency>, timestamp: DateTime<Utc>, source: String) -> Self {
        Self {
            anchor: anchor.into(),
            quotes: HashMap::new(),
            timestamp,
            source,
        }
    }

    /// Add a quote, ignoring the anchor itself
    pub fn with_quote(mut self, currency: impl Into<Currency>, rate: Decimal) -> Self {
        let currency = currency.into();
        if currency != self.anchor {
            self.quotes.insert(currency, rate);
        }
        self
    }

    /// Units of `currency` per one unit of the anchor.
    ///
    /// Returns `1` for the anchor, `None` when the source did not quote
    /// the currency or quoted a non-positive value.
    pub fn quote(&self, currency: &str) -> Option<Decimal> {
        if currency == self.anchor {
            return Some(Decimal::ONE);
        }
        self.quotes
            .get(currency)
            .copied()
            .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
    }

    /// Number of quoted currencies, anchor excluded
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
