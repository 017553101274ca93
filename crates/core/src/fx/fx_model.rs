use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use currva_market_data::AnchorQuotes;

/// Decimal places kept for derived cross rates.
const CROSS_RATE_PRECISION: u32 = 10;

/// Every known `base -> target -> rate` pair plus the time of the refresh
/// that produced them.
///
/// Tables are never edited in place; a refresh builds a new one and swaps it
/// in whole. The serialized form is the on-disk snapshot:
///
/// ```json
/// {"rates": {"USD": {"EUR": 0.92}}, "last_update": "2024-01-01T00:00:00Z"}
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    #[serde(default)]
    pub rates: BTreeMap<String, BTreeMap<String, Decimal>>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

impl RateTable {
    /// Derives every cross rate of `universe` from anchor quotes.
    ///
    /// `rate(base, target) = quote(target) / quote(base)`. Currencies the
    /// quotes do not cover are left out of the table.
    pub fn from_quotes(quotes: &AnchorQuotes, universe: &[String], updated_at: DateTime<Utc>) -> Self {
        let quoted: Vec<(&String, Decimal)> = universe
            .iter()
            .filter_map(|code| match quotes.quote(code) {
                Some(quote) => Some((code, quote)),
                None => {
                    log::warn!(
                        "No {} quote for {} from {}, skipping",
                        quotes.anchor,
                        code,
                        quotes.source
                    );
                    None
                }
            })
            .collect();

        let mut rates = BTreeMap::new();
        for (base, base_quote) in &quoted {
            let row: BTreeMap<String, Decimal> = quoted
                .iter()
                .filter(|(target, _)| target != base)
                .filter_map(|(target, target_quote)| {
                    target_quote
                        .checked_div(*base_quote)
                        .map(|rate| ((*target).clone(), rate.round_dp(CROSS_RATE_PRECISION)))
                })
                .collect();
            if !row.is_empty() {
                rates.insert((*base).clone(), row);
            }
        }

        Self {
            rates,
            last_update: Some(updated_at),
        }
    }

    pub fn get_rate(&self, base: &str, target: &str) -> Option<Decimal> {
        self.rates.get(base).and_then(|row| row.get(target)).copied()
    }

    /// Codes that have at least one known rate, sorted.
    pub fn currencies(&self) -> Vec<String> {
        self.rates.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Whether the table is older than `ttl` at `now`. A table that was
    /// never refreshed is always stale.
    pub fn is_stale(&self, ttl: std::time::Duration, now: DateTime<Utc>) -> bool {
        match self.last_update {
            Some(updated) => chrono::Duration::from_std(ttl)
                .map(|ttl| now.signed_duration_since(updated) >= ttl)
                .unwrap_or(false),
            None => true,
        }
    }
}
