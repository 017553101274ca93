//! Applies rates to a detected mention.

use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use super::fx_traits::RateLookup;
use crate::constants::{DEFAULT_IMPLAUSIBLE_CEILING, ESTIMATE_CURRENCY, KG_PER_POUND};
use crate::mentions::CurrencyMention;

/// Words that mark a GBP mention as a weight.
const MASS_WORDS: &[&str] = &["фунт", "pound"];

/// Outcome of converting one mention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Conversion {
    ZeroAmount,
    ImplausibleAmount,
    NoOtherCurrencies,
    #[serde(rename_all = "camelCase")]
    Converted {
        /// Weight reading of a "pounds" mention, in kilograms
        mass_kg: Option<Decimal>,
        /// `(target, amount)` in target order; unknown rates are left out
        amounts: Vec<(String, Decimal)>,
    },
}

pub struct ConversionEngine {
    implausible_ceiling: Decimal,
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::new(Decimal::from(DEFAULT_IMPLAUSIBLE_CEILING))
    }
}

impl ConversionEngine {
    pub fn new(implausible_ceiling: Decimal) -> Self {
        Self {
            implausible_ceiling,
        }
    }

    pub fn implausible_ceiling(&self) -> Decimal {
        self.implausible_ceiling
    }

    /// Converts `mention` into every target other than its own currency.
    ///
    /// Guards run in order: zero amount, implausible amount, then a target
    /// list with nothing to convert into. A rate is never looked up for a
    /// currency against itself.
    pub fn convert(
        &self,
        mention: &CurrencyMention,
        targets: &[String],
        rates: &dyn RateLookup,
    ) -> Conversion {
        if mention.amount.is_zero() {
            return Conversion::ZeroAmount;
        }

        if let Some(estimate) = self.usd_estimate(mention, rates) {
            if estimate.abs() >= self.implausible_ceiling {
                log::debug!(
                    "{} {} is about {} {}, not converting",
                    mention.amount,
                    mention.currency,
                    estimate,
                    ESTIMATE_CURRENCY
                );
                return Conversion::ImplausibleAmount;
            }
        }

        let others: Vec<&String> = targets
            .iter()
            .filter(|target| **target != mention.currency)
            .collect();
        if others.is_empty() {
            return Conversion::NoOtherCurrencies;
        }

        let amounts = others
            .into_iter()
            .filter_map(|target| match rates.get_rate(&mention.currency, target) {
                Some(rate) => mention
                    .amount
                    .checked_mul(rate)
                    .map(|converted| (target.clone(), converted)),
                None => {
                    log::debug!("No rate for {} -> {}, skipping", mention.currency, target);
                    None
                }
            })
            .collect();

        Conversion::Converted {
            mass_kg: Self::mass_kg(mention),
            amounts,
        }
    }

    /// An estimate too large for `Decimal` saturates to `Decimal::MAX`.
    fn usd_estimate(&self, mention: &CurrencyMention, rates: &dyn RateLookup) -> Option<Decimal> {
        if mention.currency == ESTIMATE_CURRENCY {
            return Some(mention.amount);
        }
        rates
            .get_rate(&mention.currency, ESTIMATE_CURRENCY)
            .map(|rate| mention.amount.checked_mul(rate).unwrap_or(Decimal::MAX))
    }

    /// Pounds written as a word also read as a weight; `£5` does not.
    pub fn mass_kg(mention: &CurrencyMention) -> Option<Decimal> {
        if mention.currency != "GBP" {
            return None;
        }
        let text = mention.original_text.to_lowercase();
        if !MASS_WORDS.iter().any(|word| text.contains(word)) {
            return None;
        }
        let kg_per_pound = Decimal::from_str(KG_PER_POUND).ok()?;
        mention.amount.checked_mul(kg_per_pound)
    }
}
