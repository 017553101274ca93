//! Numeral normalization.
//!
//! Chat users write `1.234.567`, `1 000`, `10,5`, `1.000,50` and `15к`
//! interchangeably. The rules below are a best-effort policy, not a parser
//! for every locale: `1.234` stays ambiguous and is read as a decimal.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::mentions_model::CurrencyTag;
use crate::errors::{Result, ValidationError};

/// Glyphs for the ×1000 shorthand: Cyrillic and Latin k.
const THOUSAND_GLYPHS: &[char] = &['к', 'К', 'k', 'K'];

pub struct AmountNormalizer;

impl AmountNormalizer {
    /// Turns a captured numeral into an amount of the tag's base currency.
    ///
    /// A numeral that cannot be parsed yields an amount of zero; the failure
    /// is logged and the mention is kept.
    pub fn normalize(captured: &str, tag: &CurrencyTag) -> (Decimal, String) {
        let amount = match Self::try_normalize(captured, tag) {
            Ok(amount) => amount,
            Err(e) => {
                log::warn!("Treating unparseable amount as zero: {}", e);
                Decimal::ZERO
            }
        };
        (amount, tag.currency.clone())
    }

    /// Like [`normalize`](Self::normalize) but surfaces the parse failure.
    pub fn try_normalize(captured: &str, tag: &CurrencyTag) -> Result<Decimal> {
        if captured.trim().is_empty() {
            if let Some(implicit) = tag.unit.implicit_amount() {
                return Ok(implicit);
            }
        }
        let amount = Self::parse_numeral(captured)?;
        tag.unit
            .apply(amount)
            .ok_or_else(|| ValidationError::AmountOverflow(captured.to_string()).into())
    }

    /// Parses a numeral with optional grouping, decimal part and `к` suffix.
    pub fn parse_numeral(captured: &str) -> Result<Decimal> {
        let compact: String = captured.chars().filter(|c| !c.is_whitespace()).collect();

        let (digits, multiplier) = match compact.strip_suffix(THOUSAND_GLYPHS) {
            Some(stripped) => (stripped, Decimal::ONE_THOUSAND),
            None => (compact.as_str(), Decimal::ONE),
        };

        let cleaned = Self::resolve_separators(digits);
        let value = Decimal::from_str(&cleaned).map_err(|source| ValidationError::AmountParse {
            input: captured.to_string(),
            source,
        })?;
        value
            .checked_mul(multiplier)
            .ok_or_else(|| ValidationError::AmountOverflow(captured.to_string()).into())
    }

    /// Rewrites `.`/`,` so the result uses `.` as the only decimal point.
    fn resolve_separators(digits: &str) -> String {
        let dots = digits.matches('.').count();
        let commas = digits.matches(',').count();

        if dots > 1 || commas > 1 {
            return digits.replace(['.', ','], "");
        }

        match (digits.rfind('.'), digits.rfind(',')) {
            (Some(dot), Some(comma)) => {
                if comma > dot {
                    digits.replace('.', "").replace(',', ".")
                } else {
                    digits.replace(',', "")
                }
            }
            (None, Some(comma)) => {
                let decimals = digits[comma + 1..].chars().count();
                if digits.starts_with("0,") || decimals <= 2 {
                    digits.replace(',', ".")
                } else {
                    digits.replace(',', "")
                }
            }
            _ => digits.to_string(),
        }
    }
}
