//! Declarative currency vocabulary.
//!
//! Each entry of `currency_rules.json` names a currency, the unit scale its
//! words denote, and the tokens that mark it. Entries are registered in file
//! order; on overlapping matches at the same offset the earlier entry wins.
//! Adding a currency or a word form is an edit to the JSON file only.

use lazy_static::lazy_static;
use serde::Deserialize;

use super::mentions_model::{AmountUnit, CurrencyTag};

#[derive(Debug, Deserialize)]
struct RuleCatalog {
    rules: Vec<CurrencyRule>,
}

/// Vocabulary for one currency tag.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CurrencyRule {
    pub currency: String,
    #[serde(default)]
    pub unit: AmountUnit,
    /// Literal symbols written before the digits: `£5`
    #[serde(default)]
    pub prefix_symbols: Vec<String>,
    /// Regex fragments for words after the digits: `фунт(?:ов|а|)`
    #[serde(default)]
    pub suffix_terms: Vec<String>,
    /// Literal symbols written after the digits: `5 ₪`
    #[serde(default)]
    pub suffix_symbols: Vec<String>,
    /// Regex fragments for compound words that imply an amount on their own
    #[serde(default)]
    pub bare_terms: Vec<String>,
}

impl CurrencyRule {
    pub fn tag(&self) -> CurrencyTag {
        CurrencyTag::new(self.currency.to_uppercase(), self.unit)
    }
}

lazy_static! {
    static ref DEFAULT_RULES: Vec<CurrencyRule> = {
        let json = include_str!("currency_rules.json");
        let catalog: RuleCatalog =
            serde_json::from_str(json).expect("currency_rules.json must be valid");
        catalog.rules
    };
}

/// The built-in rule table in registration order.
pub fn default_rules() -> &'static [CurrencyRule] {
    &DEFAULT_RULES
}
