use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Scale of the unit a rule's vocabulary names.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AmountUnit {
    /// "доллар", "$", "usd"
    #[default]
    Base,
    /// "килобакс": ×1000, and a bare token means 1000
    Kilo,
    /// "цент": ÷100
    Cent,
}

impl AmountUnit {
    /// Amount to assume when the token carries no digits.
    pub fn implicit_amount(&self) -> Option<Decimal> {
        match self {
            AmountUnit::Kilo => Some(Decimal::ONE_THOUSAND),
            AmountUnit::Base | AmountUnit::Cent => None,
        }
    }

    pub fn apply(&self, amount: Decimal) -> Option<Decimal> {
        match self {
            AmountUnit::Base => Some(amount),
            AmountUnit::Kilo => amount.checked_mul(Decimal::ONE_THOUSAND),
            AmountUnit::Cent => amount.checked_div(Decimal::ONE_HUNDRED),
        }
    }
}

/// What a matched token denotes: a base currency plus the unit scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTag {
    pub currency: String,
    pub unit: AmountUnit,
}

impl CurrencyTag {
    pub fn new(currency: impl Into<String>, unit: AmountUnit) -> Self {
        Self {
            currency: currency.into(),
            unit,
        }
    }

    pub fn base(currency: impl Into<String>) -> Self {
        Self::new(currency, AmountUnit::Base)
    }
}

/// One occurrence of one rule in a message, before overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub tag: CurrencyTag,
    /// Digits as written, possibly empty for compound tokens
    pub captured: String,
    /// Byte offset of the first matched byte
    pub start: usize,
    /// Byte offset one past the last matched byte
    pub end: usize,
    pub text: String,
}

/// A detected amount of money in a message.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyMention {
    pub amount: Decimal,
    pub currency: String,
    /// The matched substring, verbatim
    pub original_text: String,
    pub start: usize,
    pub end: usize,
}
