//! Mentions module - finding and normalizing money amounts in chat text.
//!
//! Flow: [`PatternMatcher`] finds raw candidates for every rule,
//! [`OverlapResolver`] keeps one interpretation per span and
//! [`AmountNormalizer`] turns each captured numeral into a decimal amount.

mod amount_normalizer;
mod mentions_model;
mod mentions_rules;
mod overlap_resolver;
mod pattern_matcher;

pub use amount_normalizer::AmountNormalizer;
pub use mentions_model::{AmountUnit, CurrencyMention, CurrencyTag, RawMatch};
pub use mentions_rules::{default_rules, CurrencyRule};
pub use overlap_resolver::OverlapResolver;
pub use pattern_matcher::{default_matcher, PatternMatcher};
