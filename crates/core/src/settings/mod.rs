//! Settings module - resolving which currencies a chat converts into.

mod target_currencies;

pub use target_currencies::TargetCurrencies;
