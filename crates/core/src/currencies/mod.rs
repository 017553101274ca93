//! Currencies module - the process-wide currency registry.

mod currencies_model;
mod currencies_registry;

pub use currencies_model::{flag_for_country, CurrencyDescriptor};
pub use currencies_registry::{registry, CurrencyRegistry};
