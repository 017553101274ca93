//! FX module - rate table, self-refreshing cache and conversion rules.

mod conversion_engine;
mod fx_errors;
mod fx_model;
mod fx_traits;
mod rate_cache;

pub use conversion_engine::{Conversion, ConversionEngine};
pub use fx_errors::FxError;
pub use fx_model::RateTable;
pub use fx_traits::RateLookup;
pub use rate_cache::{RateCache, RateCacheConfig, RateRefresher};
