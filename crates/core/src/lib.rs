//! Currva Core - finding money in chat text and converting it.
//!
//! The pipeline is [`mentions`] (matching, overlap resolution, amount
//! normalization), [`fx`] (rate cache and conversion rules) and
//! [`formatting`], tied together per message by [`processor`].
//! Quotes come from a `currva_market_data::QuoteProvider`.

pub mod constants;
pub mod currencies;
pub mod errors;
pub mod formatting;
pub mod fx;
pub mod mentions;
pub mod processor;
pub mod settings;

pub use currencies::{registry, CurrencyDescriptor};
pub use fx::{RateCache, RateCacheConfig, RateLookup, RateRefresher, RateTable};
pub use mentions::CurrencyMention;
pub use processor::{MessageProcessor, ProcessorConfig, RenderedReply};
pub use settings::TargetCurrencies;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
