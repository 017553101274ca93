//! Quote provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::AnchorQuotes;

/// Default anchor currency for quote sources
pub const DEFAULT_ANCHOR: &str = "USD";

/// Trait for exchange-rate quote sources.
///
/// Implement this trait to add support for a new quote source. The rate
/// cache calls [`fetch_quotes`](Self::fetch_quotes) once per refresh and
/// derives every cross-rate from the returned anchor vector.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use currva_market_data::{AnchorQuotes, MarketDataError, QuoteProvider};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl QuoteProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn fetch_quotes(&self, currencies: &[String]) -> Result<AnchorQuotes, MarketDataError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "APILAYER". Used for logging.
    fn id(&self) -> &'static str;

    /// Anchor currency the provider quotes against.
    fn anchor(&self) -> &str {
        DEFAULT_ANCHOR
    }

    /// Fetch the latest quotes for the given currencies.
    ///
    /// # Arguments
    ///
    /// * `currencies` - ISO codes the caller is interested in. Providers may
    ///   return more or fewer; missing codes are the caller's problem.
    ///
    /// # Returns
    ///
    /// The anchor-denominated quotes on success, or a `MarketDataError` on failure.
    async fn fetch_quotes(&self, currencies: &[String]) -> Result<AnchorQuotes, MarketDataError>;
}
