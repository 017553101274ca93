//! Market data models
//!
//! - `types` - Type aliases for common identifiers (Currency)
//! - `quote` - Anchor-denominated quote vector (AnchorQuotes)

mod quote;
mod types;

pub use quote::AnchorQuotes;
pub use types::Currency;
