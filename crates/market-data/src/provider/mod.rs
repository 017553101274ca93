//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all quote sources implement
//! - Concrete providers: apilayer currency data, plus a manual in-memory
//!   source behind the `test-utils` feature
//!
//! Providers only fetch and decode. Cross-rate derivation, caching and
//! persistence live in the rate cache of `currva-core`.

mod traits;

pub mod apilayer;
#[cfg(any(test, feature = "test-utils"))]
pub mod manual;

pub use traits::{QuoteProvider, DEFAULT_ANCHOR};
