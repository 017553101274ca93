//! JSON-driven currency registry.
//!
//! Loads `currencies.json` at compile time via `include_str!` and builds the
//! code index once via `lazy_static`. The registry is immutable for the
//! lifetime of the process.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Deserialize;

use super::currencies_model::{flag_for_country, CurrencyDescriptor};

// ── JSON schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrencyCatalog {
    currencies: Vec<CurrencyEntry>,
}

#[derive(Debug, Deserialize)]
struct CurrencyEntry {
    code: String,
    name: String,
    symbol: String,
    #[serde(default)]
    symbol_before_amount: bool,
    country: String,
}

// ── Registry with pre-built index ────────────────────────────────────────────

/// Every currency the pipeline can detect, convert into, or quote.
pub struct CurrencyRegistry {
    descriptors: Vec<CurrencyDescriptor>,
    index: HashMap<String, usize>,
}

lazy_static! {
    static ref REGISTRY: CurrencyRegistry = CurrencyRegistry::load();
}

/// The process-wide registry.
pub fn registry() -> &'static CurrencyRegistry {
    &REGISTRY
}

impl CurrencyRegistry {
    fn load() -> Self {
        let json = include_str!("currencies.json");
        let catalog: CurrencyCatalog =
            serde_json::from_str(json).expect("currencies.json must be valid");

        let mut descriptors = Vec::with_capacity(catalog.currencies.len());
        let mut index = HashMap::new();
        for entry in catalog.currencies {
            let flag = flag_for_country(&entry.country)
                .unwrap_or_else(|| panic!("invalid country code for {}", entry.code));
            let code = entry.code.to_uppercase();
            if index.insert(code.clone(), descriptors.len()).is_some() {
                panic!("duplicate currency code in currencies.json: {}", code);
            }
            descriptors.push(CurrencyDescriptor {
                code,
                name: entry.name,
                symbol: entry.symbol,
                symbol_before_amount: entry.symbol_before_amount,
                flag,
            });
        }

        CurrencyRegistry { descriptors, index }
    }

    /// Looks up a descriptor by ISO code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&CurrencyDescriptor> {
        self.index
            .get(code)
            .or_else(|| self.index.get(&code.to_uppercase()))
            .map(|&i| &self.descriptors[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// All descriptors in catalog order.
    pub fn all(&self) -> &[CurrencyDescriptor] {
        &self.descriptors
    }

    /// All codes in catalog order. This is the rate cache's currency universe.
    pub fn codes(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.code.clone()).collect()
    }
}
