use serde::Serialize;

/// Display metadata for one supported currency.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyDescriptor {
    /// ISO 4217 code, unique key of the registry
    pub code: String,
    pub name: String,
    pub symbol: String,
    /// `$100` when true, `100 ₽` when false
    pub symbol_before_amount: bool,
    /// Flag emoji derived from the issuing country code
    pub flag: String,
}

/// Builds a flag emoji from a two-letter country code.
///
/// Each ASCII letter maps to its Unicode regional indicator symbol, so
/// `"IL"` becomes 🇮🇱 and `"EU"` becomes 🇪🇺. Returns `None` for anything
/// that is not exactly two ASCII letters.
pub fn flag_for_country(country: &str) -> Option<String> {
    const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

    if country.len() != 2 {
        return None;
    }
    country
        .chars()
        .map(|c| {
            let upper = c.to_ascii_uppercase();
            if !upper.is_ascii_uppercase() {
                return None;
            }
            char::from_u32(REGIONAL_INDICATOR_A + (upper as u32 - 'A' as u32))
        })
        .collect()
}
