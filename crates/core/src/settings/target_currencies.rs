use serde::Serialize;

use crate::constants::DEFAULT_TARGET_CURRENCIES;
use crate::currencies::registry;

/// Ordered, duplicate-free list of registered currency codes a user or chat
/// wants amounts converted into.
///
/// Where the list comes from is the caller's business; this type only
/// checks it against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetCurrencies(Vec<String>);

impl Default for TargetCurrencies {
    fn default() -> Self {
        Self(
            DEFAULT_TARGET_CURRENCIES
                .iter()
                .map(|code| code.to_string())
                .collect(),
        )
    }
}

impl TargetCurrencies {
    /// Validates `codes` against the registry and keeps the known ones in
    /// order. Falls back to `fallback` when nothing usable is left.
    pub fn resolve<S: AsRef<str>>(codes: Option<&[S]>, fallback: &TargetCurrencies) -> Self {
        let Some(codes) = codes else {
            return fallback.clone();
        };

        let mut resolved: Vec<String> = Vec::with_capacity(codes.len());
        for code in codes {
            let code = code.as_ref().trim().to_uppercase();
            if code.is_empty() {
                continue;
            }
            if !registry().contains(&code) {
                log::warn!("Ignoring unknown target currency '{}'", code);
                continue;
            }
            if !resolved.contains(&code) {
                resolved.push(code);
            }
        }

        if resolved.is_empty() {
            fallback.clone()
        } else {
            Self(resolved)
        }
    }

    /// Parses a comma-separated list such as `"USD, EUR,ils"`.
    pub fn parse_list(list: &str, fallback: &TargetCurrencies) -> Self {
        let codes: Vec<&str> = list.split(',').collect();
        Self::resolve(Some(codes.as_slice()), fallback)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &TargetCurrencies) -> Vec<&str> {
        list.as_slice().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_default_list() {
        assert_eq!(
            codes(&TargetCurrencies::default()),
            vec!["USD", "EUR", "GBP", "RUB", "ILS", "JPY", "AMD"]
        );
    }

    #[test]
    fn test_missing_or_empty_falls_back() {
        let fallback = TargetCurrencies::default();
        assert_eq!(TargetCurrencies::resolve::<String>(None, &fallback), fallback);
        assert_eq!(TargetCurrencies::resolve::<&str>(Some(&[][..]), &fallback), fallback);
        assert_eq!(TargetCurrencies::resolve(Some(&["XXX", " "][..]), &fallback), fallback);
    }

    #[test]
    fn test_unknown_codes_dropped_and_case_folded() {
        let resolved =
            TargetCurrencies::resolve(Some(&["eur", "XXX", "ILS", "EUR"][..]), &TargetCurrencies::default());
        assert_eq!(codes(&resolved), vec!["EUR", "ILS"]);
        assert!(resolved.contains("ILS"));
        assert!(!resolved.contains("USD"));
    }

    #[test]
    fn test_parse_list() {
        let resolved = TargetCurrencies::parse_list("USD, gel ,,KZT", &TargetCurrencies::default());
        assert_eq!(codes(&resolved), vec!["USD", "GEL", "KZT"]);
    }
}
