use rust_decimal::Decimal;

use super::fx_model::RateTable;

/// Read access to exchange rates.
///
/// `None` means the pair is unknown right now. Callers handle
/// `base == target` themselves; implementations never store identity pairs.
pub trait RateLookup: Send + Sync {
    fn get_rate(&self, base: &str, target: &str) -> Option<Decimal>;
}

impl RateLookup for RateTable {
    fn get_rate(&self, base: &str, target: &str) -> Option<Decimal> {
        RateTable::get_rate(self, base, target)
    }
}
