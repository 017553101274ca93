use std::time::Duration;

/// Age after which the rate table is refreshed
pub const DEFAULT_RATES_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// How often the background refresher checks the table age
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Upper bound for one quote fetch
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the rate table is persisted between runs
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/exchange_rates_cache.json";

/// Currency used to judge whether an amount is plausible
pub const ESTIMATE_CURRENCY: &str = "USD";

/// USD value at or above which an amount is treated as a joke
pub const DEFAULT_IMPLAUSIBLE_CEILING: i64 = 1_000_000;

/// Mentions rendered per message before the rest is cut off
pub const DEFAULT_MAX_MENTIONS: usize = 10;

/// Targets used when a chat has not chosen its own
pub const DEFAULT_TARGET_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "RUB", "ILS", "JPY", "AMD"];

/// Kilograms in one avoirdupois pound
pub const KG_PER_POUND: &str = "0.45359237";
