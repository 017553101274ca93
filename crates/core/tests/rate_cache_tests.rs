//! Rate cache lifecycle: snapshot loading, refresh, failure and shutdown.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use currva_core::fx::FxError;
use currva_core::{RateCache, RateCacheConfig, RateLookup, RateTable};
use currva_market_data::{AnchorQuotes, ManualQuoteProvider, MarketDataError, QuoteProvider};

fn config(path: &Path) -> RateCacheConfig {
    RateCacheConfig {
        snapshot_path: path.to_path_buf(),
        ttl: Duration::from_secs(7200),
        poll_interval: Duration::from_millis(20),
        request_timeout: Duration::from_millis(200),
    }
}

fn provider() -> Arc<ManualQuoteProvider> {
    Arc::new(ManualQuoteProvider::from_pairs([
        ("EUR", dec!(0.5)),
        ("ILS", dec!(4)),
    ]))
}

fn write_snapshot(path: &Path, age: ChronoDuration) {
    let json = format!(
        r#"{{"rates": {{"USD": {{"EUR": 0.9}}, "EUR": {{"USD": 1.1}}}}, "last_update": "{}"}}"#,
        (Utc::now() - age).to_rfc3339()
    );
    std::fs::write(path, json).unwrap();
}

struct SlowProvider;

#[async_trait]
impl QuoteProvider for SlowProvider {
    fn id(&self) -> &'static str {
        "SLOW"
    }

    async fn fetch_quotes(&self, _currencies: &[String]) -> Result<AnchorQuotes, MarketDataError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Err(MarketDataError::ProviderError {
            provider: "SLOW".to_string(),
            message: "unreachable".to_string(),
        })
    }
}

/// Serves a different EUR quote on each call; the first call is the slowest.
struct SequencedProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl QuoteProvider for SequencedProvider {
    fn id(&self) -> &'static str {
        "SEQUENCED"
    }

    async fn fetch_quotes(&self, _currencies: &[String]) -> Result<AnchorQuotes, MarketDataError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, eur) = if call == 0 {
            (Duration::from_millis(100), dec!(0.5))
        } else {
            (Duration::ZERO, dec!(0.8))
        };
        tokio::time::sleep(delay).await;
        Ok(AnchorQuotes::new("USD", Utc::now(), "SEQUENCED".to_string()).with_quote("EUR", eur))
    }
}

#[tokio::test]
async fn test_initialize_without_snapshot_refreshes_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("rates.json");
    let provider = provider();
    let cache = RateCache::new(provider.clone(), config(&path));

    cache.initialize().await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(cache.get_rate("USD", "EUR"), Some(dec!(0.5)));
    assert_eq!(cache.get_rate("EUR", "ILS"), Some(dec!(8)));
    assert!(cache.last_update().is_some());
    assert_eq!(
        cache.available_currencies(),
        vec!["EUR".to_string(), "ILS".to_string(), "USD".to_string()]
    );

    let persisted: RateTable =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(persisted.get_rate("ILS", "USD"), Some(dec!(0.25)));
    assert_eq!(persisted.last_update, cache.last_update());
}

#[tokio::test]
async fn test_fresh_snapshot_is_used_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.json");
    write_snapshot(&path, ChronoDuration::minutes(30));
    let provider = provider();
    let cache = RateCache::new(provider.clone(), config(&path));

    cache.initialize().await;

    assert_eq!(provider.calls(), 0);
    assert_eq!(cache.get_rate("USD", "EUR"), Some(dec!(0.9)));
}

#[tokio::test]
async fn test_stale_snapshot_triggers_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.json");
    write_snapshot(&path, ChronoDuration::hours(3));
    let provider = provider();
    let cache = RateCache::new(provider.clone(), config(&path));

    cache.initialize().await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(cache.get_rate("USD", "EUR"), Some(dec!(0.5)));
    assert!(!cache.is_stale(Utc::now()));
}

#[tokio::test]
async fn test_failed_startup_refresh_keeps_stale_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.json");
    write_snapshot(&path, ChronoDuration::hours(3));
    let provider = provider();
    provider.fail_with("offline");
    let cache = RateCache::new(provider.clone(), config(&path));

    cache.initialize().await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(cache.get_rate("USD", "EUR"), Some(dec!(0.9)));
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty_and_refreshes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.json");
    std::fs::write(&path, "not json").unwrap();
    let provider = provider();
    let cache = RateCache::new(provider.clone(), config(&path));

    cache.initialize().await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(cache.get_rate("USD", "ILS"), Some(dec!(4)));
}

#[tokio::test]
async fn test_failed_refresh_leaves_table_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.json");
    let provider = provider();
    let cache = RateCache::new(provider.clone(), config(&path));
    cache.initialize().await;
    let before = cache.snapshot();

    provider.fail_with("HTTP 500");
    let err = cache.refresh().await.unwrap_err();

    assert!(matches!(err, FxError::Fetch(MarketDataError::ProviderError { .. })));
    assert!(Arc::ptr_eq(&before, &cache.snapshot()));
}

#[tokio::test]
async fn test_refresh_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let cache = RateCache::new(Arc::new(SlowProvider), config(&dir.path().join("rates.json")));

    let err = cache.refresh().await.unwrap_err();

    assert!(matches!(err, FxError::FetchTimeout(_)));
    assert!(err.is_transient());
    assert!(cache.snapshot().is_empty());
}

#[tokio::test]
async fn test_refresher_polls_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider();
    let mut config = config(&dir.path().join("rates.json"));
    config.ttl = Duration::ZERO;
    let cache = Arc::new(RateCache::new(provider.clone(), config));

    let refresher = cache.start();
    assert!(refresher.is_running());
    tokio::time::sleep(Duration::from_millis(150)).await;
    refresher.stop().await;

    let calls = provider.calls();
    assert!(calls >= 1, "expected at least one refresh, got {calls}");
    assert_eq!(cache.get_rate("USD", "EUR"), Some(dec!(0.5)));

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(provider.calls(), calls);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_readers_never_see_mixed_tables() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider();
    let cache = Arc::new(RateCache::new(provider.clone(), config(&dir.path().join("rates.json"))));
    cache.initialize().await;

    let reader = {
        let cache = Arc::clone(&cache);
        std::thread::spawn(move || {
            for _ in 0..2_000 {
                let table = cache.snapshot();
                let pair = (table.get_rate("USD", "EUR"), table.get_rate("USD", "ILS"));
                assert!(
                    pair == (Some(dec!(0.5)), Some(dec!(4)))
                        || pair == (Some(dec!(0.25)), Some(dec!(8))),
                    "mixed table: {pair:?}"
                );
            }
        })
    };

    for round in 0..20 {
        let (eur, ils): (Decimal, Decimal) = if round % 2 == 0 {
            (dec!(0.25), dec!(8))
        } else {
            (dec!(0.5), dec!(4))
        };
        provider.set_quotes(
            AnchorQuotes::new("USD", Utc::now(), "MANUAL".to_string())
                .with_quote("EUR", eur)
                .with_quote("ILS", ils),
        );
        cache.refresh().await.unwrap();
    }

    reader.join().unwrap();
}

#[tokio::test]
async fn test_overlapping_refreshes_persist_the_latest_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.json");
    let cache = RateCache::new(
        Arc::new(SequencedProvider {
            calls: AtomicUsize::new(0),
        }),
        config(&path),
    );

    let (first, second) = tokio::join!(cache.refresh(), cache.refresh());
    first.unwrap();
    second.unwrap();

    assert_eq!(cache.get_rate("USD", "EUR"), Some(dec!(0.8)));
    let persisted: RateTable =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(persisted.get_rate("USD", "EUR"), Some(dec!(0.8)));
    assert_eq!(persisted.last_update, cache.last_update());
}
