//! Self-refreshing exchange-rate cache.
//!
//! One [`RateCache`] is shared by every message handler. Readers take an
//! `Arc<RateTable>` snapshot; a refresh builds a whole new table and swaps
//! the pointer, so a reader never sees a half-updated table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use super::fx_errors::FxError;
use super::fx_model::RateTable;
use super::fx_traits::RateLookup;
use crate::constants::{
    DEFAULT_POLL_INTERVAL, DEFAULT_RATES_TTL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SNAPSHOT_PATH,
};
use crate::currencies::registry;
use currva_market_data::QuoteProvider;

#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    pub snapshot_path: PathBuf,
    pub ttl: Duration,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            ttl: DEFAULT_RATES_TTL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub struct RateCache {
    provider: Arc<dyn QuoteProvider>,
    config: RateCacheConfig,
    universe: Vec<String>,
    table: Mutex<Arc<RateTable>>,
    /// Held for a whole refresh so swaps and snapshot writes stay in order.
    refresh_lock: AsyncMutex<()>,
}

impl RateCache {
    /// Creates an empty cache covering every registered currency.
    pub fn new(provider: Arc<dyn QuoteProvider>, config: RateCacheConfig) -> Self {
        Self {
            provider,
            config,
            universe: registry().codes(),
            table: Mutex::new(Arc::new(RateTable::default())),
            refresh_lock: AsyncMutex::new(()),
        }
    }

    pub fn config(&self) -> &RateCacheConfig {
        &self.config
    }

    /// The current table. Cheap: clones a pointer under the lock.
    pub fn snapshot(&self) -> Arc<RateTable> {
        let guard = self.table.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.snapshot().last_update
    }

    /// Currencies that currently have at least one known rate.
    pub fn available_currencies(&self) -> Vec<String> {
        self.snapshot().currencies()
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.snapshot().is_stale(self.config.ttl, now)
    }

    /// Loads the persisted snapshot and refreshes when it is missing or
    /// older than the TTL.
    ///
    /// Never fails: an unreadable snapshot or a failed refresh is logged and
    /// the cache starts with whatever table it has.
    pub async fn initialize(&self) {
        match self.load_snapshot() {
            Ok(Some(table)) => {
                log::info!(
                    "Loaded rate snapshot from {} ({} base currencies, updated {:?})",
                    self.config.snapshot_path.display(),
                    table.rates.len(),
                    table.last_update
                );
                self.swap(table);
            }
            Ok(None) => {
                log::info!(
                    "No rate snapshot at {}",
                    self.config.snapshot_path.display()
                );
            }
            Err(e) => log::warn!("Ignoring rate snapshot: {}", e),
        }

        if self.is_stale(Utc::now()) {
            self.refresh_logged().await;
        }
    }

    /// Fetches fresh quotes and replaces the table.
    ///
    /// On error the current table is left untouched. Concurrent calls run
    /// one after another.
    pub async fn refresh(&self) -> Result<(), FxError> {
        let _refreshing = self.refresh_lock.lock().await;
        let quotes = tokio::time::timeout(
            self.config.request_timeout,
            self.provider.fetch_quotes(&self.universe),
        )
        .await
        .map_err(|_| FxError::FetchTimeout(self.config.request_timeout))??;

        if quotes.anchor != self.provider.anchor() {
            return Err(FxError::AnchorMismatch {
                provider: self.provider.id().to_string(),
                expected: self.provider.anchor().to_string(),
                found: quotes.anchor,
            });
        }

        let table = RateTable::from_quotes(&quotes, &self.universe, Utc::now());
        if table.is_empty() {
            return Err(FxError::CacheError(format!(
                "quotes from {} produced no rates",
                quotes.source
            )));
        }

        log::info!(
            "Refreshed exchange rates from {}: {} base currencies",
            quotes.source,
            table.rates.len()
        );
        let table = Arc::new(table);
        self.swap_arc(Arc::clone(&table));

        if let Err(e) = self.persist(&table) {
            log::error!("Failed to persist rate snapshot: {}", e);
        }
        Ok(())
    }

    /// Refreshes and logs the outcome instead of returning it.
    pub async fn refresh_logged(&self) -> bool {
        match self.refresh().await {
            Ok(()) => true,
            Err(e) if e.is_transient() => {
                log::warn!("Exchange rate refresh failed, keeping current table: {}", e);
                false
            }
            Err(e) => {
                log::error!("Exchange rate refresh failed, keeping current table: {}", e);
                false
            }
        }
    }

    /// Spawns the background refresher.
    ///
    /// Every poll interval the table age is checked against the TTL and a
    /// refresh is attempted when it has expired.
    pub fn start(self: &Arc<Self>) -> RateRefresher {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let cache = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cache.config.poll_interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if cache.is_stale(Utc::now()) {
                            log::debug!("Rate table expired, refreshing");
                            cache.refresh_logged().await;
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            log::info!("Rate refresher stopped");
        });

        RateRefresher { stop_tx, handle }
    }

    fn swap(&self, table: RateTable) {
        self.swap_arc(Arc::new(table));
    }

    fn swap_arc(&self, table: Arc<RateTable>) {
        let mut guard = self.table.lock().unwrap_or_else(|e| e.into_inner());
        *guard = table;
    }

    fn load_snapshot(&self) -> Result<Option<RateTable>, FxError> {
        let path = &self.config.snapshot_path;
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(FxError::SnapshotIo {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn persist(&self, table: &RateTable) -> Result<(), FxError> {
        write_atomically(&self.config.snapshot_path, &serde_json::to_vec_pretty(table)?)
    }
}

impl RateLookup for RateCache {
    fn get_rate(&self, base: &str, target: &str) -> Option<Decimal> {
        self.snapshot().get_rate(base, target)
    }
}

/// Writes `bytes` to a sibling temp file and renames it over `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FxError> {
    let io_err = |source| FxError::SnapshotIo {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

/// Handle to the background refresh task.
pub struct RateRefresher {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RateRefresher {
    /// Signals the task and waits for it to finish.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.handle.await {
            log::error!("Rate refresher task failed: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}
