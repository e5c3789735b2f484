//! Record Cache Module
//!
//! Read-through pagination cache in front of the legacy record service.
//!
//! Each identity's records are fetched lazily and appended to its cached
//! sequence; pages are served from that sequence and only the missing tail is
//! ever requested upstream. The whole cache is dropped once the configured TTL
//! has passed since the last clear.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{CacheCounters, CacheStats, Clock, RecordStore, SystemClock};
use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::models::{sort_by_start, validate_start_end, Outcome, TimeRecord, Timestamp};
use crate::upstream::{HttpRecordSource, RecordSource};

/// Fetch-and-merge attempts before a read gives up on a cache that keeps
/// being cleared underneath it.
const MERGE_ATTEMPTS: usize = 3;

// == Record Cache ==
/// Fetch/merge/page orchestration over a shared [`RecordStore`].
///
/// The store lock is never held across an upstream call. Fetch-and-merge is
/// serialized per identity by a fetch lock, so identities never wait on each
/// other and every merge is a cursor-checked append under the write lock.
pub struct RecordCache {
    store: RwLock<RecordStore>,
    /// One lock per identity, held across its upstream fetch and merge
    fetch_locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
    source: Arc<dyn RecordSource>,
    clock: Arc<dyn Clock>,
    counters: CacheCounters,
    records_per_page: usize,
    bulk_fetch_pages: usize,
    bulk_fetch_size: usize,
    ttl: Duration,
}

impl RecordCache {
    // == Constructor ==
    /// Creates a cache over `source`, timed by `clock`.
    pub fn new(config: &Config, source: Arc<dyn RecordSource>, clock: Arc<dyn Clock>) -> Self {
        let store = RecordStore::new(clock.now());
        Self {
            store: RwLock::new(store),
            fetch_locks: std::sync::Mutex::new(HashMap::new()),
            source,
            clock,
            counters: CacheCounters::new(),
            records_per_page: config.records_per_page.max(1),
            bulk_fetch_pages: config.bulk_fetch_pages,
            bulk_fetch_size: config.bulk_fetch_size(),
            ttl: config.cache_ttl(),
        }
    }

    /// Creates a cache talking HTTP to the configured legacy service.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = HttpRecordSource::new(&config.legacy_base_url, config.upstream_timeout())?;
        Ok(Self::new(config, Arc::new(source), Arc::new(SystemClock)))
    }

    /// Number of pages fetched ahead by a bulk fetch.
    pub fn bulk_fetch_page_count(&self) -> usize {
        self.bulk_fetch_pages
    }

    // == Get Page ==
    /// Returns the records of 1-based `page` for `email`.
    ///
    /// Incomplete records are kept. Page 0 yields an empty result.
    pub async fn get_page(&self, email: &str, page: usize, bulk_fetch: bool) -> Vec<TimeRecord> {
        let Some(index) = page.checked_sub(1) else {
            warn!(email, "page numbers start at 1, got 0");
            return Vec::new();
        };
        let Some(offset) = index.checked_mul(self.records_per_page) else {
            warn!(email, page, "page number out of range");
            return Vec::new();
        };
        self.retrieve(email, offset, self.records_per_page, true, bulk_fetch)
            .await
    }

    // == Retrieve ==
    /// Serves the window `[offset, offset + length)` of `email`'s records,
    /// sorted by start time.
    ///
    /// With `consider_null_field` unset, invalid records are dropped from the
    /// window. Any failure along the way degrades to an empty result.
    pub async fn retrieve(
        &self,
        email: &str,
        offset: usize,
        length: usize,
        consider_null_field: bool,
        bulk_fetch: bool,
    ) -> Vec<TimeRecord> {
        match self
            .try_retrieve(email, offset, length, consider_null_field, bulk_fetch)
            .await
        {
            Ok(records) => records,
            Err(err) => {
                self.counters.record_degraded();
                warn!(email, offset, length, error = %err, "retrieve failed, serving no records");
                Vec::new()
            }
        }
    }

    async fn try_retrieve(
        &self,
        email: &str,
        offset: usize,
        length: usize,
        consider_null_field: bool,
        bulk_fetch: bool,
    ) -> Result<Vec<TimeRecord>> {
        let end = offset.checked_add(length).ok_or_else(|| {
            TrackerError::InvalidInput(format!("window {}+{} is out of range", offset, length))
        })?;

        let window = {
            let fetch_lock = self.fetch_lock(email);
            let _guard = fetch_lock.lock().await;

            if bulk_fetch {
                self.bulk_prefetch(email).await?;
            }
            self.fill_window(email, offset, end, bulk_fetch).await?
        };

        let window = if consider_null_field {
            window
        } else {
            window.into_iter().filter(TimeRecord::is_valid).collect()
        };

        sort_by_start(window)
    }

    /// Caches `[offset, end)` as far as upstream has records and returns that
    /// window. The caller holds the identity's fetch lock.
    async fn fill_window(
        &self,
        email: &str,
        offset: usize,
        end: usize,
        bulk_fetch: bool,
    ) -> Result<Vec<TimeRecord>> {
        for _ in 0..MERGE_ATTEMPTS {
            let cached = {
                let store = self.store.read().await;
                match store.cached_len(email) {
                    Some(cached) if cached >= end => {
                        if !bulk_fetch {
                            self.counters.record_hit();
                        }
                        return Ok(store.slice(email, offset, end));
                    }
                    cached => cached,
                }
            };

            match cached {
                Some(cached) => {
                    let tail = self.query_records(email, cached, end - cached).await?;
                    let mut store = self.store.write().await;
                    if store.append(email, cached, tail).is_some() {
                        return Ok(store.slice(email, offset, end));
                    }
                }
                None => {
                    let fetched = self.query_records(email, 0, end).await?;
                    // Same window the slice above would serve, so a short first
                    // fetch and a later cached read agree.
                    let window = fetched.get(offset..).unwrap_or_default().to_vec();
                    if self.store.write().await.append(email, 0, fetched).is_some() {
                        return Ok(window);
                    }
                }
            }
            debug!(email, "cache cleared during upstream fetch, fetching again");
        }

        Err(TrackerError::Unknown(format!(
            "cache for {} kept changing during upstream fetch",
            email
        )))
    }

    /// Fetches `bulk_fetch_pages` pages from the end of the cached sequence.
    ///
    /// A batch that no longer lines up with the cache is dropped.
    async fn bulk_prefetch(&self, email: &str) -> Result<()> {
        let cursor = self.store.read().await.cached_len(email).unwrap_or(0);
        let batch = self
            .query_records(email, cursor, self.bulk_fetch_size)
            .await?;
        let fetched = batch.len();
        match self.store.write().await.append(email, cursor, batch) {
            Some(total) => debug!(email, cursor, fetched, total, "bulk prefetch appended"),
            None => debug!(email, cursor, fetched, "cache cleared during bulk prefetch"),
        }
        Ok(())
    }

    /// Returns the fetch lock of `email`, creating it on first use.
    fn fetch_lock(&self, email: &str) -> Arc<Mutex<()>> {
        let mut locks = self.fetch_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(email.to_string()).or_default().clone()
    }

    // == Query Records ==
    /// One upstream query; null entries are already dropped by the source.
    async fn query_records(
        &self,
        email: &str,
        offset: usize,
        length: usize,
    ) -> Result<Vec<TimeRecord>> {
        self.counters.record_fetch();
        let records = self.source.fetch_records(email, offset, length).await?;
        debug!(email, offset, length, received = records.len(), "upstream query");
        Ok(records)
    }

    // == Available Pages ==
    /// Pages that can be served from cache without another upstream call.
    pub async fn available_pages(&self, email: &str) -> usize {
        self.store
            .read()
            .await
            .available_pages(email, self.records_per_page)
    }

    /// Number of records cached for `email`, None if it has no entry.
    pub async fn cached_len(&self, email: &str) -> Option<usize> {
        self.store.read().await.cached_len(email)
    }

    // == Check Existing User ==
    /// Asks upstream for a single record to find out whether `email` is known.
    pub async fn check_existing_user(&self, email: &str) -> Outcome {
        match self.query_records(email, 0, 1).await {
            Ok(records) if records.is_empty() => Outcome::InvalidUser,
            Ok(_) => Outcome::UserExists,
            Err(err) if err.is_connection() => {
                warn!(email, error = %err, "user check could not reach upstream");
                Outcome::ConnectionError
            }
            Err(err) => {
                warn!(email, error = %err, "user check failed");
                Outcome::UnknownError
            }
        }
    }

    // == Submit Time ==
    /// Validates and forwards a new record. `start` and `end` use the UI
    /// format `yyyy-MM-ddTHH:mm`.
    ///
    /// The cache is left untouched; the new record shows up once a later
    /// query reaches it or after the next clear.
    pub async fn submit_time(&self, email: &str, start: &str, end: &str) -> Outcome {
        match validate_start_end(start, end) {
            Ok(true) => {}
            Ok(false) => return Outcome::InvalidTimeRange,
            Err(err) => {
                warn!(email, error = %err, "rejecting submission with malformed timestamps");
                return Outcome::SubmitError;
            }
        }
        let (Ok(start), Ok(end)) = (Timestamp::parse_iso(start), Timestamp::parse_iso(end)) else {
            return Outcome::SubmitError;
        };

        let result = self
            .source
            .submit_record(email, &start.to_legacy_request(), &end.to_legacy_request())
            .await;

        match result {
            Ok(StatusCode::OK) => {
                info!(email, %start, %end, "time record submitted");
                Outcome::SubmitSuccess
            }
            Ok(status) => {
                warn!(email, %status, "upstream refused time record");
                Outcome::SubmitError
            }
            Err(err) if err.is_connection() => {
                warn!(email, error = %err, "submission could not reach upstream");
                Outcome::ConnectionError
            }
            Err(err) => {
                warn!(email, error = %err, "submission failed");
                Outcome::SubmitError
            }
        }
    }

    // == Clean Cache ==
    /// Drops the entire cache if the TTL has elapsed since the last clear.
    ///
    /// Returns true if the cache was cleared.
    pub async fn clean_cache(&self) -> bool {
        let now = self.clock.now();
        let removed = self.store.write().await.clear_if_expired(now, self.ttl);

        match removed {
            Some(identities) => {
                self.counters.record_cleanup();
                // Locks still held by in-flight reads survive the clear
                self.fetch_locks
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .retain(|_, lock| Arc::strong_count(lock) > 1);
                info!(identities, "cache cleaned");
                true
            }
            None => false,
        }
    }

    pub async fn last_clean_at(&self) -> DateTime<Utc> {
        self.store.read().await.last_clean_at()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        self.counters
            .snapshot(store.len(), store.total_records(), store.last_clean_at())
    }
}
