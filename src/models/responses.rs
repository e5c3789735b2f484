//! Response DTOs for the front-door API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{Outcome, TimeRecord};

/// A record prepared for display.
///
/// Timestamps are normalized to `yyyy-MM-ddTHH:mm` and split into date and
/// time parts. Missing or unparseable fields are left empty.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub email: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
    pub valid: bool,
}

impl From<&TimeRecord> for RecordView {
    fn from(record: &TimeRecord) -> Self {
        let start = record.start_timestamp().ok();
        let end = record.end_timestamp().ok();
        Self {
            email: record.email().map(str::to_string),
            start: start.map(|ts| ts.to_iso()),
            end: end.map(|ts| ts.to_iso()),
            start_date: start.map(|ts| ts.date_part()),
            start_time: start.map(|ts| ts.time_part()),
            end_date: end.map(|ts| ts.date_part()),
            end_time: end.map(|ts| ts.time_part()),
            valid: record.is_valid(),
        }
    }
}

/// Response body for `GET /records`
#[derive(Debug, Clone, Serialize)]
pub struct RecordsResponse {
    pub email: String,
    pub page: usize,
    pub records: Vec<RecordView>,
    pub available_pages: usize,
    pub bulk_fetch_pages: usize,
}

/// Response body carrying an outcome code and its message.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeResponse {
    pub outcome: Outcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl OutcomeResponse {
    pub fn new(outcome: Outcome, email: Option<String>) -> Self {
        Self {
            outcome,
            message: outcome.message().to_string(),
            email,
        }
    }
}

/// Response body for `GET /messages/:code`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub code: String,
    pub message: String,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Identities currently holding a cache entry
    pub identities: usize,
    /// Records cached across all identities
    pub cached_records: usize,
    /// Upstream record queries issued
    pub upstream_fetches: u64,
    /// Windows served without any upstream query
    pub cache_hits: u64,
    /// Retrievals that degraded to an empty result
    pub degraded_reads: u64,
    /// Number of full cache clears
    pub cleanups: u64,
    /// Last time the cache was cleared, RFC 3339
    pub last_clean_at: String,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            identities: stats.identities,
            cached_records: stats.cached_records,
            upstream_fetches: stats.upstream_fetches,
            cache_hits: stats.cache_hits,
            degraded_reads: stats.degraded_reads,
            cleanups: stats.cleanups,
            last_clean_at: stats.last_clean_at.to_rfc3339(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
