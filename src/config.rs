//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default upstream location of the legacy time-tracking service.
pub const DEFAULT_LEGACY_BASE_URL: &str = "http://timetracker-legacy:8080";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The configuration is read once at startup and never changes afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of records served per page
    pub records_per_page: usize,
    /// Number of pages fetched ahead in a single bulk request
    pub bulk_fetch_pages: usize,
    /// Minutes after which the whole record cache is dropped
    pub cache_ttl_minutes: u64,
    /// Base URL of the legacy record service
    pub legacy_base_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Timeout in seconds for a single upstream request
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `RECORDS_PER_PAGE` - Records per page (default: 10)
    /// - `BULK_FETCH_PAGES` - Pages per bulk fetch (default: 5)
    /// - `CACHE_TTL_MINUTES` - Global cache lifetime in minutes (default: 5)
    /// - `LEGACY_BASE_URL` - Upstream base URL (default: http://timetracker-legacy:8080)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `UPSTREAM_TIMEOUT` - Upstream request timeout in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            records_per_page: env_or("RECORDS_PER_PAGE", defaults.records_per_page).max(1),
            bulk_fetch_pages: env_or("BULK_FETCH_PAGES", defaults.bulk_fetch_pages),
            cache_ttl_minutes: env_or("CACHE_TTL_MINUTES", defaults.cache_ttl_minutes),
            legacy_base_url: env::var("LEGACY_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.legacy_base_url),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            upstream_timeout: env_or("UPSTREAM_TIMEOUT", defaults.upstream_timeout),
        }
    }

    /// Cache lifetime as a chrono duration, for comparison against the cache clock.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cache_ttl_minutes as i64)
    }

    /// Upstream request timeout.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Number of records requested by a single bulk fetch.
    pub fn bulk_fetch_size(&self) -> usize {
        self.bulk_fetch_pages
            .saturating_mul(self.records_per_page.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records_per_page: 10,
            bulk_fetch_pages: 5,
            cache_ttl_minutes: 5,
            legacy_base_url: DEFAULT_LEGACY_BASE_URL.to_string(),
            server_port: 8080,
            cleanup_interval: 60,
            upstream_timeout: 5,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
