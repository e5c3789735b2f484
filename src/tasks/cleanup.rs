//! Cache Cleanup Task
//!
//! Background task that periodically drops the record cache once its TTL has
//! elapsed.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::RecordCache;

/// Spawns a background task that periodically calls [`RecordCache::clean_cache`].
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between runs. Whether anything is cleared is decided by the cache's own
/// TTL, not by this interval.
///
/// # Arguments
/// * `cache` - Shared reference to the record cache
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RecordCache::from_config(&config)?);
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<RecordCache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            if cache.clean_cache().await {
                info!("Cache cleanup: record cache cleared");
            } else {
                debug!("Cache cleanup: TTL not yet elapsed");
            }
        }
    })
}
