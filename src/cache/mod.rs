//! Cache Module
//!
//! Provides the per-identity record cache with global time-based expiry.

mod clock;
mod record_cache;
mod stats;
mod store;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use record_cache::RecordCache;
pub use stats::{CacheCounters, CacheStats};
pub use store::{is_expired, RecordStore};
