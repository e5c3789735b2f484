//! Timetracker Cache - A read-through cache for a legacy time-tracking service
//!
//! Serves paginated time records per user from an in-memory cache that is
//! filled on demand from the upstream service and cleared on a global TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use cache::RecordCache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
