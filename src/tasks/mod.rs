//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache cleanup: Drops the record cache once its TTL has elapsed

mod cleanup;

pub use cleanup::spawn_cleanup_task;
