//! Upstream Module
//!
//! Access to the legacy time-tracking service.
//!
//! # Endpoints used
//! - `GET /records?email=&offset=&length=` - Page through a user's records
//! - `POST /records` - Submit a new record (form encoded)

mod client;

pub use client::{HttpRecordSource, RecordSource};
