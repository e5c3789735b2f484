//! API Module
//!
//! HTTP handlers and routing for the front door of the record cache.
//!
//! # Endpoints
//! - `GET /records` - Page through a user's time records
//! - `POST /record` - Submit a new time record
//! - `GET /messages/:code` - Display message for an outcome code
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
