//! Domain values and API DTOs
//!
//! Time records and their timestamp formats, outcome codes, and the
//! request/response bodies of the front-door API.

pub mod outcome;
pub mod record;
pub mod requests;
pub mod responses;
pub mod timestamp;

// Re-export commonly used types
pub use outcome::{mapped_message, Outcome};
pub use record::{sort_by_start, TimeRecord};
pub use requests::{RecordsQuery, SubmitTimeForm};
pub use responses::{
    HealthResponse, MessageResponse, OutcomeResponse, RecordView, RecordsResponse, StatsResponse,
};
pub use timestamp::{validate_start_end, Timestamp};
