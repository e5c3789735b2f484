//! API Handlers
//!
//! HTTP request handlers for each front-door endpoint.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::cache::RecordCache;
use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::models::{
    mapped_message, HealthResponse, MessageResponse, Outcome, OutcomeResponse, RecordView,
    RecordsQuery, RecordsResponse, StatsResponse, SubmitTimeForm,
};

/// Application state shared across all handlers.
///
/// Contains the record cache behind an Arc; the cache does its own locking.
#[derive(Clone)]
pub struct AppState {
    /// Shared record cache
    pub cache: Arc<RecordCache>,
}

impl AppState {
    /// Creates a new AppState with the given record cache.
    pub fn new(cache: RecordCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Initializes the record cache against the configured legacy service.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(RecordCache::from_config(config)?))
    }
}

/// HTTP status used when answering with an outcome code.
pub fn outcome_status(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::SubmitSuccess | Outcome::UserExists => StatusCode::OK,
        Outcome::InvalidTimeRange => StatusCode::BAD_REQUEST,
        Outcome::InvalidUser => StatusCode::NOT_FOUND,
        Outcome::SubmitError | Outcome::ConnectionError => StatusCode::BAD_GATEWAY,
        Outcome::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn outcome_response(outcome: Outcome, email: String) -> Response {
    (
        outcome_status(outcome),
        Json(OutcomeResponse::new(outcome, Some(email))),
    )
        .into_response()
}

/// Handler for GET /records
///
/// Checks that the user is known upstream, then serves the requested page.
pub async fn records_handler(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Response> {
    // Validate request
    if let Some(error_msg) = query.validate() {
        return Err(TrackerError::InvalidInput(error_msg));
    }

    let outcome = state.cache.check_existing_user(&query.email).await;
    if outcome != Outcome::UserExists {
        return Ok(outcome_response(outcome, query.email));
    }

    let records = state
        .cache
        .get_page(&query.email, query.page, query.fetch_more_pages)
        .await;
    let available_pages = state.cache.available_pages(&query.email).await;

    Ok(Json(RecordsResponse {
        records: records.iter().map(RecordView::from).collect(),
        page: query.page,
        available_pages,
        bulk_fetch_pages: state.cache.bulk_fetch_page_count(),
        email: query.email,
    })
    .into_response())
}

/// Handler for POST /record
///
/// Forwards a new time record to the legacy service.
pub async fn submit_handler(
    State(state): State<AppState>,
    Form(form): Form<SubmitTimeForm>,
) -> Response {
    let outcome = state
        .cache
        .submit_time(&form.email, &form.start_time, &form.end_time)
        .await;
    if outcome.is_success() {
        info!(email = %form.email, %outcome, "time submission handled");
    } else {
        warn!(email = %form.email, %outcome, "time submission not accepted");
    }

    outcome_response(outcome, form.email)
}

/// Handler for GET /messages/:code
///
/// Maps an outcome code to its display message.
pub async fn message_handler(Path(code): Path<String>) -> Json<MessageResponse> {
    let message = mapped_message(&code).to_string();
    Json(MessageResponse { code, message })
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
