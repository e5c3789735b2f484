//! Legacy Service Client
//!
//! The [`RecordSource`] seam the cache calls, and its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::models::TimeRecord;

/// Source of time records and sink for new submissions.
///
/// The cache only ever talks to the legacy service through this trait, so
/// tests can substitute an in-memory source.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches up to `length` records for `email` starting at `offset`.
    ///
    /// Entries the service returns as `null` are dropped; nothing else is
    /// filtered or reordered.
    async fn fetch_records(&self, email: &str, offset: usize, length: usize)
        -> Result<Vec<TimeRecord>>;

    /// Submits a record with start and end already in the legacy request format.
    ///
    /// Returns the HTTP status the service answered with.
    async fn submit_record(&self, email: &str, start: &str, end: &str) -> Result<StatusCode>;
}

// == HTTP Record Source ==
/// Record source backed by the legacy service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRecordSource {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Unknown(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self) -> String {
        format!("{}/records", self.base_url)
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch_records(
        &self,
        email: &str,
        offset: usize,
        length: usize,
    ) -> Result<Vec<TimeRecord>> {
        debug!(email, offset, length, "querying legacy records");

        let response = self
            .client
            .get(self.records_url())
            .query(&[
                ("email", email.to_string()),
                ("offset", offset.to_string()),
                ("length", length.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TrackerError::UpstreamRejected(response.status().as_u16()));
        }

        let records: Vec<Option<TimeRecord>> = response
            .json()
            .await
            .map_err(|e| TrackerError::Unknown(format!("failed to decode records: {}", e)))?;

        Ok(records.into_iter().flatten().collect())
    }

    async fn submit_record(&self, email: &str, start: &str, end: &str) -> Result<StatusCode> {
        debug!(email, start, end, "submitting legacy record");

        let response = self
            .client
            .post(self.records_url())
            .form(&[("email", email), ("start", start), ("end", end)])
            .send()
            .await?;

        Ok(response.status())
    }
}
