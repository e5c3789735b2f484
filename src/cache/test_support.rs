//! In-memory record source for cache tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use reqwest::StatusCode;
use tokio::sync::Notify;

use crate::error::{Result, TrackerError};
use crate::models::{TimeRecord, Timestamp};
use crate::upstream::RecordSource;

/// How the fake upstream should fail, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    None,
    Connection,
    Other,
}

/// Builds a record starting `minutes` after 2023-01-01 00:00, lasting one hour.
pub fn record_at(minutes: i64, email: &str) -> TimeRecord {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let start = Timestamp::from(base + Duration::minutes(minutes));
    let end = Timestamp::from(start.as_naive() + Duration::hours(1));
    TimeRecord::new(
        start.to_legacy_response(),
        end.to_legacy_response(),
        email.to_string(),
    )
}

/// Parks the next fetch at `offset` until released.
#[derive(Debug)]
struct Gate {
    offset: usize,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[derive(Debug)]
pub struct InMemorySource {
    records: Mutex<HashMap<String, Vec<Option<TimeRecord>>>>,
    /// When set, every offset yields a record (an endless history)
    endless: bool,
    failure: Mutex<Failure>,
    submit_status: Mutex<StatusCode>,
    fetches: Mutex<Vec<(String, usize, usize)>>,
    submissions: Mutex<Vec<(String, String, String)>>,
    gate: Mutex<Option<Gate>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            endless: false,
            failure: Mutex::new(Failure::None),
            submit_status: Mutex::new(StatusCode::OK),
            fetches: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    pub fn endless() -> Self {
        Self {
            endless: true,
            ..Self::new()
        }
    }

    pub fn with_records(self, email: &str, records: Vec<Option<TimeRecord>>) -> Self {
        self.records.lock().unwrap().insert(email.to_string(), records);
        self
    }

    pub fn push(&self, email: &str, record: TimeRecord) {
        self.records
            .lock()
            .unwrap()
            .entry(email.to_string())
            .or_default()
            .push(Some(record));
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn set_submit_status(&self, status: StatusCode) {
        *self.submit_status.lock().unwrap() = status;
    }

    /// Holds the next fetch starting at `offset`. Returns a signal fired once
    /// that fetch is parked and a signal that lets it continue.
    pub fn hold_fetch_at(&self, offset: usize) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Gate {
            offset,
            entered: entered.clone(),
            release: release.clone(),
        });
        (entered, release)
    }

    pub fn fetches(&self) -> Vec<(String, usize, usize)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<(String, String, String)> {
        self.submissions.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        match *self.failure.lock().unwrap() {
            Failure::None => Ok(()),
            Failure::Connection => Err(TrackerError::Connection("connection refused".into())),
            Failure::Other => Err(TrackerError::Unknown("boom".into())),
        }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch_records(
        &self,
        email: &str,
        offset: usize,
        length: usize,
    ) -> Result<Vec<TimeRecord>> {
        self.fetches
            .lock()
            .unwrap()
            .push((email.to_string(), offset, length));
        // Let concurrent callers interleave at the I/O boundary.
        tokio::task::yield_now().await;

        let gate = {
            let mut gate = self.gate.lock().unwrap();
            if gate.as_ref().is_some_and(|g| g.offset == offset) {
                gate.take()
            } else {
                None
            }
        };
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.check_failure()?;

        if self.endless {
            return Ok((offset..offset + length)
                .map(|n| record_at(n as i64, email))
                .collect());
        }

        let records = self.records.lock().unwrap();
        let stored = records.get(email).map(Vec::as_slice).unwrap_or(&[]);
        let end = (offset + length).min(stored.len());
        if offset >= end {
            return Ok(Vec::new());
        }
        Ok(stored[offset..end].iter().flatten().cloned().collect())
    }

    async fn submit_record(&self, email: &str, start: &str, end: &str) -> Result<StatusCode> {
        self.submissions
            .lock()
            .unwrap()
            .push((email.to_string(), start.to_string(), end.to_string()));
        self.check_failure()?;
        Ok(*self.submit_status.lock().unwrap())
    }
}
