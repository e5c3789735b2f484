//! Time Record Model
//!
//! A single booking as returned by the legacy service.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::models::timestamp::{validate_legacy_start_end, Timestamp};

// == Time Record ==
/// One tracked time span owned by a user.
///
/// Fields are kept in the legacy response format and may be missing; validity
/// and the normalized form are derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecord {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl TimeRecord {
    // == Constructor ==
    pub fn new(
        start: impl Into<Option<String>>,
        end: impl Into<Option<String>>,
        email: impl Into<Option<String>>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            email: email.into(),
        }
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns true if start, end or email is missing.
    pub fn any_field_missing(&self) -> bool {
        self.start.is_none() || self.end.is_none() || self.email.is_none()
    }

    // == Validity ==
    /// A record is valid when all fields are present and start is strictly
    /// before end. Unparseable timestamps make the record invalid.
    pub fn is_valid(&self) -> bool {
        match (&self.start, &self.end, &self.email) {
            (Some(start), Some(end), Some(_)) => {
                validate_legacy_start_end(start, end).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Parsed start instant. This is the only sort key for records.
    pub fn start_timestamp(&self) -> Result<Timestamp> {
        parse_field("start", self.start.as_deref())
    }

    pub fn end_timestamp(&self) -> Result<Timestamp> {
        parse_field("end", self.end.as_deref())
    }

    /// Start in normalized `yyyy-MM-ddTHH:mm` form.
    pub fn formatted_start(&self) -> Result<String> {
        self.start_timestamp().map(|ts| ts.to_iso())
    }

    /// End in normalized `yyyy-MM-ddTHH:mm` form.
    pub fn formatted_end(&self) -> Result<String> {
        self.end_timestamp().map(|ts| ts.to_iso())
    }
}

fn parse_field(name: &str, value: Option<&str>) -> Result<Timestamp> {
    let value = value.ok_or_else(|| TrackerError::InvalidInput(format!("record has no {}", name)))?;
    Timestamp::parse_legacy_response(value)
}

/// Stable-sorts records ascending by parsed start instant.
///
/// Fails without touching `records` if any start cannot be parsed.
pub fn sort_by_start(records: Vec<TimeRecord>) -> Result<Vec<TimeRecord>> {
    let mut keyed = records
        .into_iter()
        .map(|record| record.start_timestamp().map(|ts| (ts, record)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(ts, _)| *ts);
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}
