//! Timestamp formats spoken by the UI and by the legacy service.
//!
//! The UI submits `yyyy-MM-ddTHH:mm`, the legacy service expects
//! `dd.MM.yyyy HH:mm` on submission and answers with
//! `yyyy-MM-ddTHH:mm:ss.SSS+0000`. All conversions go through [`Timestamp`].

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{Result, TrackerError};

/// UI-facing format, also used for normalized display.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format the legacy service accepts on record submission.
pub const LEGACY_REQUEST_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Format the legacy service uses in its record responses.
pub const LEGACY_RESPONSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f+0000";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

// == Timestamp ==
/// A wall-clock instant without zone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parses `value` with the given chrono format string.
    pub fn parse(value: &str, format: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(value.trim(), format)
            .map(Self)
            .map_err(|e| {
                TrackerError::InvalidInput(format!(
                    "timestamp '{}' does not match '{}': {}",
                    value, format, e
                ))
            })
    }

    /// Parses a UI timestamp (`yyyy-MM-ddTHH:mm`).
    pub fn parse_iso(value: &str) -> Result<Self> {
        Self::parse(value, ISO_FORMAT)
    }

    /// Parses a legacy response timestamp (`yyyy-MM-ddTHH:mm:ss.SSS+0000`).
    pub fn parse_legacy_response(value: &str) -> Result<Self> {
        Self::parse(value, LEGACY_RESPONSE_FORMAT)
    }

    pub fn format(&self, format: &str) -> String {
        self.0.format(format).to_string()
    }

    pub fn to_iso(&self) -> String {
        self.format(ISO_FORMAT)
    }

    pub fn to_legacy_request(&self) -> String {
        self.format(LEGACY_REQUEST_FORMAT)
    }

    pub fn to_legacy_response(&self) -> String {
        self.format(LEGACY_RESPONSE_FORMAT)
    }

    /// Date part of the normalized form (`yyyy-MM-dd`).
    pub fn date_part(&self) -> String {
        self.format(DATE_FORMAT)
    }

    /// Time part of the normalized form (`HH:mm`).
    pub fn time_part(&self) -> String {
        self.format(TIME_FORMAT)
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

/// True if `start` is strictly before `end`, both in UI format.
pub fn validate_start_end(start: &str, end: &str) -> Result<bool> {
    Ok(Timestamp::parse_iso(start)? < Timestamp::parse_iso(end)?)
}

/// True if `start` is strictly before `end`, both in legacy response format.
pub fn validate_legacy_start_end(start: &str, end: &str) -> Result<bool> {
    Ok(Timestamp::parse_legacy_response(start)? < Timestamp::parse_legacy_response(end)?)
}
