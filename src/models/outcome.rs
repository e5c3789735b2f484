//! Outcome codes returned by the user-check and submission paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorized result of `check_existing_user` and `submit_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    SubmitSuccess,
    SubmitError,
    InvalidTimeRange,
    UserExists,
    InvalidUser,
    UnknownError,
    ConnectionError,
}

impl Outcome {
    pub const ALL: [Outcome; 7] = [
        Outcome::SubmitSuccess,
        Outcome::SubmitError,
        Outcome::InvalidTimeRange,
        Outcome::UserExists,
        Outcome::InvalidUser,
        Outcome::UnknownError,
        Outcome::ConnectionError,
    ];

    /// Wire code, e.g. `SUBMIT_SUCCESS`.
    pub fn code(&self) -> &'static str {
        match self {
            Outcome::SubmitSuccess => "SUBMIT_SUCCESS",
            Outcome::SubmitError => "SUBMIT_ERROR",
            Outcome::InvalidTimeRange => "INVALID_TIME_RANGE",
            Outcome::UserExists => "USER_EXISTS",
            Outcome::InvalidUser => "INVALID_USER",
            Outcome::UnknownError => "UNKNOWN_ERROR",
            Outcome::ConnectionError => "CONNECTION_ERROR",
        }
    }

    /// Human-readable message for display.
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::SubmitSuccess => "Time record submitted successfully",
            Outcome::SubmitError => "Error: Time record could not be submitted",
            Outcome::InvalidTimeRange => {
                "Error: Invalid time range, start time must be before end time"
            }
            Outcome::UserExists => "User exists in the system",
            Outcome::InvalidUser => "Error: User does not exist in the system",
            Outcome::UnknownError => "Error: Unknown error",
            Outcome::ConnectionError => "Error: Could not connect to the external service",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::SubmitSuccess | Outcome::UserExists)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Message for an arbitrary code; unknown codes get the unknown-error message.
pub fn mapped_message(code: &str) -> &'static str {
    Outcome::from_code(code)
        .unwrap_or(Outcome::UnknownError)
        .message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_serde() {
        for outcome in Outcome::ALL {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.code()));
            assert_eq!(Outcome::from_code(outcome.code()), Some(outcome));
        }
    }

    #[test]
    fn test_mapped_message_fallback() {
        assert_eq!(mapped_message("SUBMIT_SUCCESS"), "Time record submitted successfully");
        assert_eq!(mapped_message("NOPE"), "Error: Unknown error");
    }

    #[test]
    fn test_is_success() {
        assert!(Outcome::SubmitSuccess.is_success());
        assert!(Outcome::UserExists.is_success());
        assert!(!Outcome::InvalidUser.is_success());
    }
}
