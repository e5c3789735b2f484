//! Request DTOs for the front-door API
//!
//! Defines the structure of incoming query strings and form bodies.

use serde::Deserialize;

fn default_page() -> usize {
    1
}

/// Query string for `GET /records`
///
/// # Fields
/// - `email`: The user whose records are listed
/// - `page`: 1-based page number (default 1)
/// - `fetchMorePages`: Whether to bulk-prefetch further pages
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsQuery {
    pub email: String,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default, rename = "fetchMorePages")]
    pub fetch_more_pages: bool,
}

impl RecordsQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.email.trim().is_empty() {
            return Some("Email cannot be empty".to_string());
        }
        if self.page == 0 {
            return Some("Page numbers start at 1".to_string());
        }
        None
    }
}

/// Form body for `POST /record`
///
/// Start and end arrive in the UI format `yyyy-MM-ddTHH:mm`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTimeForm {
    pub email: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_query_defaults() {
        let json = r#"{"email": "a@x.com"}"#;
        let query: RecordsQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.page, 1);
        assert!(!query.fetch_more_pages);
        assert!(query.validate().is_none());
    }

    #[test]
    fn test_records_query_renamed_flag() {
        let json = r#"{"email": "a@x.com", "page": 3, "fetchMorePages": true}"#;
        let query: RecordsQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.page, 3);
        assert!(query.fetch_more_pages);
    }

    #[test]
    fn test_validate_page_zero() {
        let query = RecordsQuery {
            email: "a@x.com".to_string(),
            page: 0,
            fetch_more_pages: false,
        };
        assert!(query.validate().is_some());
    }

    #[test]
    fn test_validate_empty_email() {
        let query = RecordsQuery {
            email: "  ".to_string(),
            page: 1,
            fetch_more_pages: false,
        };
        assert!(query.validate().is_some());
    }

    #[test]
    fn test_submit_form_deserialize() {
        let json = r#"{"email": "a@x.com", "startTime": "2023-01-01T09:00", "endTime": "2023-01-01T17:00"}"#;
        let form: SubmitTimeForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.start_time, "2023-01-01T09:00");
        assert_eq!(form.end_time, "2023-01-01T17:00");
    }
}
