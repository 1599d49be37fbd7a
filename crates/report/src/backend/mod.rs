//! Report backend contract
//!
//! This module provides:
//! - The `ReportBackend` trait the sync controller talks to
//! - `HttpBackend`, a blocking ureq client for the real service
//! - `InMemoryBackend`, a scripted fake for tests and offline runs

mod client;
mod memory;

pub use client::HttpBackend;
pub use memory::{BackendCall, InMemoryBackend};

use serde_json::Value;

use crate::models::{GeoLocation, SearchRequest};

/// Failure talking to the report backend
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// The request did not complete within its deadline
    #[error("Request timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// The backend answered with a non-success status
    #[error("Request failed with status code {code}")]
    Status {
        code: u16,
        /// The `error` field of the response body, when present
        detail: Option<String>,
    },

    /// Connection, DNS or protocol failure
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered 200 with nothing in the body
    #[error("Invalid response from server")]
    EmptyBody,

    /// The body could not be decoded as the expected JSON
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// An endpoint URL could not be built from the configured base
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// Text suitable for showing to the operator
    ///
    /// Prefers the backend's own explanation over the transport-level one.
    pub fn detail(&self) -> String {
        match self {
            BackendError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout { .. })
    }
}

/// Operations the dashboard needs from the report service
///
/// Implementations block until the call resolves. Only `fetch_results` is
/// expected to enforce a deadline; the others wait on the transport.
pub trait ReportBackend: Send + Sync {
    /// POST `/search`; returns the acknowledgment message
    fn search(&self, request: &SearchRequest) -> Result<String, BackendError>;

    /// POST `/process`; the response body is ignored
    fn process(&self, request: &SearchRequest) -> Result<(), BackendError>;

    /// GET `/api/results`; returns the parsed, non-empty results document
    fn fetch_results(&self) -> Result<Value, BackendError>;

    /// POST `/api/get_location`
    fn get_location(&self, address: &str) -> Result<GeoLocation, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_prefers_backend_message() {
        let err = BackendError::Status {
            code: 404,
            detail: Some("results.json not found".to_string()),
        };
        assert_eq!(err.detail(), "results.json not found");
    }

    #[test]
    fn test_detail_falls_back_to_display() {
        let err = BackendError::Status {
            code: 502,
            detail: None,
        };
        assert_eq!(err.detail(), "Request failed with status code 502");

        let err = BackendError::Timeout { after_ms: 5000 };
        assert_eq!(err.detail(), "Request timed out after 5000 ms");
        assert!(err.is_timeout());
    }
}
