//! Wire types for the report backend

use serde::{Deserialize, Serialize};

/// Body of the `/search` and `/process` calls
///
/// Created per submit and never persisted. Empty strings are forwarded
/// as-is; the backend owns any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub location: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: location.into(),
        }
    }
}

/// Acknowledgment returned by `/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub message: String,
}

/// Body of the `/api/get_location` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub address: String,
}

/// Geocoded location returned by `/api/get_location`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// Error payload the backend attaches to non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    /// Extract the `error` field from a response body, if it has one
    pub fn detail_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.error)
            .filter(|e| !e.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_serializes_both_fields() {
        let request = SearchRequest::new("weather", "NYC");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"query": "weather", "location": "NYC"}));
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let json = serde_json::to_string(&SearchRequest::default()).unwrap();
        assert_eq!(json, r#"{"query":"","location":""}"#);
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            ErrorBody::detail_from(r#"{"error": "results.json not found"}"#),
            Some("results.json not found".to_string())
        );
        assert_eq!(ErrorBody::detail_from(r#"{"error": "  "}"#), None);
        assert_eq!(ErrorBody::detail_from("<html>Bad Gateway</html>"), None);
        assert_eq!(ErrorBody::detail_from(r#"{"message": "ok"}"#), None);
    }

    #[test]
    fn test_geo_location_deserialize() {
        let json = r#"{"lat": 40.7128, "lng": -74.006, "address": "New York, NY"}"#;
        let location: GeoLocation = serde_json::from_str(json).unwrap();
        assert_eq!(location.address, "New York, NY");
        assert!((location.lat - 40.7128).abs() < f64::EPSILON);
    }
}
