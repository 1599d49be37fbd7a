//! Observable state published by the sync controller

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::SearchRequest;

/// Latest outcome of the search/process/poll protocol
///
/// Owned by exactly one `SyncController` for the lifetime of the view that
/// mounted it. `processed_data` is last-known-good: a failed poll replaces
/// `raw_json_text` with a sentinel but leaves the structured data alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncState {
    /// Last acknowledgment message from `/search`
    pub search_result_message: Option<String>,
    /// Most recent successfully fetched results payload
    pub processed_data: Option<Value>,
    /// Pretty-printed `processed_data`, or the failure sentinel
    pub raw_json_text: String,
    /// Last user-facing error; cleared on the next success
    pub error: Option<String>,
    /// Whether the poll timer is armed
    pub polling_active: bool,
    /// True while a submission is between search and process
    pub submitting: bool,
    /// When `processed_data` was last replaced
    pub last_success_at: Option<DateTime<Utc>>,
    /// The most recent request handed to the search step
    pub last_submitted: Option<SearchRequest>,
}

impl SyncState {
    /// Whether a results payload has ever been received
    pub fn has_results(&self) -> bool {
        self.processed_data.is_some()
    }

    /// Replace the results with a freshly fetched payload
    ///
    /// Both the parsed and textual forms are written here and nowhere else
    /// on the success path, so they never disagree about which fetch they
    /// came from.
    pub(crate) fn record_results(&mut self, data: Value) {
        self.raw_json_text =
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
        self.processed_data = Some(data);
        self.error = None;
        self.last_success_at = Some(Utc::now());
    }

    /// Record a failed poll without touching last-known-good data
    pub(crate) fn record_poll_failure(&mut self, sentinel: &str, message: String) {
        self.raw_json_text = sentinel.to_string();
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_state_is_empty() {
        let state = SyncState::default();
        assert!(!state.has_results());
        assert!(state.raw_json_text.is_empty());
        assert!(state.error.is_none());
        assert!(!state.polling_active);
    }

    #[test]
    fn test_record_results_pretty_prints_with_two_spaces() {
        let mut state = SyncState {
            error: Some("old failure".to_string()),
            ..Default::default()
        };
        state.record_results(json!({"a": [1, 2]}));

        assert_eq!(state.raw_json_text, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
        assert_eq!(state.processed_data, Some(json!({"a": [1, 2]})));
        assert!(state.error.is_none());
        assert!(state.last_success_at.is_some());
    }

    #[test]
    fn test_poll_failure_keeps_processed_data() {
        let mut state = SyncState::default();
        state.record_results(json!({"status": "done"}));
        let success_at = state.last_success_at;

        state.record_poll_failure("sentinel", "boom".to_string());

        assert_eq!(state.processed_data, Some(json!({"status": "done"})));
        assert_eq!(state.raw_json_text, "sentinel");
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert_eq!(state.last_success_at, success_at);
    }
}
