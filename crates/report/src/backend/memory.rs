//! In-memory backend implementation
//!
//! Scripted stand-in for the report service. Used by tests and by the
//! dashboard when it is started without a reachable backend.

use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, RwLock};

use super::{BackendError, ReportBackend};
use crate::models::{GeoLocation, SearchRequest};

/// A call received by the fake backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Search(SearchRequest),
    Process(SearchRequest),
    FetchResults,
    GetLocation(String),
}

/// In-memory implementation of ReportBackend
///
/// Each endpoint answers with a configurable reply. The results endpoint
/// also accepts one-shot replies that are consumed in order before falling
/// back to the standing reply.
pub struct InMemoryBackend {
    search_reply: RwLock<Result<String, BackendError>>,
    process_reply: RwLock<Result<(), BackendError>>,
    results_reply: RwLock<Result<Value, BackendError>>,
    queued_results: Mutex<VecDeque<Result<Value, BackendError>>>,
    location_reply: RwLock<Result<GeoLocation, BackendError>>,
    calls: Mutex<Vec<BackendCall>>,
}

impl InMemoryBackend {
    /// Create a backend that acknowledges searches and has no results yet
    pub fn new() -> Self {
        Self {
            search_reply: RwLock::new(Ok("Search request received".to_string())),
            process_reply: RwLock::new(Ok(())),
            results_reply: RwLock::new(Err(BackendError::EmptyBody)),
            queued_results: Mutex::new(VecDeque::new()),
            location_reply: RwLock::new(Err(BackendError::Status {
                code: 404,
                detail: Some("No results found.".to_string()),
            })),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a backend that already serves `results`
    pub fn with_results(results: Value) -> Self {
        let backend = Self::new();
        backend.set_results(Ok(results));
        backend
    }

    pub fn set_search_reply(&self, reply: Result<String, BackendError>) {
        *self.search_reply.write().unwrap() = reply;
    }

    pub fn set_process_reply(&self, reply: Result<(), BackendError>) {
        *self.process_reply.write().unwrap() = reply;
    }

    /// Replace the standing reply of the results endpoint
    pub fn set_results(&self, reply: Result<Value, BackendError>) {
        *self.results_reply.write().unwrap() = reply;
    }

    /// Queue a reply for the next results fetch only
    pub fn push_results(&self, reply: Result<Value, BackendError>) {
        self.queued_results.lock().unwrap().push_back(reply);
    }

    pub fn set_location_reply(&self, reply: Result<GeoLocation, BackendError>) {
        *self.location_reply.write().unwrap() = reply;
    }

    /// All calls received so far, oldest first
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls matching `predicate`
    pub fn count_calls(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    /// Number of results fetches received so far
    pub fn results_fetches(&self) -> usize {
        self.count_calls(|c| matches!(c, BackendCall::FetchResults))
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBackend for InMemoryBackend {
    fn search(&self, request: &SearchRequest) -> Result<String, BackendError> {
        self.record(BackendCall::Search(request.clone()));
        self.search_reply.read().unwrap().clone()
    }

    fn process(&self, request: &SearchRequest) -> Result<(), BackendError> {
        self.record(BackendCall::Process(request.clone()));
        self.process_reply.read().unwrap().clone()
    }

    fn fetch_results(&self) -> Result<Value, BackendError> {
        self.record(BackendCall::FetchResults);
        if let Some(reply) = self.queued_results.lock().unwrap().pop_front() {
            return reply;
        }
        self.results_reply.read().unwrap().clone()
    }

    fn get_location(&self, address: &str) -> Result<GeoLocation, BackendError> {
        self.record(BackendCall::GetLocation(address.to_string()));
        self.location_reply.read().unwrap().clone()
    }
}
