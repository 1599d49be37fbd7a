//! Report backend HTTP client
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic. Only the results
//! fetch carries a deadline; search and process wait on the transport.

use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use ureq::Agent;
use url::Url;

use super::{BackendError, ReportBackend};
use crate::config::DashboardConfig;
use crate::models::{ErrorBody, GeoLocation, LocationRequest, SearchRequest, SearchResponse};

/// Blocking client for the report service
pub struct HttpBackend {
    base_url: Url,
    /// Agent for search, process and geocode (no deadline)
    agent: Agent,
    /// Agent for the results poll (bounded by `results_timeout`)
    results_agent: Agent,
    results_timeout: Duration,
}

impl HttpBackend {
    const SEARCH_PATH: &'static str = "search";
    const PROCESS_PATH: &'static str = "process";
    const RESULTS_PATH: &'static str = "api/results";
    const LOCATION_PATH: &'static str = "api/get_location";

    /// Default round-trip bound for the results fetch
    pub const DEFAULT_RESULTS_TIMEOUT: Duration = Duration::from_millis(5000);

    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_results_timeout(base_url, Self::DEFAULT_RESULTS_TIMEOUT)
    }

    /// Create a client using the dashboard settings
    pub fn from_config(config: &DashboardConfig) -> Result<Self, BackendError> {
        Self::with_results_timeout(&config.backend_url, config.results_timeout())
    }

    /// Create a client with a custom results deadline
    pub fn with_results_timeout(
        base_url: &str,
        results_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // Url::join replaces the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        // Status codes are inspected by hand so error bodies can be read
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        let results_agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(results_timeout))
            .build()
            .into();

        Ok(Self {
            base_url,
            agent,
            results_agent,
            results_timeout,
        })
    }

    /// The normalized base URL (always ends in '/')
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// POST a JSON body and return the raw response text on 2xx
    fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<String, BackendError> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let mut response = self
            .agent
            .post(url.as_str())
            .send_json(body)
            .map_err(|e| map_transport_error(e, None))?;

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| map_transport_error(e, None))?;

        if !(200..300).contains(&status) {
            return Err(BackendError::Status {
                code: status,
                detail: ErrorBody::detail_from(&text),
            });
        }

        Ok(text)
    }
}

impl ReportBackend for HttpBackend {
    fn search(&self, request: &SearchRequest) -> Result<String, BackendError> {
        let text = self.post_json(Self::SEARCH_PATH, request)?;
        let ack: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::InvalidBody(format!("search response: {}", e)))?;
        Ok(ack.message)
    }

    fn process(&self, request: &SearchRequest) -> Result<(), BackendError> {
        self.post_json(Self::PROCESS_PATH, request)?;
        Ok(())
    }

    fn fetch_results(&self) -> Result<Value, BackendError> {
        let url = self.endpoint(Self::RESULTS_PATH)?;
        let deadline = Some(self.results_timeout);
        debug!("GET {}", url);

        let mut response = self
            .results_agent
            .get(url.as_str())
            .call()
            .map_err(|e| map_transport_error(e, deadline))?;

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| map_transport_error(e, deadline))?;

        if status != 200 {
            return Err(BackendError::Status {
                code: status,
                detail: ErrorBody::detail_from(&text),
            });
        }

        parse_results_body(&text)
    }

    fn get_location(&self, address: &str) -> Result<GeoLocation, BackendError> {
        let request = LocationRequest {
            address: address.to_string(),
        };
        let text = self.post_json(Self::LOCATION_PATH, &request)?;
        serde_json::from_str(&text)
            .map_err(|e| BackendError::InvalidBody(format!("location response: {}", e)))
    }
}

/// Decode a results body, rejecting empty payloads
///
/// A blank body, or a document that is `null`, `false`, `0` or `""`,
/// counts as "nothing to show yet".
pub(crate) fn parse_results_body(text: &str) -> Result<Value, BackendError> {
    if text.trim().is_empty() {
        return Err(BackendError::EmptyBody);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| BackendError::InvalidBody(e.to_string()))?;

    if is_empty_document(&value) {
        return Err(BackendError::EmptyBody);
    }

    Ok(value)
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Convert a ureq failure into the backend taxonomy
fn map_transport_error(err: ureq::Error, deadline: Option<Duration>) -> BackendError {
    let after_ms = deadline.map(|d| d.as_millis() as u64).unwrap_or(0);
    match err {
        ureq::Error::Timeout(_) => BackendError::Timeout { after_ms },
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            BackendError::Timeout { after_ms }
        }
        ureq::Error::StatusCode(code) => BackendError::Status { code, detail: None },
        other => BackendError::Transport(other.to_string()),
    }
}
