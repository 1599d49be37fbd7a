//! Dashboard settings
//!
//! Settings are resolved in this order:
//! 1. `dashboard.json` in the config directory (missing fields use defaults)
//! 2. Built-in defaults
//!
//! The `UDDHRTI_BACKEND_URL` environment variable then overrides the backend URL.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Settings filename in the config directory
const SETTINGS_FILE: &str = "dashboard.json";

/// Environment variable that overrides `backend_url`
pub const BACKEND_URL_ENV: &str = "UDDHRTI_BACKEND_URL";

/// Runtime settings for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the report service
    pub backend_url: String,
    /// Milliseconds between poll ticks
    pub poll_interval_ms: u64,
    /// Round-trip bound for the results fetch
    pub results_timeout_ms: u64,
    /// Deepest level the JSON tree renders before showing a placeholder
    pub max_tree_depth: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            poll_interval_ms: 5000,
            results_timeout_ms: 5000,
            max_tree_depth: 64,
        }
    }
}

impl DashboardConfig {
    /// Load settings from the config directory and environment
    pub fn load() -> Result<Self> {
        let config = config::read_json::<Self>(SETTINGS_FILE)?.unwrap_or_default();

        let config = config.with_backend_override(std::env::var(BACKEND_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = config::read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse dashboard settings")?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the backend URL when an override is present and non-empty
    pub fn with_backend_override(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        self
    }

    /// Reject settings the dashboard cannot run with
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.backend_url)
            .with_context(|| format!("Invalid backend URL: {}", self.backend_url))?;
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.results_timeout_ms == 0 {
            bail!("results_timeout_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn results_timeout(&self) -> Duration {
        Duration::from_millis(self.results_timeout_ms)
    }

    /// Write the current settings to the config directory unless a file exists
    ///
    /// Returns the path written, or `None` if settings were already present.
    pub fn save_if_missing(&self) -> Result<Option<PathBuf>> {
        config::write_json_new(SETTINGS_FILE, self)
    }

    /// Path of the settings file (~/.config/uddhrti/dashboard.json)
    pub fn default_settings_path() -> Option<PathBuf> {
        config::settings_path(SETTINGS_FILE).ok()
    }
}
