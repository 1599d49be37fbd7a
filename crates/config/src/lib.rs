//! Settings directory for the UDDHRTI dashboard
//!
//! Everything the dashboard persists lives under one per-user directory
//! (~/.config/uddhrti/). Files are JSON. A missing file is not an error when
//! reading by name; callers fall back to their defaults instead.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "uddhrti";

/// The settings directory, without creating it
pub fn settings_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_DIR))
        .context("No per-user config directory on this platform")
}

/// Path of `filename` inside the settings directory
pub fn settings_path(filename: &str) -> Result<PathBuf> {
    Ok(settings_dir()?.join(filename))
}

/// Create the settings directory if needed and return it
pub fn init() -> Result<PathBuf> {
    let dir = settings_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create settings directory: {}", dir.display()))?;
    Ok(dir)
}

/// Read `filename` from the settings directory; `None` if it does not exist
pub fn read_json<T: DeserializeOwned>(filename: &str) -> Result<Option<T>> {
    read_json_if_present(&settings_path(filename)?)
}

/// Read a JSON file at `path`; `None` if it does not exist
pub fn read_json_if_present<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content, path).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read settings file: {}", path.display()))
        }
    }
}

/// Read a JSON file at `path`, which must exist
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    parse(&content, path)
}

/// Write `value` to `filename` in the settings directory unless the file exists
///
/// Returns the path when a file was written.
pub fn write_json_new<T: Serialize>(filename: &str, value: &T) -> Result<Option<PathBuf>> {
    let path = init()?.join(filename);
    Ok(write_json_file_new(&path, value)?.then_some(path))
}

/// Create `path` with `value` as pretty JSON; false if it already exists
///
/// Never overwrites, so hand-edited settings survive a restart.
pub fn write_json_file_new<T: Serialize>(path: &Path, value: &T) -> Result<bool> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize settings")?;
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to create settings file: {}", path.display()));
        }
    };
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write settings file: {}", path.display()))?;
    Ok(true)
}

fn parse<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    serde_json::from_str(content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}
