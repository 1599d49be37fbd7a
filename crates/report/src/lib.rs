//! Report crate - core logic for the UDDHRTI report dashboard
//!
//! This crate provides the UI-independent parts of the dashboard:
//! - Request/response models for the report backend
//! - The backend contract plus an HTTP client and an in-memory fake
//! - The submit/process/poll sync controller
//! - A JSON tree renderer with path-keyed expansion state
//!
//! Nothing here depends on a UI toolkit. Blocking I/O is done with ureq so
//! callers can run it on whatever executor they own.

pub mod backend;
pub mod config;
pub mod models;
pub mod sync;
pub mod tree;

pub use backend::{BackendCall, BackendError, HttpBackend, InMemoryBackend, ReportBackend};
pub use config::DashboardConfig;
pub use models::{GeoLocation, SearchRequest, SearchResponse, SyncState};
pub use sync::{
    RESULTS_FAILURE_SENTINEL, RefreshApplied, RefreshTicket, SUBMIT_FAILURE_MESSAGE, SubmitError,
    SubmitStage, SyncController, freshness_label, results_age, results_stale, run_submission,
};
pub use tree::{
    Container, ExpansionState, JsonPath, PathSegment, RenderOptions, RowKind, ScalarStyle,
    TreeRow, TreeView, render, render_value,
};
