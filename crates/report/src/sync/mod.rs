//! Sync engine for the results dashboard
//!
//! Sequences search, processing trigger and results polling, and keeps a
//! single consistent view of the latest outcome.

mod controller;
mod timing;

pub use controller::{
    RESULTS_FAILURE_SENTINEL, RefreshApplied, RefreshTicket, SUBMIT_FAILURE_MESSAGE, SubmitError,
    SubmitStage, SyncController, run_submission,
};
pub use timing::{freshness_label, results_age, results_stale};
