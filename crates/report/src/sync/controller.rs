//! Search → process → poll protocol

use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::Arc;

use crate::backend::{BackendError, ReportBackend};
use crate::models::{SearchRequest, SyncState};

/// Error shown when the search or process step fails
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to perform search. Please try again.";

/// Text shown in place of the raw JSON when a poll fails
pub const RESULTS_FAILURE_SENTINEL: &str = "Failed to fetch results.json";

/// Which step of a submission failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    Search,
    Process,
}

/// A failed submission
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{stage:?} step failed: {source}")]
pub struct SubmitError {
    pub stage: SubmitStage,
    pub source: BackendError,
    /// Search acknowledgment, present when only the process step failed
    pub acknowledged: Option<String>,
}

/// Generation number handed out when a refresh is requested
///
/// Tickets are strictly increasing per controller. A fetch result is only
/// applied if its ticket is newer than the last one applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshApplied {
    /// The result was written to the state
    Applied,
    /// A newer refresh had already been applied; the result was dropped
    Stale,
    /// The controller was unmounted; the result was dropped
    Unmounted,
}

/// Drives the submit and poll protocol against a report backend
///
/// The controller owns its `SyncState` and is mutated only by its owner.
/// Blocking callers use [`submit`](Self::submit) and
/// [`refresh_results`](Self::refresh_results). Event-loop callers split each
/// operation: take a ticket or request on the owning thread, run the network
/// call elsewhere, then hand the result back with the matching `apply_*`.
pub struct SyncController {
    backend: Arc<dyn ReportBackend>,
    state: SyncState,
    /// Last ticket handed out
    issued_generation: u64,
    /// Ticket of the last result written to `state`
    applied_generation: u64,
    mounted: bool,
    /// Submissions begun but not yet applied; they may overlap
    submissions_in_flight: usize,
}

impl SyncController {
    pub fn new(backend: Arc<dyn ReportBackend>) -> Self {
        Self {
            backend,
            state: SyncState::default(),
            issued_generation: 0,
            applied_generation: 0,
            mounted: false,
            submissions_in_flight: 0,
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Shared handle to the backend, for running calls off-thread
    pub fn backend(&self) -> Arc<dyn ReportBackend> {
        self.backend.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Arm polling and return the ticket for the immediate first refresh
    pub fn mount(&mut self) -> RefreshTicket {
        self.mounted = true;
        self.state.polling_active = true;
        info!("Results polling armed");
        self.begin_refresh()
    }

    /// Disarm polling; results still in flight will be dropped on arrival
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.state.polling_active = false;
        info!("Results polling stopped");
    }

    // === Results refresh ===

    /// Take a ticket for a new results fetch
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued_generation += 1;
        debug!("Refresh #{} requested", self.issued_generation);
        RefreshTicket(self.issued_generation)
    }

    /// Apply the outcome of the fetch started with `ticket`
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Value, BackendError>,
    ) -> RefreshApplied {
        if !self.mounted {
            debug!("Refresh #{} arrived after unmount, dropped", ticket.0);
            return RefreshApplied::Unmounted;
        }

        if ticket.0 <= self.applied_generation {
            warn!(
                "Refresh #{} superseded by #{}, dropped",
                ticket.0, self.applied_generation
            );
            return RefreshApplied::Stale;
        }
        self.applied_generation = ticket.0;

        match result {
            Ok(data) => {
                debug!("Refresh #{} applied", ticket.0);
                self.state.record_results(data);
            }
            Err(e) => {
                warn!("Refresh #{} failed: {}", ticket.0, e);
                self.state.record_poll_failure(
                    RESULTS_FAILURE_SENTINEL,
                    format!("Failed to fetch results. Error: {}", e.detail()),
                );
            }
        }
        RefreshApplied::Applied
    }

    /// Fetch results once and apply them (blocking)
    pub fn refresh_results(&mut self) -> RefreshApplied {
        let ticket = self.begin_refresh();
        let result = self.backend.fetch_results();
        self.apply_refresh(ticket, result)
    }

    // === Submission ===

    /// Record the start of a submission and return the request to send
    pub fn begin_submit(
        &mut self,
        query: impl Into<String>,
        location: impl Into<String>,
    ) -> SearchRequest {
        let request = SearchRequest::new(query, location);
        self.submissions_in_flight += 1;
        self.state.submitting = true;
        self.state.last_submitted = Some(request.clone());
        request
    }

    /// Apply the outcome of [`run_submission`]
    ///
    /// Returns true when the caller should follow up with an immediate refresh.
    pub fn apply_submission(&mut self, result: Result<String, SubmitError>) -> bool {
        self.submissions_in_flight = self.submissions_in_flight.saturating_sub(1);
        self.state.submitting = self.submissions_in_flight > 0;
        match result {
            Ok(message) => {
                info!("Search accepted: {}", message);
                self.state.search_result_message = Some(message);
                true
            }
            Err(e) => {
                error!("Error sending data to backend: {}", e);
                if let Some(message) = e.acknowledged {
                    self.state.search_result_message = Some(message);
                }
                self.state.error = Some(SUBMIT_FAILURE_MESSAGE.to_string());
                false
            }
        }
    }

    /// Search, trigger processing, then refresh once (blocking)
    ///
    /// Each step waits for the previous one. A failure at search or process
    /// ends the submission without touching the results.
    pub fn submit(&mut self, query: impl Into<String>, location: impl Into<String>) {
        let request = self.begin_submit(query, location);
        let result = run_submission(self.backend.as_ref(), &request);
        if self.apply_submission(result) {
            self.refresh_results();
        }
    }
}

/// Run the search and process steps for `request`
///
/// Stops at the first failing step. The acknowledgment from search is
/// returned once processing has been triggered, or carried in the error if
/// processing failed.
pub fn run_submission(
    backend: &dyn ReportBackend,
    request: &SearchRequest,
) -> Result<String, SubmitError> {
    let message = backend.search(request).map_err(|source| SubmitError {
        stage: SubmitStage::Search,
        source,
        acknowledged: None,
    })?;

    if let Err(source) = backend.process(request) {
        return Err(SubmitError {
            stage: SubmitStage::Process,
            source,
            acknowledged: Some(message),
        });
    }

    Ok(message)
}
