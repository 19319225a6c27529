//! Lifecycle of a single "submit an image, get a verdict" operation.
//!
//! [`UploadWorkflow`] holds the state and performs no I/O. Callers that can
//! hold `&mut` across an await use [`crate::controller::UploadController`].
//! The Yew model cannot, so it calls `begin`, [`crate::controller::transfer`]
//! and `resolve` separately around `spawn_local`; `UploadController::submit`
//! is built from the same three steps.

use derive_more::Display;

use crate::error::UploadError;
use crate::prediction::PredictionResult;
use crate::upload::CandidateFile;

/// Identifies one accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "#{}", _0)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Submitting { ticket: Ticket, file_name: String },
    Succeeded(PredictionResult),
    Failed(UploadError),
}

impl WorkflowState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, WorkflowState::Submitting { .. })
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            WorkflowState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&UploadError> {
        match self {
            WorkflowState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct UploadWorkflow {
    state: WorkflowState,
    last_ticket: u64,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Refuses with [`UploadError::Busy`] while a transfer is in flight.
    ///
    /// Callers holding a selection next to the verdict check this before
    /// swapping the selected file, so a result is never shown beside a file
    /// it was not computed for.
    pub fn check_ready(&self) -> Result<(), UploadError> {
        if self.state.is_submitting() {
            return Err(UploadError::Busy);
        }
        Ok(())
    }

    /// Accepts `file` for transfer.
    ///
    /// Any previous verdict is dropped before anything else happens. A file
    /// that fails validation moves the workflow to `Failed` and no ticket is
    /// issued. While a transfer is in flight the call is refused with
    /// [`UploadError::Busy`] and the state is left alone.
    pub fn begin<B>(&mut self, file: &CandidateFile<B>) -> Result<Ticket, UploadError> {
        if let WorkflowState::Submitting { ticket, .. } = &self.state {
            log::warn!("Rejecting {}: upload {} still in flight", file.name, ticket);
            return Err(UploadError::Busy);
        }

        self.state = WorkflowState::Idle;

        if let Err(e) = file.validate() {
            log::warn!("Rejected {} before upload: {}", file.name, e);
            let err = UploadError::from(e);
            self.state = WorkflowState::Failed(err.clone());
            return Err(err);
        }

        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        log::info!("Submitting {} ({} bytes) as upload {}", file.name, file.size, ticket);
        self.state = WorkflowState::Submitting {
            ticket,
            file_name: file.name.clone(),
        };
        Ok(ticket)
    }

    /// Applies the outcome of the transfer started under `ticket`.
    ///
    /// Returns the result to hand to the caller, once, on success. Outcomes
    /// for a ticket that is no longer current are discarded and yield `None`.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<PredictionResult, UploadError>,
    ) -> Option<PredictionResult> {
        match &self.state {
            WorkflowState::Submitting { ticket: current, .. } if *current == ticket => {}
            _ => {
                log::debug!("Discarding stale outcome for upload {}", ticket);
                return None;
            }
        }

        match outcome {
            Ok(result) => {
                log::info!(
                    "Upload {} classified as {} (severity {:.2})",
                    ticket,
                    result.disease_name,
                    result.severity
                );
                self.state = WorkflowState::Succeeded(result.clone());
                Some(result)
            }
            Err(e) => {
                log::error!("Upload {} failed: {}", ticket, e);
                self.state = WorkflowState::Failed(e);
                None
            }
        }
    }

    /// Back to `Idle`. An in-flight ticket is abandoned.
    pub fn reset(&mut self) {
        if let WorkflowState::Submitting { ticket, .. } = &self.state {
            log::info!("Abandoning upload {}", ticket);
        }
        self.state = WorkflowState::Idle;
    }
}
