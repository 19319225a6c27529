use async_trait::async_trait;

use crate::error::{TransferError, UploadError};
use crate::locale::Locale;
use crate::prediction::PredictionResult;
use crate::upload::CandidateFile;
use crate::workflow::{UploadWorkflow, WorkflowState};

/// The remote classifier.
///
/// Futures are not `Send`: in the browser they run on the page's event loop.
#[async_trait(?Send)]
pub trait PredictionService {
    /// What the service needs to read the image from.
    type Body;

    /// Sends one image. Called exactly once per accepted submission.
    async fn predict(
        &self,
        file: &CandidateFile<Self::Body>,
        locale: Locale,
    ) -> Result<PredictionResult, TransferError>;
}

/// The transfer step of a submission: one call to `service`, with its
/// failure folded into [`UploadError`].
pub async fn transfer<S: PredictionService>(
    service: &S,
    file: &CandidateFile<S::Body>,
    locale: Locale,
) -> Result<PredictionResult, UploadError> {
    service
        .predict(file, locale)
        .await
        .map_err(UploadError::from)
}

/// Drives an [`UploadWorkflow`] against a [`PredictionService`].
///
/// `submit` takes `&mut self`, so one controller never has two transfers in
/// flight.
pub struct UploadController<S> {
    service: S,
    workflow: UploadWorkflow,
}

impl<S: PredictionService> UploadController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            workflow: UploadWorkflow::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        self.workflow.state()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn reset(&mut self) {
        self.workflow.reset();
    }

    /// Validates, transfers and classifies `file`.
    ///
    /// The returned future resolves once; `Ok` carries the same value the
    /// workflow now holds in `Succeeded`.
    pub async fn submit(
        &mut self,
        file: CandidateFile<S::Body>,
        locale: Locale,
    ) -> Result<PredictionResult, UploadError> {
        let ticket = self.workflow.begin(&file)?;

        let outcome = transfer(&self.service, &file, locale).await;
        drop(file);

        // `&mut self` keeps the ticket current until here.
        match outcome {
            Ok(result) => {
                self.workflow.resolve(ticket, Ok(result.clone()));
                Ok(result)
            }
            Err(e) => {
                self.workflow.resolve(ticket, Err(e.clone()));
                Err(e)
            }
        }
    }
}
