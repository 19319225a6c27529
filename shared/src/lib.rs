pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod locale;
pub mod prediction;
pub mod store;
pub mod upload;
pub mod workflow;

pub use config::AppConfig;
pub use controller::{PredictionService, UploadController};
pub use error::{ConfigError, StoreError, TransferError, UploadError, ValidationError};
pub use history::{CropFilter, HistoryQuery, PredictionRecord, SeverityBand, SortOrder};
pub use locale::Locale;
pub use prediction::{LocaleTransport, PredictionEndpoint, PredictionResult};
pub use store::{DataStore, StoreConfig, SupabaseRest};
pub use upload::{CandidateFile, MAX_UPLOAD_BYTES};
pub use workflow::{Ticket, UploadWorkflow, WorkflowState};
