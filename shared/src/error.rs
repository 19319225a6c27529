use thiserror::Error;

/// Rejections raised locally, before any byte leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported file type '{media_type}'. Only images are accepted.")]
    UnsupportedMediaType { media_type: String },
    #[error("File is too large ({size} bytes). The limit is {limit} bytes.")]
    TooLarge { size: u64, limit: u64 },
}

/// Failures of a transfer that was actually attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {status}")]
    Status { status: u16 },
    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("An upload is already in progress.")]
    Busy,
}

impl UploadError {
    /// Short category shown next to the failure.
    pub fn reason(&self) -> &'static str {
        match self {
            UploadError::Validation(ValidationError::UnsupportedMediaType { .. }) => "invalid type",
            UploadError::Validation(ValidationError::TooLarge { .. }) => "too large",
            UploadError::Transfer(_) => "upload error",
            UploadError::Busy => "busy",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::Validation(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Data store is not configured")]
    NotConfigured,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Data store error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse data store response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {key}: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),
    #[error("Unknown locale transport '{0}', expected 'form' or 'query'")]
    UnknownLocaleTransport(String),
    #[error("{0} is set but {1} is missing")]
    Incomplete(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_follow_error_category() {
        let invalid: UploadError = ValidationError::UnsupportedMediaType {
            media_type: "text/plain".into(),
        }
        .into();
        let large: UploadError = ValidationError::TooLarge {
            size: 6_000_000,
            limit: 5_000_000,
        }
        .into();
        let status: UploadError = TransferError::Status { status: 500 }.into();
        let network: UploadError = TransferError::Network("offline".into()).into();

        assert_eq!(invalid.reason(), "invalid type");
        assert_eq!(large.reason(), "too large");
        assert_eq!(status.reason(), "upload error");
        assert_eq!(network.reason(), "upload error");
        assert_eq!(UploadError::Busy.reason(), "busy");
        assert!(invalid.is_validation());
        assert!(!status.is_validation());
    }

    #[test]
    fn transparent_messages_pass_through() {
        let err: UploadError = TransferError::Status { status: 502 }.into();
        assert_eq!(err.to_string(), "Server error: 502");
    }
}
