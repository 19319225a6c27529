use crate::error::ValidationError;

/// Largest image the client will send, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 5_000_000;

/// A file picked for one submission attempt.
///
/// `B` is whatever carries the bytes: a browser `File` in the app, a plain
/// `Vec<u8>` in tests. The controller never looks inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile<B = Vec<u8>> {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub body: B,
}

impl<B> CandidateFile<B> {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, size: u64, body: B) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size,
            body,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_candidate(&self.media_type, self.size)
    }
}

impl CandidateFile<Vec<u8>> {
    pub fn from_bytes(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, media_type, size, bytes)
    }
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.trim().to_ascii_lowercase().starts_with("image/")
}

pub fn validate_candidate(media_type: &str, size: u64) -> Result<(), ValidationError> {
    if !is_image_media_type(media_type) {
        return Err(ValidationError::UnsupportedMediaType {
            media_type: media_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}
