use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Media types accepted for resume uploads.
pub const SUPPORTED_MEDIA_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

/// A single uploaded document, owned by the pipeline for one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: Option<String>,
    pub media_type: Option<String>,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(
        name: Option<String>,
        media_type: Option<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name,
            media_type,
            content: content.into(),
        }
    }

    /// File name, if one was supplied and is non-empty.
    pub fn file_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn media_type(&self) -> &str {
        self.media_type.as_deref().unwrap_or("")
    }

    pub fn is_supported_type(&self) -> bool {
        SUPPORTED_MEDIA_TYPES.contains(&self.media_type())
    }
}

/// Outcome of the extraction step for one validated file. Files that failed
/// extraction still produce a result with empty text so they stay visible
/// downstream, but they are excluded from model input.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub file_name: String,
    pub extracted_text: String,
    pub media_type: String,
    pub extraction_error: Option<String>,
}

impl ExtractionResult {
    pub fn has_text(&self) -> bool {
        !self.extracted_text.trim().is_empty()
    }
}

/// Per-file failure surfaced to the caller without aborting the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingError {
    pub file_name: String,
    pub error: String,
}

impl ProcessingError {
    pub fn new(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            error: error.into(),
        }
    }
}
