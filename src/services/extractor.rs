use std::io::Write;
use std::process::Command;

use async_trait::async_trait;
use lopdf::Document;
use pdf_extract::extract_text;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::UploadedFile;

/// Converts a document's raw bytes into plain text.
///
/// Unsupported media types yield an `Ok` sentinel string rather than an
/// error; genuine I/O and OCR failures are returned as `Err`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, file: &UploadedFile) -> AppResult<String>;
}

/// Production extractor: `pdf-extract` for PDF documents, Tesseract OCR for
/// JPEG/PNG images.
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Check whether the tesseract binary is reachable on this system.
    pub fn ocr_available() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn extract_pdf(&self, file: &UploadedFile) -> AppResult<String> {
        debug!(
            file_name = file.file_name().unwrap_or("unknown"),
            size = file.content.len(),
            "Extracting text from PDF"
        );

        // Structural pre-check; extraction is still attempted on failure
        // since pdf-extract tolerates some malformed documents.
        if let Err(e) = Document::load_mem(&file.content) {
            warn!("PDF structure validation failed: {}, attempting extraction anyway", e);
        }

        let mut temp_file = NamedTempFile::new().map_err(|e| {
            AppError::extraction(format!("Failed to create temporary file: {}", e))
        })?;
        temp_file.write_all(&file.content).map_err(|e| {
            AppError::extraction(format!("Failed to write PDF to temporary file: {}", e))
        })?;

        let text = extract_text(temp_file.path())
            .map_err(|e| AppError::extraction(format!("PDF text extraction failed: {}", e)))?;

        debug!("PDF text extraction yielded {} characters", text.len());
        Ok(text)
    }

    fn extract_image(&self, file: &UploadedFile) -> AppResult<String> {
        // Validate the payload decodes as an image before handing it to OCR.
        image::load_from_memory(&file.content)
            .map_err(|e| AppError::extraction(format!("Failed to decode image: {}", e)))?;

        if !Self::ocr_available() {
            return Err(AppError::ocr(
                "Tesseract OCR is not available on this system".to_string(),
            ));
        }

        let suffix = if file.media_type() == "image/png" {
            ".png"
        } else {
            ".jpg"
        };
        let mut temp_file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .map_err(|e| AppError::ocr(format!("Failed to create temporary file: {}", e)))?;
        temp_file
            .write_all(&file.content)
            .map_err(|e| AppError::ocr(format!("Failed to write image to temporary file: {}", e)))?;

        let output = Command::new("tesseract")
            .arg(temp_file.path())
            .arg("stdout")
            .args(["-l", "por+eng"])
            .output()
            .map_err(|e| AppError::ocr(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ocr(format!(
                "Tesseract exited with an error: {}",
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!("OCR yielded {} characters", text.len());
        Ok(text)
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, file: &UploadedFile) -> AppResult<String> {
        let file_name = file.file_name().unwrap_or("unknown");
        info!(
            file_name = file_name,
            media_type = file.media_type(),
            size = file.content.len(),
            "Starting text extraction"
        );

        match file.media_type() {
            "application/pdf" => self.extract_pdf(file),
            "image/jpeg" | "image/png" => self.extract_image(file),
            other => {
                warn!(media_type = other, file_name = file_name, "Unsupported media type");
                Ok(format!(
                    "[ERROR: media type {} is not supported for {}]",
                    other, file_name
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_media_type_returns_sentinel_not_error() {
        let extractor = DocumentExtractor::new();
        let file = UploadedFile::new(
            Some("notes.txt".to_string()),
            Some("text/plain".to_string()),
            b"plain text".to_vec(),
        );

        let text = extractor.extract(&file).await.unwrap();
        assert!(text.starts_with("[ERROR: media type text/plain"));
        assert!(text.contains("notes.txt"));
    }

    #[tokio::test]
    async fn undecodable_image_is_an_extraction_error() {
        let extractor = DocumentExtractor::new();
        let file = UploadedFile::new(
            Some("photo.png".to_string()),
            Some("image/png".to_string()),
            b"not an image".to_vec(),
        );

        let err = extractor.extract(&file).await.unwrap_err();
        assert!(matches!(err, AppError::ExtractionError { .. }));
    }
}
