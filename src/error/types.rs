use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid multipart payload: {message}")]
    InvalidMultipart { message: String },

    #[error("No files were uploaded")]
    EmptyFileList,

    #[error("None of the uploaded files could be processed: {detail}")]
    AllFilesFailed { detail: String },

    #[error("Text extraction failed: {message}")]
    ExtractionError { message: String },

    #[error("OCR processing failed: {message}")]
    OcrError { message: String },

    #[error("Language model request failed: {message}")]
    LlmError { message: String },

    #[error("Rate limit exceeded: maximum concurrent requests reached")]
    TooManyRequests,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingField { .. } => "MISSING_FIELD",
            AppError::InvalidMultipart { .. } => "INVALID_MULTIPART",
            AppError::EmptyFileList => "EMPTY_FILE_LIST",
            AppError::AllFilesFailed { .. } => "ALL_FILES_FAILED",
            AppError::ExtractionError { .. } => "EXTRACTION_ERROR",
            AppError::OcrError { .. } => "OCR_ERROR",
            AppError::LlmError { .. } => "LLM_ERROR",
            AppError::TooManyRequests => "RATE_LIMIT_EXCEEDED",
            AppError::ConfigError { .. } => "CONFIG_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidMultipart { .. } => StatusCode::BAD_REQUEST,
            AppError::EmptyFileList => StatusCode::BAD_REQUEST,
            AppError::AllFilesFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExtractionError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::OcrError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::LlmError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        let error_id = Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();

        tracing::error!(
            error_code = error_code,
            status_code = %status,
            error_id = %error_id,
            error_message = %message,
            "Request failed"
        );

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
                "error_id": error_id,
                "timestamp": timestamp
            }
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::LlmError {
            message: err.to_string(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::InvalidMultipart {
            message: err.to_string(),
        }
    }
}

// Helper constructors for the common cases
impl AppError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        AppError::MissingField {
            field: field.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        AppError::ExtractionError {
            message: message.into(),
        }
    }

    pub fn ocr(message: impl Into<String>) -> Self {
        AppError::OcrError {
            message: message.into(),
        }
    }

    pub fn llm(message: impl Into<String>) -> Self {
        AppError::LlmError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
