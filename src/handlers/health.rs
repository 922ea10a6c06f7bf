use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::time::SystemTime;
use tracing::info;

use crate::error::AppResult;
use crate::middleware::rate_limit::get_rate_limit_metrics;
use crate::services::DocumentExtractor;

/// Health check endpoint
pub async fn health_handler() -> AppResult<Json<Value>> {
    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    // PDF extraction is in-process; OCR depends on the tesseract binary.
    let ocr_service = DocumentExtractor::ocr_available();
    let status = if ocr_service { "healthy" } else { "degraded" };

    let (total_requests, rejected_requests, available_permits) = get_rate_limit_metrics();

    let response = json!({
        "status": status,
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "pdf_extractor": true,
            "ocr_service": ocr_service
        },
        "rate_limiting": {
            "total_requests": total_requests,
            "rejected_requests": rejected_requests,
            "available_permits": available_permits
        }
    });

    info!(status = status, ocr_available = ocr_service, "Health check completed");
    Ok(Json(response))
}

/// Readiness probe: the service can accept traffic once it is up; PDF
/// extraction has no external runtime dependency.
pub async fn ready_handler() -> StatusCode {
    StatusCode::OK
}
