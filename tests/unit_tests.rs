//! Unit tests for individual components

use axum::http::StatusCode;
use serde_json::json;

use resume_triage::error::AppError;
use resume_triage::models::{
    MatchOutcome, MatchResponse, ProcessResponse, ProcessingError, RequestRecord, ResumeSummary,
    SummaryResponse, UploadedFile, SUPPORTED_MEDIA_TYPES,
};

#[test]
fn test_error_codes() {
    assert_eq!(AppError::EmptyFileList.error_code(), "EMPTY_FILE_LIST");
    assert_eq!(AppError::TooManyRequests.error_code(), "RATE_LIMIT_EXCEEDED");
    assert_eq!(
        AppError::missing_field("request_id").error_code(),
        "MISSING_FIELD"
    );
    assert_eq!(AppError::extraction("bad pdf").error_code(), "EXTRACTION_ERROR");
    assert_eq!(AppError::llm("timeout").error_code(), "LLM_ERROR");
    assert_eq!(AppError::config("missing").error_code(), "CONFIG_ERROR");
}

#[test]
fn test_error_status_codes() {
    assert_eq!(AppError::EmptyFileList.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        AppError::missing_field("user_id").status_code(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        AppError::AllFilesFailed {
            detail: "cv.pdf: unreadable".to_string()
        }
        .status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::TooManyRequests.status_code(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
        AppError::llm("offline").status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_error_messages_carry_detail() {
    let err = AppError::missing_field("request_id");
    assert_eq!(err.to_string(), "Missing required field: request_id");

    let err = AppError::AllFilesFailed {
        detail: "cv.pdf: unreadable".to_string(),
    };
    assert!(err.to_string().contains("cv.pdf: unreadable"));
}

#[test]
fn test_uploaded_file_helpers() {
    let file = UploadedFile::new(
        Some("cv.pdf".to_string()),
        Some("application/pdf".to_string()),
        vec![1, 2, 3],
    );
    assert_eq!(file.file_name(), Some("cv.pdf"));
    assert!(file.is_supported_type());

    let unsupported = UploadedFile::new(
        Some("notes.txt".to_string()),
        Some("text/plain".to_string()),
        vec![],
    );
    assert!(!unsupported.is_supported_type());

    let nameless = UploadedFile::new(Some(String::new()), None, vec![]);
    assert_eq!(nameless.file_name(), None);
    assert_eq!(nameless.media_type(), "");

    assert!(SUPPORTED_MEDIA_TYPES.contains(&"image/jpeg"));
    assert!(SUPPORTED_MEDIA_TYPES.contains(&"image/png"));
}

#[test]
fn test_match_outcome_serialization() {
    // Structured variant serializes as an object.
    let structured = MatchOutcome::structured("cv1.pdf", "Strong overlap with the query.");
    let value = serde_json::to_value(&structured).unwrap();
    assert_eq!(
        value,
        json!({"file_name": "cv1.pdf", "justification": "Strong overlap with the query."})
    );

    // Raw variant serializes as a bare string.
    let raw = MatchOutcome::Raw("cv2.pdf looks best overall.".to_string());
    let value = serde_json::to_value(&raw).unwrap();
    assert_eq!(value, json!("cv2.pdf looks best overall."));

    // And both deserialize back into the right variant.
    let parsed: MatchOutcome =
        serde_json::from_value(json!({"file_name": "a", "justification": "b"})).unwrap();
    assert_eq!(parsed, MatchOutcome::structured("a", "b"));
    let parsed: MatchOutcome = serde_json::from_value(json!("free text")).unwrap();
    assert_eq!(parsed, MatchOutcome::Raw("free text".to_string()));
}

#[test]
fn test_match_outcome_sentinels() {
    let MatchOutcome::Structured { file_name, .. } = MatchOutcome::no_valid_resumes() else {
        panic!("sentinel must be structured");
    };
    assert_eq!(file_name, "No valid resumes to analyze");

    let MatchOutcome::Structured { file_name, .. } = MatchOutcome::unexpected_output() else {
        panic!("sentinel must be structured");
    };
    assert_eq!(file_name, "Unexpected model output");
}

#[test]
fn test_response_shapes() {
    let summary = ProcessResponse::Summary(SummaryResponse {
        request_id: "req-1".to_string(),
        summaries: vec![ResumeSummary::new("cv.pdf", "A summary.")],
        processing_errors: None,
    });
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["request_id"], "req-1");
    assert_eq!(value["summaries"][0]["summary"], "A summary.");
    // Absent errors are omitted, not serialized as null.
    assert!(value.get("processing_errors").is_none());

    let matched = ProcessResponse::Match(MatchResponse {
        request_id: "req-2".to_string(),
        best_match: MatchOutcome::Raw("cv.pdf".to_string()),
        processing_errors: Some(vec![ProcessingError::new("x.txt", "Unsupported media type")]),
    });
    let value = serde_json::to_value(&matched).unwrap();
    assert_eq!(value["best_match"], "cv.pdf");
    assert_eq!(value["processing_errors"][0]["file_name"], "x.txt");
}

#[test]
fn test_request_record_serialization() {
    let record = RequestRecord::new("req-1", "user-1", None, json!({"summaries": []}), None);
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["request_id"], "req-1");
    assert!(value.get("query").is_none());
    assert!(value.get("error").is_none());
    assert!(value["timestamp"].is_string());

    let record = RequestRecord::new(
        "req-2",
        "user-1",
        Some("backend engineer"),
        json!({}),
        Some("all files failed".to_string()),
    );
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["query"], "backend engineer");
    assert_eq!(value["error"], "all files failed");
}
