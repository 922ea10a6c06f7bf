//! Request orchestration: per-file validation and extraction, partial-failure
//! accounting, mode selection, response assembly and audit logging.

use serde_json::json;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{
    ExtractionResult, MatchOutcome, MatchResponse, ProcessResponse, ProcessingError,
    RequestRecord, ResumeSummary, SummaryResponse, UploadedFile,
};
use crate::services::{AuditLog, Matcher, Summarizer, TextExtractor};

/// Orchestrates one batch request end to end. Collaborators are injected at
/// startup and shared across requests; no per-request state is retained.
pub struct RequestPipeline {
    extractor: Box<dyn TextExtractor>,
    summarizer: Box<dyn Summarizer>,
    matcher: Box<dyn Matcher>,
    audit: Box<dyn AuditLog>,
}

impl RequestPipeline {
    pub fn new(
        extractor: Box<dyn TextExtractor>,
        summarizer: Box<dyn Summarizer>,
        matcher: Box<dyn Matcher>,
        audit: Box<dyn AuditLog>,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            matcher,
            audit,
        }
    }

    /// Process one submission. Files are handled sequentially in submission
    /// order; a failing file degrades to an error entry instead of aborting
    /// the request. Only an empty file list and total extraction failure
    /// escalate to non-200 responses.
    pub async fn process(
        &self,
        request_id: &str,
        user_id: &str,
        query: Option<&str>,
        files: Vec<UploadedFile>,
    ) -> AppResult<ProcessResponse> {
        // Nothing was gathered yet, so this is the one failure that writes
        // no audit record.
        if files.is_empty() {
            return Err(AppError::EmptyFileList);
        }

        let (extractions, errors) = self.extract_all(&files).await;

        let any_text = extractions.iter().any(ExtractionResult::has_text);
        if !any_text && !errors.is_empty() {
            let detail = errors
                .iter()
                .map(|e| format!("{}: {}", e.file_name, e.error))
                .collect::<Vec<_>>()
                .join("; ");
            warn!(request_id = %request_id, detail = %detail, "All uploaded files failed");

            self.audit
                .record(RequestRecord::new(
                    request_id,
                    user_id,
                    query,
                    json!({
                        "message": "Failed to process all files.",
                        "errors": &errors,
                    }),
                    Some(format!("All uploaded files failed processing: {}", detail)),
                ))
                .await;
            return Err(AppError::AllFilesFailed { detail });
        }

        let valid: Vec<ExtractionResult> = extractions
            .iter()
            .filter(|r| r.has_text())
            .cloned()
            .collect();

        // An empty or whitespace-only query selects summarize mode.
        let effective_query = query.map(str::trim).filter(|q| !q.is_empty());

        let (response, log_result) = match effective_query {
            Some(q) => {
                let best_match = self.run_match_mode(q, &valid).await;
                let response = MatchResponse {
                    request_id: request_id.to_string(),
                    best_match,
                    processing_errors: if errors.is_empty() {
                        None
                    } else {
                        Some(errors.clone())
                    },
                };
                let log_result = json!({
                    "best_match": &response.best_match,
                    "processing_errors": &response.processing_errors,
                });
                (ProcessResponse::Match(response), log_result)
            }
            None => {
                let summaries = self.run_summarize_mode(&valid, &errors).await;
                let response = SummaryResponse {
                    request_id: request_id.to_string(),
                    summaries,
                    processing_errors: if errors.is_empty() {
                        None
                    } else {
                        Some(errors.clone())
                    },
                };
                let log_result = json!({
                    "summaries": &response.summaries,
                    "processing_errors": &response.processing_errors,
                });
                (ProcessResponse::Summary(response), log_result)
            }
        };

        self.audit
            .record(RequestRecord::new(
                request_id, user_id, query, log_result, None,
            ))
            .await;

        info!(
            request_id = %request_id,
            files = files.len(),
            errors = errors.len(),
            "Request processed"
        );
        Ok(response)
    }

    /// Validate and extract each file sequentially, preserving submission
    /// order in both output sequences.
    async fn extract_all(
        &self,
        files: &[UploadedFile],
    ) -> (Vec<ExtractionResult>, Vec<ProcessingError>) {
        let mut extractions = Vec::new();
        let mut errors = Vec::new();

        for file in files {
            let Some(file_name) = file.file_name() else {
                errors.push(ProcessingError::new("unknown", "File has no name."));
                continue;
            };

            if !file.is_supported_type() {
                let media_type = file.media_type();
                errors.push(ProcessingError::new(
                    file_name,
                    format!(
                        "Unsupported media type: {}",
                        if media_type.is_empty() { "unknown" } else { media_type }
                    ),
                ));
                continue;
            }

            match self.extractor.extract(file).await {
                Ok(text) if text.trim().is_empty() => {
                    errors.push(ProcessingError::new(
                        file_name,
                        "Extraction produced no text or the file is empty.",
                    ));
                    extractions.push(ExtractionResult {
                        file_name: file_name.to_string(),
                        extracted_text: String::new(),
                        media_type: file.media_type().to_string(),
                        extraction_error: None,
                    });
                }
                Ok(text) => {
                    extractions.push(ExtractionResult {
                        file_name: file_name.to_string(),
                        extracted_text: text,
                        media_type: file.media_type().to_string(),
                        extraction_error: None,
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    error!(file_name = file_name, error = %message, "File extraction failed");
                    errors.push(ProcessingError::new(
                        file_name,
                        format!("Failed to process file: {}", message),
                    ));
                    extractions.push(ExtractionResult {
                        file_name: file_name.to_string(),
                        extracted_text: String::new(),
                        media_type: file.media_type().to_string(),
                        extraction_error: Some(message),
                    });
                }
            }
        }

        (extractions, errors)
    }

    /// Match mode: at most one matcher call per request. Matcher failures
    /// degrade to a fixed structured sentinel instead of aborting.
    async fn run_match_mode(&self, query: &str, valid: &[ExtractionResult]) -> MatchOutcome {
        if valid.is_empty() {
            return MatchOutcome::no_valid_resumes();
        }

        match self.matcher.find_best_match(query, valid).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Matcher invocation failed");
                MatchOutcome::structured(
                    "Matching failed",
                    format!("The matching model raised an error: {}", e),
                )
            }
        }
    }

    /// Summarize mode: one summary per valid file in submission order, then
    /// one failure placeholder per error whose file name is not already in
    /// the list, in the order the errors were recorded.
    async fn run_summarize_mode(
        &self,
        valid: &[ExtractionResult],
        errors: &[ProcessingError],
    ) -> Vec<ResumeSummary> {
        let mut summaries = Vec::new();

        if valid.is_empty() {
            summaries.push(ResumeSummary::new(
                "No valid resumes",
                "No text could be extracted from the provided files.",
            ));
        } else {
            for item in valid {
                let summary = match self.summarizer.summarize(&item.extracted_text).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        error!(file_name = %item.file_name, error = %e, "Summarization failed");
                        format!("Failed to generate summary: {}", e)
                    }
                };
                summaries.push(ResumeSummary::new(item.file_name.clone(), summary));
            }
        }

        for err in errors {
            if !summaries.iter().any(|s| s.file_name == err.file_name) {
                summaries.push(ResumeSummary::new(
                    err.file_name.clone(),
                    format!("Processing failed: {}", err.error),
                ));
            }
        }

        summaries
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;

    struct EmptyExtractor;

    #[async_trait]
    impl TextExtractor for EmptyExtractor {
        async fn extract(&self, _file: &UploadedFile) -> AppResult<String> {
            Ok(String::new())
        }
    }

    struct UnusedSummarizer;

    #[async_trait]
    impl Summarizer for UnusedSummarizer {
        async fn summarize(&self, _text: &str) -> AppResult<String> {
            panic!("summarizer must not be invoked");
        }
    }

    struct CountingMatcher(Arc<AtomicUsize>);

    #[async_trait]
    impl Matcher for CountingMatcher {
        async fn find_best_match(
            &self,
            _query: &str,
            _resumes: &[ExtractionResult],
        ) -> AppResult<MatchOutcome> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(MatchOutcome::Raw("should not be reached".to_string()))
        }
    }

    struct NullAudit;

    #[async_trait]
    impl AuditLog for NullAudit {
        async fn record(&self, _record: RequestRecord) {}
    }

    fn pipeline_with_matcher(calls: Arc<AtomicUsize>) -> RequestPipeline {
        RequestPipeline::new(
            Box::new(EmptyExtractor),
            Box::new(UnusedSummarizer),
            Box::new(CountingMatcher(calls)),
            Box::new(NullAudit),
        )
    }

    #[tokio::test]
    async fn match_mode_without_valid_text_uses_sentinel_and_skips_matcher() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with_matcher(calls.clone());

        let outcome = pipeline.run_match_mode("Rust engineer", &[]).await;
        assert_eq!(outcome, MatchOutcome::no_valid_resumes());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn match_mode_with_valid_text_invokes_matcher_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with_matcher(calls.clone());

        let valid = vec![ExtractionResult {
            file_name: "cv.pdf".to_string(),
            extracted_text: "Rust since 2015.".to_string(),
            media_type: "application/pdf".to_string(),
            extraction_error: None,
        }];
        pipeline.run_match_mode("Rust engineer", &valid).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
