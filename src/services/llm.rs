//! Summarization and matching over an Ollama-compatible HTTP runtime.
//!
//! Both clients issue plain `/api/generate` requests; prompt assembly and
//! output shaping live here so the pipeline only sees typed results.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{ExtractionResult, MatchOutcome};

/// Upper bound on prompt text taken from a single resume in summarize mode.
const MAX_SUMMARY_INPUT_CHARS: usize = 6000;
/// Per-resume preview length inside the matching prompt.
const MATCH_PREVIEW_CHARS: usize = 1500;

/// Produces a bounded abstractive summary for one resume text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> AppResult<String>;
}

/// Judges the best-fitting resume(s) for a job-requirement query.
#[async_trait]
pub trait Matcher: Send + Sync {
    async fn find_best_match(
        &self,
        query: &str,
        resumes: &[ExtractionResult],
    ) -> AppResult<MatchOutcome>;
}

/// Thin wrapper over one model on an Ollama-style endpoint.
#[derive(Debug, Clone)]
struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    fn new(base_url: &str, model: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("resume-triage/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    async fn generate(&self, prompt: String) -> AppResult<String> {
        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Dispatching generation request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await
            .map_err(|e| AppError::llm(format!("Model endpoint unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::llm(format!(
                "Model endpoint returned {}: {}",
                status,
                body.trim()
            )));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::llm(format!("Malformed model response: {}", e)))?;

        Ok(payload.response.trim().to_string())
    }
}

/// Summarizer backed by a dedicated summarization model.
pub struct OllamaSummarizer {
    client: OllamaClient,
}

impl OllamaSummarizer {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: OllamaClient::new(base_url, model, timeout)?,
        })
    }

    fn build_prompt(text: &str) -> String {
        format!(
            "Summarize the following resume in at most 400 words. Keep the \
             candidate's key skills, work experience and education. Respond \
             with the summary only.\n\nRESUME:\n{}",
            truncate_chars(text, MAX_SUMMARY_INPUT_CHARS)
        )
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, text: &str) -> AppResult<String> {
        let summary = self.client.generate(Self::build_prompt(text)).await?;
        if summary.is_empty() {
            return Err(AppError::llm("Model returned an empty summary".to_string()));
        }
        Ok(summary)
    }
}

/// Matcher backed by an instruction-tuned model, shaping free-form output
/// into a [`MatchOutcome`].
pub struct OllamaMatcher {
    client: OllamaClient,
}

impl OllamaMatcher {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: OllamaClient::new(base_url, model, timeout)?,
        })
    }

    fn build_prompt(query: &str, resumes: &[ExtractionResult]) -> String {
        let mut prompt = String::from(
            "Analyze the following resumes against the JOB REQUIREMENTS below.\n\n",
        );
        prompt.push_str(&format!("JOB REQUIREMENTS: {}\n\n", query));
        prompt.push_str("RESUMES UNDER ANALYSIS:\n");

        for (i, resume) in resumes.iter().enumerate() {
            prompt.push_str(&format!(
                "--- RESUME {} (file: {}) ---\n",
                i + 1,
                resume.file_name
            ));
            let preview = truncate_chars(&resume.extracted_text, MATCH_PREVIEW_CHARS);
            prompt.push_str(preview);
            if preview.len() < resume.extracted_text.len() {
                prompt.push_str("...");
            }
            prompt.push_str("\n\n");
        }

        prompt.push_str(
            "Task:\n\
             1. Identify which of the resumes above best fits the job requirements.\n\
             2. Give a clear, detailed justification grounded in the resume contents.\n\
             Respond with a single JSON object of the form \
             {\"file_name\": \"...\", \"justification\": \"...\"} and nothing else.\n",
        );
        prompt
    }
}

#[async_trait]
impl Matcher for OllamaMatcher {
    async fn find_best_match(
        &self,
        query: &str,
        resumes: &[ExtractionResult],
    ) -> AppResult<MatchOutcome> {
        let raw = self
            .client
            .generate(Self::build_prompt(query, resumes))
            .await?;
        Ok(normalize_match_output(&raw))
    }
}

/// Shape free-form model output into a [`MatchOutcome`]: a JSON object with
/// both expected fields passes through structured, other valid JSON becomes
/// the fixed "unexpected output" sentinel, and plain text is preserved raw.
pub(crate) fn normalize_match_output(raw: &str) -> MatchOutcome {
    let trimmed = strip_code_fence(raw.trim());

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            let file_name = map.get("file_name").and_then(Value::as_str);
            let justification = map.get("justification").and_then(Value::as_str);
            match (file_name, justification) {
                (Some(file_name), Some(justification)) => {
                    MatchOutcome::structured(file_name, justification)
                }
                _ => MatchOutcome::unexpected_output(),
            }
        }
        Ok(Value::String(text)) => MatchOutcome::Raw(text),
        Ok(_) => MatchOutcome::unexpected_output(),
        Err(_) => MatchOutcome::Raw(trimmed.to_string()),
    }
}

/// Instruction-tuned models often wrap JSON answers in markdown fences.
fn strip_code_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Truncate on a char boundary so prompts never split a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
