use serde::{Deserialize, Serialize};

use crate::models::request::ProcessingError;

/// One generated summary, or a synthesized failure message for a file that
/// could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub file_name: String,
    pub summary: String,
}

impl ResumeSummary {
    pub fn new(file_name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            summary: summary.into(),
        }
    }
}

/// Result of match mode. The matching model either produces output we can
/// shape into a file-name/justification pair, or free text we pass through
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchOutcome {
    Structured {
        file_name: String,
        justification: String,
    },
    Raw(String),
}

impl MatchOutcome {
    pub fn structured(file_name: impl Into<String>, justification: impl Into<String>) -> Self {
        MatchOutcome::Structured {
            file_name: file_name.into(),
            justification: justification.into(),
        }
    }

    /// Sentinel returned when no uploaded file yielded usable text.
    pub fn no_valid_resumes() -> Self {
        Self::structured(
            "No valid resumes to analyze",
            "No text could be extracted from the provided files.",
        )
    }

    /// Sentinel substituted when the model output has an unrecognized shape.
    pub fn unexpected_output() -> Self {
        Self::structured(
            "Unexpected model output",
            "The matching model returned output in an unrecognized shape.",
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub request_id: String,
    pub summaries: Vec<ResumeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_errors: Option<Vec<ProcessingError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub request_id: String,
    pub best_match: MatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_errors: Option<Vec<ProcessingError>>,
}

/// The two response shapes of `POST /process-resumes`, selected by whether a
/// query was supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessResponse {
    Match(MatchResponse),
    Summary(SummaryResponse),
}

impl ProcessResponse {
    pub fn request_id(&self) -> &str {
        match self {
            ProcessResponse::Match(r) => &r.request_id,
            ProcessResponse::Summary(r) => &r.request_id,
        }
    }
}
