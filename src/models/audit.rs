use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One audit entry per processed request. `request_id` is caller-supplied;
/// uniqueness is not enforced. Records are append-only and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    pub request_id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestRecord {
    /// Build a record stamped with the current UTC time.
    pub fn new(
        request_id: &str,
        user_id: &str,
        query: Option<&str>,
        result: Value,
        error: Option<String>,
    ) -> Self {
        Self {
            request_id: request_id.to_string(),
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            query: query.map(str::to_string),
            result,
            error,
        }
    }
}
