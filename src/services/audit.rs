use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, error};

use crate::models::RequestRecord;

/// Append-only audit sink. Persistence failures must never propagate to the
/// caller; implementations report them on their own log stream.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, record: RequestRecord);
}

/// File-backed audit log writing one JSON object per line.
pub struct JsonlAuditLog {
    path: PathBuf,
}

impl JsonlAuditLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn append(&self, record: &RequestRecord) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for JsonlAuditLog {
    async fn record(&self, record: RequestRecord) {
        match self.append(&record) {
            Ok(()) => debug!(
                request_id = %record.request_id,
                path = %self.path.display(),
                "Audit record persisted"
            ),
            Err(e) => error!(
                request_id = %record.request_id,
                path = %self.path.display(),
                error = %e,
                "Failed to persist audit record"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_are_appended_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage_logs.jsonl");
        let log = JsonlAuditLog::new(&path);

        log.record(RequestRecord::new(
            "req-1",
            "user-1",
            None,
            json!({"summaries": []}),
            None,
        ))
        .await;
        log.record(RequestRecord::new(
            "req-2",
            "user-1",
            Some("backend engineer"),
            json!({"best_match": "cv1.pdf"}),
            Some("all files failed".to_string()),
        ))
        .await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: RequestRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.request_id, "req-1");
        assert!(first.error.is_none());

        let second: RequestRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.query.as_deref(), Some("backend engineer"));
        assert_eq!(second.error.as_deref(), Some("all files failed"));
    }

    #[tokio::test]
    async fn write_failures_are_swallowed() {
        // Directory path as target file: the append fails, record() must not panic.
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlAuditLog::new(dir.path());

        log.record(RequestRecord::new("req-1", "user-1", None, json!({}), None))
            .await;
    }
}
