use std::time::Instant;

use axum::{
    extract::{Multipart, State},
    response::Json,
};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::models::{ProcessResponse, UploadedFile};

/// `POST /process-resumes`: multipart submission with `request_id`,
/// `user_id`, an optional `query` and one or more `files` parts. The
/// response shape follows the query: absent or blank selects per-file
/// summaries, present selects a single best-match judgment.
pub async fn process_resumes_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ProcessResponse>> {
    let start = Instant::now();

    let mut request_id: Option<String> = None;
    let mut user_id: Option<String> = None;
    let mut query: Option<String> = None;
    let mut files: Vec<UploadedFile> = Vec::new();
    let mut saw_files_field = false;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "request_id" => request_id = Some(field.text().await?),
            "user_id" => user_id = Some(field.text().await?),
            "query" => query = Some(field.text().await?),
            "files" => {
                saw_files_field = true;
                let file_name = field.file_name().map(str::to_string);
                let media_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;

                // Browsers send one empty part for an unselected file input;
                // that counts as "no files", not as a nameless upload.
                if file_name.as_deref().map_or(true, str::is_empty) && data.is_empty() {
                    debug!("Skipping empty files part");
                    continue;
                }

                files.push(UploadedFile::new(file_name, media_type, data));
            }
            other => debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let request_id = request_id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::missing_field("request_id"))?;
    let user_id = user_id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::missing_field("user_id"))?;
    if !saw_files_field {
        return Err(AppError::missing_field("files"));
    }

    info!(
        request_id = %request_id,
        user_id = %user_id,
        file_count = files.len(),
        has_query = query.is_some(),
        "Processing resume batch"
    );

    let response = state
        .pipeline
        .process(&request_id, &user_id, query.as_deref(), files)
        .await?;

    info!(
        request_id = %request_id,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    Ok(Json(response))
}
