//! CSV upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result, INGESTION_RETRY_MESSAGE};
use crate::server::state::{AppState, UploadGuard};
use crate::types::{IngestResponse, UploadStatus};

/// POST /api/customers/upload - Upload a CSV file and replace all customers
///
/// Expects a multipart field named `file`; the first field carrying a filename
/// is accepted as well.
pub async fn upload_customers(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.csv".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read file: {}", e)))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| Error::bad_request("No CSV file in upload (expected field `file`)"))?;
    let content = String::from_utf8(data.to_vec())
        .map_err(|_| Error::bad_request(format!("'{}' is not UTF-8 text", filename)))?;

    let guard = state.begin_upload()?;
    let run_id = Uuid::new_v4();
    tracing::info!("Upload {}: '{}' ({} bytes)", run_id, filename, content.len());

    // Runs detached: the outcome is recorded even if the client disconnects
    let task = tokio::spawn(run_upload(state, guard, run_id, filename, content));
    let report = task
        .await
        .map_err(|e| Error::internal(format!("Upload task failed: {}", e)))??;

    Ok(Json(report))
}

/// Ingest an upload and record the outcome in the shared state
async fn run_upload(
    state: AppState,
    _guard: UploadGuard,
    run_id: Uuid,
    filename: String,
    content: String,
) -> Result<IngestResponse> {
    let start = Instant::now();

    match state.pipeline().ingest(&content).await {
        Ok(outcome) => {
            let report = IngestResponse {
                run_id,
                filename,
                rows: outcome.rows,
                batches: outcome.batches,
                customers_processed: outcome.customers.len(),
                processing_time_ms: start.elapsed().as_millis() as u64,
                completed_at: Utc::now(),
            };
            state.finish_upload(outcome.customers, report.clone());
            tracing::info!(
                "Upload {} completed: {} customers in {}ms",
                run_id,
                report.customers_processed,
                report.processing_time_ms
            );
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Upload {} failed: {}", run_id, e);
            let message = if e.is_remote() {
                INGESTION_RETRY_MESSAGE.to_string()
            } else {
                e.to_string()
            };
            state.fail_upload(message);
            Err(e)
        }
    }
}

/// GET /api/customers/upload/status - State of the last upload
pub async fn upload_status(State(state): State<AppState>) -> Json<UploadStatus> {
    Json(state.upload_status())
}
