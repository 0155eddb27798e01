use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Extension, Json,
};
use eslsync_pipeline::{
    read_workbook, run_pipeline, PipelineError, SkippedRow, SubmissionResult,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ConvertResponse {
    status: u16,
    result: Vec<SubmissionResult>,
    items_sent: usize,
    rows_attempted: usize,
    skipped_rows: Vec<SkippedRow>,
    meta: ResponseMeta,
}

/// `POST /convert`: run an uploaded workbook through the sync pipeline.
pub(super) async fn convert_upload(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Multipart,
) -> Result<Json<ConvertResponse>, ApiError> {
    let (filename, bytes) = read_upload(multipart)
        .await
        .map_err(|message| ApiError::new(req_id.0.clone(), "bad_request", message))?;

    let skip_rows = state.pipeline.sheet_skip_rows;
    let sheet = tokio::task::spawn_blocking(move || read_workbook(&bytes, skip_rows))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "workbook reader task failed");
            ApiError::new(req_id.0.clone(), "internal_error", "internal server error")
        })?
        .map_err(|e| {
            tracing::warn!(filename = %filename, error = %e, "unreadable upload");
            ApiError::new(req_id.0.clone(), "bad_request", e.to_string())
        })?;

    tracing::info!(
        filename = %filename,
        rows = sheet.rows().len(),
        request_id = %req_id.0,
        "processing upload"
    );

    let report = run_pipeline(&state.client, &state.pipeline, &sheet)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ConvertResponse {
        status: report.overall_status(),
        result: report.results,
        items_sent: report.items_sent,
        rows_attempted: report.rows_attempted,
        skipped_rows: report.skipped_rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Pull the `file` field out of the multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<(String, Bytes), String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("malformed multipart body: {e}"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().trim().to_owned();
        if filename.is_empty() {
            return Err("Empty filename".to_owned());
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("could not read upload: {e}"))?;
        return Ok((filename, bytes));
    }
    Err("No file uploaded".to_owned())
}

fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    match error {
        PipelineError::NoValidRecords { .. } => {
            ApiError::new(request_id, "bad_request", error.to_string())
        }
        PipelineError::Authentication(_) => {
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
    }
}
