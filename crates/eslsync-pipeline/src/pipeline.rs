//! Sync run orchestration.

use chrono::{DateTime, Utc};
use eslsync_core::PipelineSettings;

use crate::batch::build_batches;
use crate::client::EslClient;
use crate::error::PipelineError;
use crate::normalize::normalize_rows;
use crate::sheet::Sheet;
use crate::types::{PipelineReport, SubmissionResult};

/// Run the full sync for one uploaded sheet.
///
/// 1. Normalize every row, skipping and recording rows that fail.
/// 2. Stop with [`PipelineError::NoValidRecords`] if nothing survived; no
///    network call is made.
/// 3. Fetch one bearer token for the whole run.
/// 4. Split records into batches and submit them one after another.
///
/// A batch that fails in transit is recorded in its [`SubmissionResult`] and
/// the remaining batches are still sent.
///
/// # Errors
///
/// Returns [`PipelineError::NoValidRecords`] or
/// [`PipelineError::Authentication`]; nothing else aborts a run.
pub async fn run_pipeline(
    client: &EslClient,
    settings: &PipelineSettings,
    sheet: &Sheet,
) -> Result<PipelineReport, PipelineError> {
    run_pipeline_at(client, settings, sheet, Utc::now()).await
}

/// [`run_pipeline`] with an explicit run start time, which every batch
/// number in the run is derived from.
///
/// # Errors
///
/// Same as [`run_pipeline`].
pub async fn run_pipeline_at(
    client: &EslClient,
    settings: &PipelineSettings,
    sheet: &Sheet,
    started_at: DateTime<Utc>,
) -> Result<PipelineReport, PipelineError> {
    let normalized = normalize_rows(sheet, settings.pricing_mode);
    let rows_attempted = normalized.rows_attempted;

    if normalized.records.is_empty() {
        tracing::warn!(
            rows_attempted,
            skipped = normalized.skipped.len(),
            "no valid records; nothing to send"
        );
        return Err(PipelineError::NoValidRecords {
            rows_attempted,
            skipped_rows: normalized.skipped,
        });
    }

    let token = client.fetch_token().await.map_err(|e| {
        tracing::error!(error = %e, "could not obtain ESL token");
        PipelineError::Authentication(e)
    })?;

    let items_sent = normalized.records.len();
    let batches = build_batches(
        normalized.records,
        settings.batch_size,
        &settings.batch_prefix,
        started_at,
    );
    tracing::info!(
        items = items_sent,
        batches = batches.len(),
        skipped = normalized.skipped.len(),
        "submitting records"
    );

    let mut results = Vec::with_capacity(batches.len());
    for batch in &batches {
        let result = match client.submit_batch(batch, &token).await {
            Ok(result) => {
                tracing::info!(
                    batch_index = batch.index,
                    batch_no = %batch.batch_no,
                    items = batch.records.len(),
                    status = result.status,
                    "batch submitted"
                );
                result
            }
            Err(e) => {
                tracing::warn!(
                    batch_index = batch.index,
                    batch_no = %batch.batch_no,
                    error = %e,
                    "batch submission failed"
                );
                SubmissionResult::transport_failure(batch, &e)
            }
        };
        results.push(result);
    }

    Ok(PipelineReport {
        results,
        items_sent,
        rows_attempted,
        skipped_rows: normalized.skipped,
    })
}
