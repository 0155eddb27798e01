use serde::Serialize;

use crate::batch::Batch;
use crate::error::EslError;

/// Body of an integration-endpoint response.
///
/// The API's response schema is opaque here; anything that parses as JSON is
/// kept verbatim and anything else is kept as raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Undecodable { decode_error: String, raw: String },
}

/// Outcome of submitting one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResult {
    pub batch_index: usize,
    pub batch_no: String,
    pub item_count: usize,
    /// HTTP status, or `None` when the request never got a response.
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseBody>,
    /// Transport failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    /// Result for a batch whose request failed before any response arrived.
    #[must_use]
    pub fn transport_failure(batch: &Batch, error: &EslError) -> Self {
        Self {
            batch_index: batch.index,
            batch_no: batch.batch_no.clone(),
            item_count: batch.records.len(),
            status: None,
            response: None,
            error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status.is_some_and(|s| (200..300).contains(&s))
    }
}

/// A spreadsheet row that was dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based spreadsheet line.
    pub row: usize,
    pub reason: String,
}

/// Everything a pipeline run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub results: Vec<SubmissionResult>,
    pub items_sent: usize,
    pub rows_attempted: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

impl PipelineReport {
    /// Single status summarizing the run for transport callers.
    ///
    /// The first failing batch decides: its upstream status if it got one,
    /// `502` if it failed in transit. With no failures it is the first
    /// batch's status.
    #[must_use]
    pub fn overall_status(&self) -> u16 {
        let first_failure = self.results.iter().find(|r| !r.is_success());
        match first_failure {
            Some(result) => result.status.unwrap_or(502),
            None => self
                .results
                .first()
                .and_then(|r| r.status)
                .unwrap_or(200),
        }
    }

    #[must_use]
    pub fn failed_batches(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }
}
