use thiserror::Error;

use crate::types::SkippedRow;

/// Errors returned by the ESL API client.
#[derive(Debug, Error)]
pub enum EslError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint was unreachable, refused the credentials, or
    /// answered without an `access_token`.
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid ESL base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Why a single spreadsheet row could not become an update record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("missing required value in column '{column}'")]
    MissingCell { column: &'static str },

    #[error("column '{column}' value '{value}' is not a number")]
    InvalidPrice { column: &'static str, value: String },

    #[error("price {value} is out of range for tax adjustment")]
    PriceOutOfRange { value: String },
}

/// Errors reading an uploaded workbook into rows.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook contains no worksheets")]
    NoWorksheet,

    #[error("no header row found at spreadsheet row {row}")]
    MissingHeader { row: usize },
}

/// Run-fatal pipeline outcomes. Row- and batch-level failures never surface
/// here; they are recorded in the report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no valid items found to update ({rows_attempted} rows read, all skipped)")]
    NoValidRecords {
        rows_attempted: usize,
        skipped_rows: Vec<SkippedRow>,
    },

    #[error("ESL authentication failed: {0}")]
    Authentication(#[source] EslError),
}
