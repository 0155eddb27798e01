//! Spreadsheet-to-ESL sync pipeline.
//!
//! Reads a retail merchandising export, normalizes each row into a
//! price/inventory update, and pushes the updates to the ESL management API
//! in batches under a single bearer token per run.

pub mod batch;
pub mod client;
pub mod columns;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod sheet;
pub mod types;

pub use batch::{build_batches, Batch};
pub use client::EslClient;
pub use columns::{resolve_stock_column, ColumnLayout};
pub use error::{EslError, PipelineError, RowError, SheetError};
pub use normalize::{normalize_row, normalize_rows, DerivationMode, NormalizedRows};
pub use pipeline::{run_pipeline, run_pipeline_at};
pub use sheet::{read_workbook, RawRow, Sheet};
pub use types::{PipelineReport, ResponseBody, SkippedRow, SubmissionResult};
