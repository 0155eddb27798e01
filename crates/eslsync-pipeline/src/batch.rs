//! Partitioning of normalized records into API-sized batches.

use chrono::{DateTime, Utc};
use eslsync_core::{PipelineSettings, UpdateRecord};

/// One integration call's worth of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// 1-based position within the run.
    pub index: usize,
    pub batch_no: String,
    pub records: Vec<UpdateRecord>,
}

/// Builds the batch number, e.g. `batch-a1-20261018093000-2`.
///
/// `started_at` is the run's start time, shared by every batch in the run.
#[must_use]
pub fn batch_number(prefix: &str, started_at: DateTime<Utc>, index: usize) -> String {
    format!("{prefix}-{}-{index}", started_at.format("%Y%m%d%H%M%S"))
}

/// Splits `records` into contiguous batches of at most `batch_size`,
/// preserving order. `batch_size` is clamped to the API's 1000-item limit.
///
/// An empty input produces no batches.
#[must_use]
pub fn build_batches(
    records: Vec<UpdateRecord>,
    batch_size: usize,
    prefix: &str,
    started_at: DateTime<Utc>,
) -> Vec<Batch> {
    let size = batch_size.clamp(1, PipelineSettings::MAX_BATCH_SIZE);
    let mut batches = Vec::with_capacity(records.len().div_ceil(size));
    let mut remaining = records.into_iter().peekable();

    while remaining.peek().is_some() {
        let index = batches.len() + 1;
        let chunk: Vec<UpdateRecord> = remaining.by_ref().take(size).collect();
        batches.push(Batch {
            index,
            batch_no: batch_number(prefix, started_at, index),
            records: chunk,
        });
    }

    batches
}
