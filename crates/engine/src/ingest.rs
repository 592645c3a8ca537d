//! Bulk ingestion accounting
//!
//! Folds the store's per-row bulk report into the outcome callers see.
//! Row failures are expected operating conditions, not errors: a batch
//! where every row bounces still succeeds with a zero success count.
//! The hard `IngestionFailed` error is reserved for the store refusing
//! the batch as a whole.
//!
//! Success counts come from the store's own write report, never from
//! `batch length - failures`, so rows the store skipped without an
//! error entry are not miscounted as written.

use roster_core::{Document, RosterError, RosterResult};
use roster_store::RecordStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Counts reported after a bulk ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    /// Rows the store reported as written
    pub success_count: u64,
    /// Rows rejected individually
    pub failed_count: u64,
}

/// Submit a batch and fold the store's report into an outcome
///
/// An empty batch is a valid no-op and reports zero counts.
///
/// # Errors
/// `IngestionFailed` when the store could not attempt the batch at
/// all.
pub fn submit(store: &dyn RecordStore, batch: Vec<Document>) -> RosterResult<IngestOutcome> {
    let submitted = batch.len();
    let report = store
        .bulk_insert_unordered(batch)
        .map_err(|e| RosterError::IngestionFailed(e.to_string()))?;

    let outcome = IngestOutcome {
        success_count: report.inserted_count as u64,
        failed_count: report.errors.len() as u64,
    };
    if outcome.failed_count > 0 {
        warn!(
            target: "roster::ingest",
            submitted,
            success = outcome.success_count,
            failed = outcome.failed_count,
            "batch partially rejected"
        );
    } else {
        info!(
            target: "roster::ingest",
            submitted,
            success = outcome.success_count,
            "batch ingested"
        );
    }
    Ok(outcome)
}
