//! Roster service facade
//!
//! ## Design: STATELESS FACADE
//!
//! [`Roster`] holds only an `Arc<dyn RecordStore>` and the planner
//! options. No internal state, no caches, no locks; all data lives in
//! the store. Instances are cheap to clone and safe to share across
//! threads, and multiple facades over one store are safe.
//!
//! ## Operation shape
//!
//! Every operation validates its payload first, then talks to the
//! store, then materializes documents into [`Record`]s. Update and
//! delete target live records only: the store filter carries the
//! soft-delete guard, so a deleted record answers with `NotFound`
//! exactly like a record that never existed.

use std::io::Read;
use std::sync::Arc;

use roster_core::{
    keys, validate_draft, validate_patch, Document, Filter, Page, QueryRequest, Record,
    RecordDraft, RecordId, RecordPatch, RosterError, RosterResult,
};
use roster_store::RecordStore;
use serde_json::Value;
use tracing::info;

use crate::config::RosterConfig;
use crate::ingest::{self, IngestOutcome};
use crate::plan::{self, PlanOptions};
use crate::{executor, upload};

/// Service entry point for managing records
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use roster_engine::service::Roster;
/// use roster_core::{QueryRequest, RecordDraft};
/// use roster_store::MemoryStore;
///
/// let roster = Roster::new(Arc::new(MemoryStore::new()));
/// let record = roster
///     .create(&RecordDraft {
///         email: "ada@example.com".to_string(),
///         first_name: "Ada".to_string(),
///         last_name: "Lovelace".to_string(),
///         phone: "+4455512345".to_string(),
///         birth_date: "1815-12-10".parse().unwrap(),
///         marketing_source: None,
///         status: None,
///     })
///     .unwrap();
///
/// let page = roster.list(&QueryRequest::default()).unwrap();
/// assert_eq!(page.data[0].id, record.id);
/// ```
#[derive(Clone)]
pub struct Roster {
    store: Arc<dyn RecordStore>,
    options: PlanOptions,
}

impl Roster {
    /// Create a facade over a store with default planner options
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            options: PlanOptions::default(),
        }
    }

    /// Create a facade applying the policy from a loaded config
    pub fn with_config(store: Arc<dyn RecordStore>, config: &RosterConfig) -> Self {
        Self {
            store,
            options: PlanOptions {
                max_limit: config.max_query_limit,
            },
        }
    }

    /// The underlying store
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Create a record from a draft
    ///
    /// # Errors
    /// - `Validation` when a draft field fails its rule
    /// - `DuplicateKey` when the email is already taken, soft-deleted
    ///   records included
    pub fn create(&self, draft: &RecordDraft) -> RosterResult<Record> {
        validate_draft(draft)?;

        let mut probe = Filter::new();
        probe.insert(keys::EMAIL.to_string(), Value::String(draft.email.clone()));
        if self.store.find_one(&probe)?.is_some() {
            return Err(RosterError::DuplicateKey);
        }
        // The probe and the write are separate store calls; a racing
        // create lands on the unique index instead.
        let stored = self.store.insert(draft.to_document())?;

        let record = Record::from_document(stored)?;
        info!(target: "roster::service", id = %record.id, "created record");
        Ok(record)
    }

    /// List live records as one result page
    ///
    /// Deleted records never appear, regardless of the request filter.
    ///
    /// # Errors
    /// `Validation` when the request's paging or sorting knobs are out
    /// of range.
    pub fn list(&self, request: &QueryRequest) -> RosterResult<Page<Record>> {
        let plan = plan::build(request, &self.options)?;
        executor::execute(self.store.as_ref(), &plan)
    }

    /// Apply a partial update to a live record
    ///
    /// # Errors
    /// - `Validation` when the id is malformed or a patch field fails
    ///   its rule
    /// - `NotFound` when no live record has this id
    /// - `DuplicateKey` when the patch changes email to a taken one
    pub fn update(&self, id: &str, patch: &RecordPatch) -> RosterResult<Record> {
        let record_id = parse_id(id)?;
        validate_patch(patch)?;

        let updated = self
            .store
            .find_and_update(&live_target(record_id), &patch.to_document())?
            .ok_or(RosterError::NotFound)?;

        let record = Record::from_document(updated)?;
        info!(target: "roster::service", id = %record.id, "updated record");
        Ok(record)
    }

    /// Soft-delete a live record
    ///
    /// The record keeps its data and its claim on the email address;
    /// it only stops being visible to queries and updates.
    ///
    /// # Errors
    /// - `Validation` when the id is malformed
    /// - `NotFound` when no live record has this id
    pub fn delete(&self, id: &str) -> RosterResult<Record> {
        let record_id = parse_id(id)?;

        let mut tombstone = Document::new();
        tombstone.insert(keys::IS_DELETED.to_string(), Value::Bool(true));
        let deleted = self
            .store
            .find_and_update(&live_target(record_id), &tombstone)?
            .ok_or(RosterError::NotFound)?;

        let record = Record::from_document(deleted)?;
        info!(target: "roster::service", id = %record.id, "soft-deleted record");
        Ok(record)
    }

    /// Ingest a batch of candidate documents
    ///
    /// # Errors
    /// `IngestionFailed` when the store refuses the batch as a whole;
    /// per-row failures are part of the outcome, not errors.
    pub fn ingest(&self, batch: Vec<Document>) -> RosterResult<IngestOutcome> {
        ingest::submit(self.store.as_ref(), batch)
    }

    /// Ingest records from a CSV stream
    ///
    /// # Errors
    /// - `Validation` when the stream is not parseable CSV
    /// - `IngestionFailed` when the store refuses the batch
    pub fn ingest_csv<R: Read>(&self, reader: R) -> RosterResult<IngestOutcome> {
        let batch = upload::read_batch(reader)?;
        ingest::submit(self.store.as_ref(), batch)
    }
}

fn parse_id(raw: &str) -> RosterResult<RecordId> {
    RecordId::from_string(raw)
        .ok_or_else(|| RosterError::validation(format!("Invalid record id '{}'", raw)))
}

/// Target filter for one live record
fn live_target(id: RecordId) -> Filter {
    let mut target = Filter::new();
    target.insert(keys::ID.to_string(), Value::String(id.to_string()));
    target.insert(keys::IS_DELETED.to_string(), Value::Bool(false));
    target
}
