//! In-memory record store
//!
//! ## Design
//!
//! A single `RwLock` guards all state. Documents live in a `BTreeMap`
//! keyed by an insertion sequence number, so iterating the map in key
//! order IS natural order. Secondary structures keep point lookups off
//! the scan path:
//!
//! - id and email indices: `FxHashMap` to the owning sequence
//! - status index: a bucket of sequences per status value
//!
//! The email index is the uniqueness guard. Entries are never removed
//! on soft delete, only on an explicit email change, so an address
//! stays taken for as long as any record ever held it.
//!
//! ## Concurrency
//!
//! Writers serialize on the lock; the uniqueness probe and the write
//! happen under the same guard, so two racing inserts of one email
//! cannot both win. Readers share the lock and return clones.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use roster_core::{keys, Document, Filter, RecordId, RosterError, RosterResult};
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

use crate::adapter::{matches, BulkReport, RecordStore, WriteError, WriteErrorKind};
use crate::schema;

/// Secondary index: status value → owning sequences
///
/// Buckets are `BTreeSet`s, so iterating a bucket yields the same
/// ascending-sequence order as a full scan. Empty buckets are removed
/// eagerly.
#[derive(Debug, Default)]
struct StatusIndex {
    buckets: FxHashMap<String, BTreeSet<u64>>,
}

impl StatusIndex {
    fn insert(&mut self, status: &str, seq: u64) {
        self.buckets.entry(status.to_string()).or_default().insert(seq);
    }

    fn remove(&mut self, status: &str, seq: u64) {
        if let Some(bucket) = self.buckets.get_mut(status) {
            bucket.remove(&seq);
            if bucket.is_empty() {
                self.buckets.remove(status);
            }
        }
    }

    fn get(&self, status: &str) -> Option<&BTreeSet<u64>> {
        self.buckets.get(status)
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    documents: BTreeMap<u64, Document>,
    id_index: FxHashMap<String, u64>,
    email_index: FxHashMap<String, u64>,
    status_index: StatusIndex,
}

/// Rejection of a single candidate during a guarded write
enum Reject {
    Schema(String),
    Duplicate(String),
}

/// In-memory [`RecordStore`] implementation
///
/// # Example
///
/// ```rust
/// use roster_store::{MemoryStore, RecordStore};
/// use roster_core::{keys, Document};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// let mut candidate = Document::new();
/// candidate.insert(keys::EMAIL.to_string(), json!("ada@example.com"));
/// candidate.insert(keys::FIRST_NAME.to_string(), json!("Ada"));
/// candidate.insert(keys::LAST_NAME.to_string(), json!("Lovelace"));
/// candidate.insert(keys::PHONE.to_string(), json!("+4455512345"));
/// candidate.insert(keys::BIRTH_DATE.to_string(), json!("1815-12-10"));
///
/// let stored = store.insert(candidate).unwrap();
/// assert_eq!(stored[keys::STATUS], "UNKNOWN");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    seq: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents, soft-deleted included
    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    /// True when nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.inner.read().documents.is_empty()
    }

    /// Normalize, guard, stamp, and index one candidate under the lock
    fn write_document(
        &self,
        inner: &mut StoreInner,
        candidate: &Document,
    ) -> Result<Document, Reject> {
        let mut doc = schema::prepare(candidate).map_err(Reject::Schema)?;
        let email = match doc.get(keys::EMAIL).and_then(Value::as_str) {
            Some(email) => email.to_string(),
            None => return Err(Reject::Schema("missing required field 'email'".to_string())),
        };
        if inner.email_index.contains_key(&email) {
            return Err(Reject::Duplicate(format!("duplicate key: email '{}'", email)));
        }

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let id = RecordId::new();
        schema::stamp(&mut doc, id, Utc::now());

        inner.id_index.insert(id.to_string(), seq);
        inner.email_index.insert(email, seq);
        if let Some(status) = doc.get(keys::STATUS).and_then(Value::as_str) {
            inner.status_index.insert(status, seq);
        }
        inner.documents.insert(seq, doc.clone());
        debug!(target: "roster::store", %id, seq, "inserted record");
        Ok(doc)
    }
}

impl RecordStore for MemoryStore {
    fn find_one(&self, filter: &Filter) -> RosterResult<Option<Document>> {
        let inner = self.inner.read();
        // Pure email probes resolve through the unique index.
        if filter.len() == 1 {
            if let Some(email) = filter.get(keys::EMAIL).and_then(Value::as_str) {
                return Ok(inner
                    .email_index
                    .get(email)
                    .and_then(|seq| inner.documents.get(seq))
                    .cloned());
            }
        }
        Ok(inner
            .documents
            .values()
            .find(|doc| matches(doc, filter))
            .cloned())
    }

    fn insert(&self, candidate: Document) -> RosterResult<Document> {
        let mut inner = self.inner.write();
        self.write_document(&mut inner, &candidate)
            .map_err(|reject| match reject {
                Reject::Schema(message) => RosterError::validation(message),
                Reject::Duplicate(_) => RosterError::DuplicateKey,
            })
    }

    fn find_and_update(
        &self,
        target: &Filter,
        patch: &Document,
    ) -> RosterResult<Option<Document>> {
        let cast = schema::cast_patch(patch).map_err(RosterError::validation)?;
        let mut inner = self.inner.write();

        let seq = if let Some(id) = target.get(keys::ID).and_then(Value::as_str) {
            // Id-bearing targets resolve through the id index, then
            // still verify the full filter.
            inner.id_index.get(id).copied().filter(|seq| {
                inner
                    .documents
                    .get(seq)
                    .map_or(false, |doc| matches(doc, target))
            })
        } else {
            inner
                .documents
                .iter()
                .find(|(_, doc)| matches(doc, target))
                .map(|(seq, _)| *seq)
        };
        let seq = match seq {
            Some(seq) => seq,
            None => return Ok(None),
        };

        if let Some(next_email) = cast.get(keys::EMAIL).and_then(Value::as_str) {
            if let Some(owner) = inner.email_index.get(next_email) {
                if *owner != seq {
                    return Err(RosterError::DuplicateKey);
                }
            }
        }

        let (updated, previous_email, previous_status) = {
            let doc = match inner.documents.get_mut(&seq) {
                Some(doc) => doc,
                None => return Ok(None),
            };
            let previous_email = doc.get(keys::EMAIL).and_then(Value::as_str).map(String::from);
            let previous_status = doc.get(keys::STATUS).and_then(Value::as_str).map(String::from);

            for (key, value) in &cast {
                doc.insert(key.clone(), value.clone());
            }
            doc.insert(
                keys::UPDATED_AT.to_string(),
                Value::String(schema::format_timestamp(Utc::now())),
            );
            let revision = doc.get(keys::REVISION).and_then(Value::as_u64).unwrap_or(0);
            doc.insert(keys::REVISION.to_string(), Value::from(revision + 1));
            (doc.clone(), previous_email, previous_status)
        };

        let next_email = updated.get(keys::EMAIL).and_then(Value::as_str).map(String::from);
        if previous_email != next_email {
            if let Some(old) = &previous_email {
                inner.email_index.remove(old);
            }
            if let Some(new) = next_email {
                inner.email_index.insert(new, seq);
            }
        }
        let next_status = updated.get(keys::STATUS).and_then(Value::as_str).map(String::from);
        if previous_status != next_status {
            if let Some(old) = &previous_status {
                inner.status_index.remove(old, seq);
            }
            if let Some(new) = &next_status {
                inner.status_index.insert(new, seq);
            }
        }

        debug!(target: "roster::store", seq, "updated record");
        Ok(Some(updated))
    }

    fn bulk_insert_unordered(&self, batch: Vec<Document>) -> RosterResult<BulkReport> {
        let mut inner = self.inner.write();
        let mut report = BulkReport::default();
        for (index, candidate) in batch.iter().enumerate() {
            match self.write_document(&mut inner, candidate) {
                Ok(_) => report.inserted_count += 1,
                Err(Reject::Schema(message)) => report.errors.push(WriteError {
                    index,
                    kind: WriteErrorKind::SchemaViolation,
                    message,
                }),
                Err(Reject::Duplicate(message)) => report.errors.push(WriteError {
                    index,
                    kind: WriteErrorKind::DuplicateKey,
                    message,
                }),
            }
        }
        debug!(
            target: "roster::store",
            inserted = report.inserted_count,
            failed = report.errors.len(),
            "bulk insert finished"
        );
        Ok(report)
    }

    fn find_matching(&self, filter: &Filter) -> RosterResult<Vec<Document>> {
        let inner = self.inner.read();
        if let Some(status) = filter.get(keys::STATUS).and_then(Value::as_str) {
            let bucket = match inner.status_index.get(status) {
                Some(bucket) => bucket,
                None => return Ok(Vec::new()),
            };
            // Bucket order is ascending sequence, same as a full scan.
            return Ok(bucket
                .iter()
                .filter_map(|seq| inner.documents.get(seq))
                .filter(|doc| matches(doc, filter))
                .cloned()
                .collect());
        }
        Ok(inner
            .documents
            .values()
            .filter(|doc| matches(doc, filter))
            .cloned()
            .collect())
    }
}
