//! Store adapter contract
//!
//! ## Design
//!
//! [`RecordStore`] is the narrow seam between the service layer and a
//! persistence backend. It speaks documents and filters, never entity
//! structs, and it carries exactly the operations the service needs:
//! point lookup, guarded insert, find-and-update, unordered bulk
//! insert, and natural-order matching for the query pipeline.
//!
//! ## Bulk errors are data
//!
//! A partially failed batch is a normal outcome, so
//! [`bulk_insert_unordered`](RecordStore::bulk_insert_unordered)
//! reports per-row failures inside [`BulkReport`] and reserves `Err`
//! for total failure of the batch as a whole. Callers count successes
//! from the report's `inserted_count`, never by subtracting failures
//! from the batch size.

use roster_core::{Document, Filter, RosterResult};

/// Why a single bulk row was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteErrorKind {
    /// The row collided with the unique email index
    DuplicateKey,
    /// The row failed casting or a required-field rule
    SchemaViolation,
}

/// One rejected row from a bulk insert
#[derive(Debug, Clone)]
pub struct WriteError {
    /// Position of the row in the submitted batch
    pub index: usize,
    /// Failure classification
    pub kind: WriteErrorKind,
    /// Store-produced description of the failure
    pub message: String,
}

/// Outcome of an unordered bulk insert
///
/// `inserted_count` is the store's own report of rows actually
/// written; it is authoritative even when it disagrees with
/// `batch_len - errors.len()`.
#[derive(Debug, Clone, Default)]
pub struct BulkReport {
    /// Rows the store actually wrote
    pub inserted_count: usize,
    /// Per-row failures, in the order the store hit them
    pub errors: Vec<WriteError>,
}

/// Persistence surface for record documents
///
/// Implementations own schema enforcement (casting, required fields,
/// defaults), metadata stamping, and the unique email index. Matching
/// is plain field equality; result order is the store's natural
/// insertion order.
pub trait RecordStore: Send + Sync {
    /// Return the first document matching `filter`, in natural order
    ///
    /// # Errors
    /// `StoreUnavailable` when the backend cannot be reached.
    fn find_one(&self, filter: &Filter) -> RosterResult<Option<Document>>;

    /// Normalize, guard, stamp, and write one candidate document
    ///
    /// Returns the stored document including assigned metadata.
    ///
    /// # Errors
    /// - `Validation` when casting or a required-field rule fails
    /// - `DuplicateKey` when the email is already taken, soft-deleted
    ///   records included
    /// - `StoreUnavailable` when the backend cannot be reached
    fn insert(&self, candidate: Document) -> RosterResult<Document>;

    /// Atomically update the first document matching `target`
    ///
    /// Applies `patch` fields onto the stored document, refreshes the
    /// modification timestamp, and bumps the internal revision.
    /// Returns the updated document, or `None` when nothing matched.
    ///
    /// # Errors
    /// - `Validation` when the patch fails casting or touches a
    ///   store-managed field
    /// - `DuplicateKey` when the patch changes email to one held by a
    ///   different record
    /// - `StoreUnavailable` when the backend cannot be reached
    fn find_and_update(
        &self,
        target: &Filter,
        patch: &Document,
    ) -> RosterResult<Option<Document>>;

    /// Insert a batch without ordering guarantees
    ///
    /// Rows fail independently; one bad row never stops the rest. The
    /// returned report carries the store's write count and the per-row
    /// failures. An empty batch yields an empty report.
    ///
    /// # Errors
    /// `StoreUnavailable` only when the batch as a whole could not be
    /// attempted.
    fn bulk_insert_unordered(&self, batch: Vec<Document>) -> RosterResult<BulkReport>;

    /// Return every document matching `filter`, in natural order
    ///
    /// # Errors
    /// `StoreUnavailable` when the backend cannot be reached.
    fn find_matching(&self, filter: &Filter) -> RosterResult<Vec<Document>>;
}

/// Field-equality match: every filter entry present with that exact value
///
/// An empty filter matches any document. A filter key the document
/// lacks fails the match; there is no missing-equals-null coercion.
pub fn matches(doc: &Document, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(key, expected)| doc.get(key) == Some(expected))
}
