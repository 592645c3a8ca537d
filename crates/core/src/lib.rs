//! Core types for RosterDB
//!
//! This crate defines the foundational types used throughout the system:
//! - RecordId: Opaque identifier assigned to each record
//! - Record / RecordDraft / RecordPatch: Entity read model and the
//!   per-operation write payloads
//! - Document / Filter: Stored-document and equality-filter shapes
//! - QueryRequest / Page: Raw list-query input and the result envelope
//! - SortOrder: Sort direction with its 1 / -1 wire form
//! - RosterError: Error taxonomy shared by every layer
//! - validate: Standalone per-field validation rules

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod error;
pub mod query;
pub mod record;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use error::{ErrorBody, RosterError, RosterResult};
pub use query::{Filter, Page, QueryRequest};
pub use record::{
    field_spec, keys, Document, FieldDefault, FieldSpec, Record, RecordDraft, RecordPatch,
    RECORD_FIELDS,
};
pub use types::{RecordId, SortOrder};
pub use validate::{
    parse_birth_date, validate_draft, validate_email, validate_not_blank, validate_patch,
    validate_phone, PHONE_MAX_DIGITS, PHONE_MIN_DIGITS,
};
