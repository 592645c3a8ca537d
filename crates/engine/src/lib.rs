//! Service engine for RosterDB
//!
//! This crate orchestrates the layers below into the public service:
//! - Roster: the stateless facade callers hold
//! - plan / executor: list-query normalization and staged execution
//! - ingest / upload: bulk ingestion accounting and CSV reading
//! - RosterConfig: deployment policy from `roster.toml`
//!
//! The engine is the only component that knows about:
//! - Query shaping (defaults, the soft-delete guard, paging)
//! - The create-time email probe
//! - Folding bulk reports into ingestion outcomes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod executor;
pub mod ingest;
pub mod plan;
pub mod service;
pub mod upload;

pub use config::{RosterConfig, CONFIG_FILE_NAME};
pub use ingest::IngestOutcome;
pub use plan::{PlanOptions, QueryPlan, DEFAULT_LIMIT, DEFAULT_PAGE, DEFAULT_SORT_BY};
pub use service::Roster;
pub use upload::CSV_HEADER_MAP;

// Re-export the vocabulary types so callers need only this crate
pub use roster_core::{
    keys, Document, ErrorBody, Filter, Page, QueryRequest, Record, RecordDraft, RecordId,
    RecordPatch, RosterError, RosterResult, SortOrder,
};
pub use roster_store::{BulkReport, MemoryStore, RecordStore, WriteError, WriteErrorKind};
