//! RosterDB - Embedded record roster with soft deletes and bulk ingestion
//!
//! RosterDB manages a roster of people records behind one service
//! facade: validated creates with a globally unique email, paged and
//! filterable list queries, partial updates, soft deletes, and bulk
//! ingestion from prepared batches or CSV streams.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rosterdb::{MemoryStore, QueryRequest, RecordDraft, Roster};
//!
//! let roster = Roster::new(Arc::new(MemoryStore::new()));
//!
//! // Create a record
//! let record = roster.create(&RecordDraft {
//!     email: "ada@example.com".to_string(),
//!     first_name: "Ada".to_string(),
//!     last_name: "Lovelace".to_string(),
//!     phone: "+4455512345".to_string(),
//!     birth_date: "1815-12-10".parse().unwrap(),
//!     marketing_source: None,
//!     status: None,
//! }).unwrap();
//!
//! // List it back
//! let page = roster.list(&QueryRequest::default()).unwrap();
//! assert_eq!(page.data[0].id, record.id);
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Roster`] facade, which composes the
//! query planner, the staged executor, and the ingestion path over a
//! pluggable [`RecordStore`]. Storage internals are reachable for
//! embedders, but the facade is the supported surface.

// Re-export the public API from roster-engine
pub use roster_engine::*;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install a process-wide tracing subscriber reading `RUST_LOG`
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
