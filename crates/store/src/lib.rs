//! Storage layer for RosterDB
//!
//! This crate implements the persistence surface behind the service:
//! - RecordStore: the adapter trait the service layer talks to
//! - MemoryStore: BTreeMap-based store with RwLock and secondary
//!   indices (id, unique email, status buckets)
//! - schema: document casting, required fields, defaults, and
//!   metadata stamping at the write boundary
//! - BulkReport / WriteError: per-row outcomes for unordered bulk
//!   inserts
//!
//! # Natural Order
//!
//! Documents are keyed by insertion sequence, so every scan and every
//! multi-result read yields records oldest-first. Query shaping
//! (pagination, sorting) lives above this crate; the store only
//! promises the stable base order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod memory;
pub mod schema;

pub use adapter::{matches, BulkReport, RecordStore, WriteError, WriteErrorKind};
pub use memory::MemoryStore;
