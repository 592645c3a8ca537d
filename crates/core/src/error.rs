//! Error types for the record service
//!
//! This module defines the whole error taxonomy used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! - `Validation`: malformed request shape (bad id format, non-positive
//!   pagination values, invalid field values). Rejected before any store
//!   access.
//! - `DuplicateKey`: unique email constraint violated. Carries the fixed
//!   client-facing message.
//! - `NotFound`: an update or delete targeted a record that is absent or
//!   already soft-deleted.
//! - `StoreUnavailable`: the store could not serve the operation at all.
//! - `IngestionFailed`: a bulk operation failed before any per-row outcome
//!   was known. Per-row failures inside a bulk insert are never errors;
//!   they are folded into the outcome counts.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for record service operations
pub type RosterResult<T> = std::result::Result<T, RosterError>;

/// Error taxonomy for the record service
#[derive(Debug, Error)]
pub enum RosterError {
    /// Malformed request shape, rejected before any store access
    #[error("{0}")]
    Validation(String),

    /// Unique email constraint violated on create or update
    #[error("There is already a user with that email address")]
    DuplicateKey,

    /// Update or delete target absent or already soft-deleted
    #[error("User not found")]
    NotFound,

    /// The store could not serve the operation
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Bulk operation failed before any per-row outcome was known
    #[error("Bulk ingestion failed: {0}")]
    IngestionFailed(String),
}

impl RosterError {
    /// Construct a `Validation` error from any message
    pub fn validation(reason: impl Into<String>) -> Self {
        RosterError::Validation(reason.into())
    }

    /// Construct a `StoreUnavailable` error from any message
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        RosterError::StoreUnavailable(reason.into())
    }

    /// Transport-level status classification for this error
    ///
    /// Client errors map to 400/404, server errors to 500. Embedding
    /// layers use this to build their response status.
    pub fn status_code(&self) -> u16 {
        match self {
            RosterError::Validation(_) => 400,
            RosterError::DuplicateKey => 400,
            RosterError::NotFound => 404,
            RosterError::StoreUnavailable(_) => 500,
            RosterError::IngestionFailed(_) => 500,
        }
    }

    /// Structured error body for transport layers
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            status_code: self.status_code(),
            message: self.to_string(),
        }
    }
}

/// Structured error body: status classification plus message
///
/// Every rejected request surfaces one of these; no error is silently
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Transport-level status classification
    pub status_code: u16,
    /// Human-readable message
    pub message: String,
}
