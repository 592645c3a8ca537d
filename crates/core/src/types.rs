//! Core identifier and ordering types
//!
//! This module defines the foundational types:
//! - RecordId: Unique identifier for stored records
//! - SortOrder: Sort direction for queries, carried on the wire as 1 / -1

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a record
///
/// A RecordId is a wrapper around a UUID v4, assigned by the store when a
/// record is inserted. Clients treat it as an opaque token; the only way
/// to obtain one from external input is [`RecordId::from_string`], which
/// is also the well-formedness check for identifiers arriving at the
/// service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new random RecordId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a RecordId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse a RecordId from a string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    ///
    /// # Errors
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this RecordId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sort direction for paginated queries
///
/// Carried on the wire as an integer: 1 = ascending (oldest first),
/// -1 = descending (newest first). Any other value is rejected at plan
/// build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SortOrder {
    /// Ascending order (wire value 1)
    Ascending,
    /// Descending order (wire value -1)
    Descending,
}

impl SortOrder {
    /// Convert to the wire integer representation
    pub fn as_value(&self) -> i64 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Try to create from a wire integer
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(SortOrder::Ascending),
            -1 => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Ascending
    }
}

impl TryFrom<i64> for SortOrder {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        SortOrder::from_value(value).ok_or_else(|| format!("sort must be 1 or -1, got {}", value))
    }
}

impl From<SortOrder> for i64 {
    fn from(order: SortOrder) -> i64 {
        order.as_value()
    }
}
