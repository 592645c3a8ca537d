//! Record data model and store-mapping schema
//!
//! ## Design
//!
//! Shape, validation, and store mapping are three separate concerns:
//!
//! - The entity structs here are plain data ([`Record`], [`RecordDraft`],
//!   [`RecordPatch`]). Each operation has its own independently defined
//!   payload struct; none is derived from another, so a field added for
//!   one operation can never leak into a different one.
//! - Field validation lives in [`crate::validate`] as standalone
//!   functions keyed by field.
//! - The store mapping is the explicit [`RECORD_FIELDS`] table below;
//!   the store adapter composes it for required-field enforcement,
//!   defaults, and index construction.
//!
//! Documents use camelCase keys (the wire vocabulary); Rust structs use
//! snake_case fields bridged by serde. The [`keys`] constants are the
//! single source of truth for document key spelling.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RosterError, RosterResult};
use crate::types::RecordId;

/// A stored document: camelCase field names mapped to JSON values
pub type Document = serde_json::Map<String, Value>;

/// Document key constants for record fields and store-assigned metadata
pub mod keys {
    /// Store-assigned opaque identifier
    pub const ID: &str = "id";
    /// Email address (required, unique)
    pub const EMAIL: &str = "email";
    /// First name (required)
    pub const FIRST_NAME: &str = "firstName";
    /// Last name (required)
    pub const LAST_NAME: &str = "lastName";
    /// Phone number (required)
    pub const PHONE: &str = "phone";
    /// Birth date, ISO-8601 calendar date (required)
    pub const BIRTH_DATE: &str = "birthDate";
    /// Acquisition channel (optional, defaults to "UNKNOWN")
    pub const MARKETING_SOURCE: &str = "marketingSource";
    /// Classification status (optional, defaults to "UNKNOWN", indexed)
    pub const STATUS: &str = "status";
    /// Soft-delete flag (defaults to false)
    pub const IS_DELETED: &str = "isDeleted";
    /// Store-assigned creation timestamp
    pub const CREATED_AT: &str = "createdAt";
    /// Store-assigned modification timestamp
    pub const UPDATED_AT: &str = "updatedAt";
    /// Internal revision counter, stripped from query output
    pub const REVISION: &str = "revision";
}

/// Default value applied by the store when a field is absent at insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// A fixed text default
    Text(&'static str),
    /// A fixed boolean default
    Flag(bool),
}

/// Store-mapping entry for one client-writable record field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Document key
    pub key: &'static str,
    /// Field must be present (and non-null) at insert
    pub required: bool,
    /// Field participates in the unique index
    pub unique: bool,
    /// The store maintains a secondary index on this field
    pub indexed: bool,
    /// Default applied when the field is absent at insert
    pub default: Option<FieldDefault>,
}

/// Store-mapping table for client-writable record fields
///
/// Store-assigned metadata (id, createdAt, updatedAt, revision) is not
/// client-writable and therefore not listed here; those keys exist only
/// in [`keys`].
pub const RECORD_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: keys::EMAIL,
        required: true,
        unique: true,
        indexed: false,
        default: None,
    },
    FieldSpec {
        key: keys::FIRST_NAME,
        required: true,
        unique: false,
        indexed: false,
        default: None,
    },
    FieldSpec {
        key: keys::LAST_NAME,
        required: true,
        unique: false,
        indexed: false,
        default: None,
    },
    FieldSpec {
        key: keys::PHONE,
        required: true,
        unique: false,
        indexed: false,
        default: None,
    },
    FieldSpec {
        key: keys::BIRTH_DATE,
        required: true,
        unique: false,
        indexed: false,
        default: None,
    },
    FieldSpec {
        key: keys::MARKETING_SOURCE,
        required: false,
        unique: false,
        indexed: false,
        default: Some(FieldDefault::Text("UNKNOWN")),
    },
    FieldSpec {
        key: keys::STATUS,
        required: false,
        unique: false,
        indexed: true,
        default: Some(FieldDefault::Text("UNKNOWN")),
    },
    FieldSpec {
        key: keys::IS_DELETED,
        required: false,
        unique: false,
        indexed: false,
        default: Some(FieldDefault::Flag(false)),
    },
];

/// Look up the mapping entry for a document key
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    RECORD_FIELDS.iter().find(|spec| spec.key == key)
}

/// The managed record entity (read model)
///
/// Fully materialized view of a stored document. Instances are value
/// objects: the store is the sole owner of record lifecycle, and the
/// only mutation paths are the explicit update and soft-delete
/// operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Store-assigned opaque identifier
    pub id: RecordId,
    /// Email address, unique among all records ever created
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Phone number
    pub phone: String,
    /// Birth date
    pub birth_date: NaiveDate,
    /// Acquisition channel ("UNKNOWN" when never supplied)
    pub marketing_source: String,
    /// Classification status ("UNKNOWN" when never supplied)
    pub status: String,
    /// Soft-delete flag
    pub is_deleted: bool,
    /// Store-assigned creation timestamp
    pub created_at: DateTime<Utc>,
    /// Store-assigned modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Materialize a stored document into the read model
    ///
    /// Unknown keys (internal metadata the store did not strip) are
    /// ignored.
    ///
    /// # Errors
    /// `StoreUnavailable` if the document is missing record fields or
    /// holds values of the wrong shape; stored documents are normalized
    /// at insert, so this indicates store corruption rather than bad
    /// client input.
    pub fn from_document(doc: Document) -> RosterResult<Self> {
        serde_json::from_value(Value::Object(doc))
            .map_err(|e| RosterError::store_unavailable(format!("malformed stored document: {}", e)))
    }
}

/// Payload for creating a record
///
/// Required fields are plain values; the two classification fields are
/// optional and the store fills in their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    /// Email address (must be unique)
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Phone number
    pub phone: String,
    /// Birth date
    pub birth_date: NaiveDate,
    /// Acquisition channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_source: Option<String>,
    /// Classification status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RecordDraft {
    /// Build the candidate document submitted to the store
    ///
    /// Only supplied fields appear; defaults and metadata are the
    /// store's responsibility.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(keys::EMAIL.to_string(), Value::String(self.email.clone()));
        doc.insert(
            keys::FIRST_NAME.to_string(),
            Value::String(self.first_name.clone()),
        );
        doc.insert(
            keys::LAST_NAME.to_string(),
            Value::String(self.last_name.clone()),
        );
        doc.insert(keys::PHONE.to_string(), Value::String(self.phone.clone()));
        doc.insert(
            keys::BIRTH_DATE.to_string(),
            Value::String(self.birth_date.to_string()),
        );
        if let Some(source) = &self.marketing_source {
            doc.insert(
                keys::MARKETING_SOURCE.to_string(),
                Value::String(source.clone()),
            );
        }
        if let Some(status) = &self.status {
            doc.insert(keys::STATUS.to_string(), Value::String(status.clone()));
        }
        doc
    }
}

/// Partial payload for updating a record
///
/// Absent fields are left unchanged. Deliberately has no soft-delete or
/// metadata fields: deletion has its own operation, and store-assigned
/// fields are immutable by clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    /// New email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New first name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New birth date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    /// New acquisition channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_source: Option<String>,
    /// New classification status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RecordPatch {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.birth_date.is_none()
            && self.marketing_source.is_none()
            && self.status.is_none()
    }

    /// Build the patch document submitted to the store
    ///
    /// Contains exactly the fields that are set.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(email) = &self.email {
            doc.insert(keys::EMAIL.to_string(), Value::String(email.clone()));
        }
        if let Some(first_name) = &self.first_name {
            doc.insert(
                keys::FIRST_NAME.to_string(),
                Value::String(first_name.clone()),
            );
        }
        if let Some(last_name) = &self.last_name {
            doc.insert(keys::LAST_NAME.to_string(), Value::String(last_name.clone()));
        }
        if let Some(phone) = &self.phone {
            doc.insert(keys::PHONE.to_string(), Value::String(phone.clone()));
        }
        if let Some(birth_date) = &self.birth_date {
            doc.insert(
                keys::BIRTH_DATE.to_string(),
                Value::String(birth_date.to_string()),
            );
        }
        if let Some(source) = &self.marketing_source {
            doc.insert(
                keys::MARKETING_SOURCE.to_string(),
                Value::String(source.clone()),
            );
        }
        if let Some(status) = &self.status {
            doc.insert(keys::STATUS.to_string(), Value::String(status.clone()));
        }
        doc
    }
}
