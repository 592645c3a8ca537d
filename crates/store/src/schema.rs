//! Document normalization against the record field table
//!
//! The store enforces shape at the write boundary, in three steps:
//!
//! 1. **Strict copy**: only keys listed in
//!    [`RECORD_FIELDS`](roster_core::RECORD_FIELDS) survive; unknown
//!    keys and explicit nulls are dropped silently.
//! 2. **Casting**: present fields must hold the declared shape. Birth
//!    dates are normalized to the canonical `YYYY-MM-DD` text form, so
//!    a full timestamp and a plain date store identically.
//! 3. **Required check and defaults**: required fields must have
//!    survived the copy; absent optionals get their table defaults.
//!
//! Casting also applies to update patches, which additionally may not
//! touch store-managed metadata. Patches skip the required check, so a
//! partial update never has to restate untouched fields.
//!
//! Errors here are plain messages; the store maps them to the caller's
//! error taxonomy per operation (single insert vs. bulk row).

use chrono::{DateTime, SecondsFormat, Utc};
use roster_core::{keys, parse_birth_date, Document, FieldDefault, RecordId, RECORD_FIELDS};
use serde_json::Value;

/// Store-managed keys an update patch may never set
const PROTECTED_KEYS: &[&str] = &[keys::ID, keys::CREATED_AT, keys::UPDATED_AT, keys::REVISION];

/// Normalize an insert candidate: strict copy, cast, require, default
pub fn prepare(candidate: &Document) -> Result<Document, String> {
    let mut doc = Document::new();
    for spec in RECORD_FIELDS {
        let value = match candidate.get(spec.key) {
            None | Some(Value::Null) => continue,
            Some(value) => value,
        };
        doc.insert(spec.key.to_string(), cast_value(spec.key, value)?);
    }
    for spec in RECORD_FIELDS {
        if spec.required && !doc.contains_key(spec.key) {
            return Err(format!("missing required field '{}'", spec.key));
        }
    }
    for spec in RECORD_FIELDS {
        if let Some(default) = spec.default {
            if !doc.contains_key(spec.key) {
                doc.insert(spec.key.to_string(), default_value(default));
            }
        }
    }
    Ok(doc)
}

/// Normalize an update patch: reject store-managed keys, strict copy, cast
pub fn cast_patch(patch: &Document) -> Result<Document, String> {
    for key in PROTECTED_KEYS {
        if patch.contains_key(*key) {
            return Err(format!("field '{}' is store-managed and not updatable", key));
        }
    }
    let mut doc = Document::new();
    for spec in RECORD_FIELDS {
        let value = match patch.get(spec.key) {
            None | Some(Value::Null) => continue,
            Some(value) => value,
        };
        doc.insert(spec.key.to_string(), cast_value(spec.key, value)?);
    }
    Ok(doc)
}

/// Attach store-assigned metadata to a freshly normalized document
pub fn stamp(doc: &mut Document, id: RecordId, now: DateTime<Utc>) {
    let ts = Value::String(format_timestamp(now));
    doc.insert(keys::ID.to_string(), Value::String(id.to_string()));
    doc.insert(keys::CREATED_AT.to_string(), ts.clone());
    doc.insert(keys::UPDATED_AT.to_string(), ts);
    doc.insert(keys::REVISION.to_string(), Value::from(0u64));
}

/// Canonical stored timestamp form
///
/// RFC 3339 UTC with millisecond precision and a trailing `Z`. With
/// the precision fixed, lexicographic order over stored timestamps is
/// chronological order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn cast_value(key: &str, value: &Value) -> Result<Value, String> {
    match key {
        keys::BIRTH_DATE => match value {
            Value::String(text) => {
                let date = parse_birth_date(text).map_err(|e| e.to_string())?;
                Ok(Value::String(date.to_string()))
            }
            _ => Err(format!("{} must be an ISO-8601 date string", keys::BIRTH_DATE)),
        },
        keys::IS_DELETED => match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(format!("{} must be a boolean", keys::IS_DELETED)),
        },
        _ => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(format!("{} must be a string", key)),
        },
    }
}

fn default_value(default: FieldDefault) -> Value {
    match default {
        FieldDefault::Text(text) => Value::String(text.to_string()),
        FieldDefault::Flag(flag) => Value::Bool(flag),
    }
}
