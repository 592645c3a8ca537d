//! Field validation
//!
//! Standalone validators, one per field rule, composed by the payload
//! checks [`validate_draft`] and [`validate_patch`]. Keeping them free
//! functions (rather than methods on the payload structs) lets the
//! ingestion path and tests reuse individual rules without a payload.
//!
//! ## Rules
//!
//! - Required text fields must not be blank (empty or all whitespace).
//! - Email: exactly one `@`, non-empty local part, domain with at
//!   least one interior dot, no whitespace.
//! - Phone: an optional leading `+`, then 7 to 15 digits once common
//!   separators (spaces, dashes, dots, parentheses) are removed.
//! - Birth date: ISO-8601 calendar date, with a full RFC 3339
//!   timestamp accepted and truncated to its date part.
//!
//! Error messages name the offending field by its document key.

use chrono::{DateTime, NaiveDate};

use crate::error::{RosterError, RosterResult};
use crate::record::{keys, RecordDraft, RecordPatch};

/// Fewest digits a phone number may carry
pub const PHONE_MIN_DIGITS: usize = 7;

/// Most digits a phone number may carry
pub const PHONE_MAX_DIGITS: usize = 15;

/// Reject a blank (empty or all-whitespace) required text value
///
/// # Errors
/// `Validation` naming `field` when the value is blank.
pub fn validate_not_blank(field: &str, value: &str) -> RosterResult<()> {
    if value.trim().is_empty() {
        return Err(RosterError::validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

/// Validate an email address
///
/// Intentionally shallow: one `@`, a non-empty local part, a domain
/// with an interior dot, and no whitespace. Deliverability is not this
/// layer's problem.
///
/// # Errors
/// `Validation` naming the email field when the shape is wrong.
pub fn validate_email(value: &str) -> RosterResult<()> {
    let invalid = || {
        RosterError::validation(format!(
            "{} must be a valid email address, got '{}'",
            keys::EMAIL,
            value
        ))
    };

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(invalid()),
    };
    if local.is_empty() {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

/// Validate a phone number
///
/// Separators (spaces, dashes, dots, parentheses) are stripped before
/// counting digits; the stored value keeps the caller's formatting.
///
/// # Errors
/// `Validation` naming the phone field when the digit count is out of
/// range or a non-digit remains after stripping.
pub fn validate_phone(value: &str) -> RosterResult<()> {
    let invalid = || {
        RosterError::validation(format!(
            "{} must be a valid phone number, got '{}'",
            keys::PHONE,
            value
        ))
    };

    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
        return Err(invalid());
    }
    Ok(())
}

/// Parse a birth date from its text form
///
/// Accepts a plain calendar date (`1990-05-14`) or a full RFC 3339
/// timestamp, which is truncated to its date part.
///
/// # Errors
/// `Validation` naming the birth-date field when neither form parses.
pub fn parse_birth_date(value: &str) -> RosterResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.date_naive());
    }
    Err(RosterError::validation(format!(
        "{} must be an ISO-8601 calendar date, got '{}'",
        keys::BIRTH_DATE,
        value
    )))
}

/// Validate a create payload
///
/// # Errors
/// `Validation` for the first rule that fails, naming the field.
pub fn validate_draft(draft: &RecordDraft) -> RosterResult<()> {
    validate_email(&draft.email)?;
    validate_not_blank(keys::FIRST_NAME, &draft.first_name)?;
    validate_not_blank(keys::LAST_NAME, &draft.last_name)?;
    validate_phone(&draft.phone)?;
    if let Some(source) = &draft.marketing_source {
        validate_not_blank(keys::MARKETING_SOURCE, source)?;
    }
    if let Some(status) = &draft.status {
        validate_not_blank(keys::STATUS, status)?;
    }
    Ok(())
}

/// Validate an update payload
///
/// Only set fields are checked; an empty patch is legal and leaves the
/// record's fields untouched.
///
/// # Errors
/// `Validation` for the first rule that fails, naming the field.
pub fn validate_patch(patch: &RecordPatch) -> RosterResult<()> {
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }
    if let Some(first_name) = &patch.first_name {
        validate_not_blank(keys::FIRST_NAME, first_name)?;
    }
    if let Some(last_name) = &patch.last_name {
        validate_not_blank(keys::LAST_NAME, last_name)?;
    }
    if let Some(phone) = &patch.phone {
        validate_phone(phone)?;
    }
    if let Some(source) = &patch.marketing_source {
        validate_not_blank(keys::MARKETING_SOURCE, source)?;
    }
    if let Some(status) = &patch.status {
        validate_not_blank(keys::STATUS, status)?;
    }
    Ok(())
}
