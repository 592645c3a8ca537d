//! CSV batch reading for ingestion
//!
//! Turns a CSV stream into candidate documents for the bulk path.
//! The header row drives a fixed source-column → document-key mapping;
//! columns outside the mapping are dropped, and empty cells are
//! omitted rather than stored as empty strings. Cell values stay raw
//! text here; casting and required-field enforcement happen in the
//! store, per row, so one malformed row costs that row and nothing
//! else.

use std::io::Read;

use roster_core::{keys, Document, RosterError, RosterResult};
use serde_json::Value;
use tracing::debug;

/// Source CSV header → document key
pub const CSV_HEADER_MAP: &[(&str, &str)] = &[
    ("firstname", keys::FIRST_NAME),
    ("lastname", keys::LAST_NAME),
    ("email", keys::EMAIL),
    ("phone", keys::PHONE),
    ("status", keys::STATUS),
    ("provider", keys::MARKETING_SOURCE),
    ("birth_date", keys::BIRTH_DATE),
];

/// Read a CSV stream into candidate documents
///
/// Every data row yields a document, including rows whose mapped cells
/// are all empty; such rows fail later, inside the store, and count as
/// failed rows in the ingestion outcome.
///
/// # Errors
/// `Validation` when the stream is not parseable CSV at all.
pub fn read_batch<R: Read>(reader: R) -> RosterResult<Vec<Document>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mapped: Vec<Option<&'static str>> = csv_reader
        .headers()
        .map_err(|e| RosterError::validation(format!("unreadable CSV header row: {}", e)))?
        .iter()
        .map(map_header)
        .collect();

    let mut batch = Vec::new();
    for row in csv_reader.records() {
        let row =
            row.map_err(|e| RosterError::validation(format!("unreadable CSV row: {}", e)))?;
        let mut doc = Document::new();
        for (cell, target) in row.iter().zip(&mapped) {
            let target = match target {
                Some(target) => *target,
                None => continue,
            };
            if cell.is_empty() {
                continue;
            }
            doc.insert(target.to_string(), Value::String(cell.to_string()));
        }
        batch.push(doc);
    }
    debug!(target: "roster::ingest", rows = batch.len(), "read CSV batch");
    Ok(batch)
}

fn map_header(header: &str) -> Option<&'static str> {
    CSV_HEADER_MAP
        .iter()
        .find(|(source, _)| *source == header)
        .map(|(_, key)| *key)
}
