//! Shared helpers for the service API suite

use std::sync::Arc;

use rosterdb::{MemoryStore, Record, RecordDraft, Roster};

/// Fresh facade over an empty in-memory store
pub fn create_test_roster() -> Roster {
    rosterdb::init_tracing();
    Roster::new(Arc::new(MemoryStore::new()))
}

/// Valid draft with the given email
pub fn sample_draft(email: &str) -> RecordDraft {
    RecordDraft {
        email: email.to_string(),
        first_name: "John".to_string(),
        last_name: "Smith".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        birth_date: "1990-05-14".parse().unwrap(),
        marketing_source: None,
        status: None,
    }
}

/// Create `count` records with predictable emails, in order
pub fn seed_records(roster: &Roster, count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            roster
                .create(&sample_draft(&format!("user{:03}@example.com", i)))
                .unwrap()
        })
        .collect()
}
