//! Bulk ingestion tests, from raw batches and from CSV streams
//!
//! Ingestion is unordered: each row succeeds or fails on its own and the
//! outcome reports both counts. Only a store-level failure of the whole
//! batch surfaces as an error.

use crate::common::*;

use std::sync::Arc;

use serde_json::json;

use rosterdb::{
    BulkReport, Document, Filter, IngestOutcome, QueryRequest, Roster, RosterError, RosterResult,
};

fn batch_of(emails: &[&str]) -> Vec<Document> {
    emails.iter().map(|e| sample_draft(e).to_document()).collect()
}

// ============================================================================
// Batch Outcomes
// ============================================================================

mod batch_outcomes {
    use super::*;

    #[test]
    fn clean_batch_counts_every_row() {
        let roster = create_test_roster();
        let batch = batch_of(&["a@example.com", "b@example.com", "c@example.com"]);

        let outcome = roster.ingest(batch).unwrap();
        assert_eq!(outcome.success_count, 3);
        assert_eq!(outcome.failed_count, 0);

        let page = roster.list(&QueryRequest::default()).unwrap();
        assert_eq!(page.data.len(), 3);
    }

    #[test]
    fn duplicate_rows_fail_individually() {
        let roster = create_test_roster();
        let batch = batch_of(&["a@example.com", "a@example.com", "b@example.com"]);

        let outcome = roster.ingest(batch).unwrap();
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 1);

        // The survivors are regular records.
        let page = roster.list(&QueryRequest::default()).unwrap();
        let emails: Vec<_> = page.data.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, ["a@example.com", "b@example.com"]);
    }

    #[test]
    fn rows_clashing_with_existing_records_fail() {
        let roster = create_test_roster();
        roster.create(&sample_draft("taken@example.com")).unwrap();

        let batch = batch_of(&["taken@example.com", "fresh@example.com"]);
        let outcome = roster.ingest(batch).unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failed_count, 1);
    }

    #[test]
    fn incomplete_rows_fail_individually() {
        let roster = create_test_roster();

        let missing_phone = json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "birthDate": "1815-12-10"
        });
        let batch = vec![
            missing_phone.as_object().cloned().unwrap(),
            sample_draft("ok@example.com").to_document(),
        ];

        let outcome = roster.ingest(batch).unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failed_count, 1);
    }

    #[test]
    fn empty_batch_is_a_successful_no_op() {
        let roster = create_test_roster();
        let outcome = roster.ingest(Vec::new()).unwrap();
        assert_eq!(outcome, IngestOutcome::default());
    }
}

// ============================================================================
// Store Failure
// ============================================================================

mod store_failure {
    use super::*;

    /// A store whose every call fails, standing in for a lost backend.
    struct DeadStore;

    impl rosterdb::RecordStore for DeadStore {
        fn find_one(&self, _filter: &Filter) -> RosterResult<Option<Document>> {
            Err(RosterError::store_unavailable("connection refused"))
        }

        fn insert(&self, _document: Document) -> RosterResult<Document> {
            Err(RosterError::store_unavailable("connection refused"))
        }

        fn find_and_update(
            &self,
            _filter: &Filter,
            _changes: &Document,
        ) -> RosterResult<Option<Document>> {
            Err(RosterError::store_unavailable("connection refused"))
        }

        fn bulk_insert_unordered(&self, _documents: Vec<Document>) -> RosterResult<BulkReport> {
            Err(RosterError::store_unavailable("connection refused"))
        }

        fn find_matching(&self, _filter: &Filter) -> RosterResult<Vec<Document>> {
            Err(RosterError::store_unavailable("connection refused"))
        }
    }

    #[test]
    fn dead_store_fails_the_whole_batch() {
        let roster = Roster::new(Arc::new(DeadStore));
        let batch = batch_of(&["a@example.com"]);

        let err = roster.ingest(batch).unwrap_err();
        assert!(matches!(err, RosterError::IngestionFailed(_)));
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Bulk ingestion failed:"));
        assert!(err.to_string().contains("connection refused"));
    }
}

// ============================================================================
// CSV Round Trip
// ============================================================================

mod csv_round_trip {
    use super::*;

    #[test]
    fn csv_headers_map_onto_record_fields() {
        let roster = create_test_roster();
        let csv = "\
firstname,lastname,email,phone,provider,birth_date,status
Ada,Lovelace,ada@example.com,+44 20 7946 0001,Referral,1815-12-10,ACTIVE
Grace,Hopper,grace@example.com,+1 555 867 5309,Conference,1906-12-09,
";

        let outcome = roster.ingest_csv(csv.as_bytes()).unwrap();
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 0);

        let page = roster.list(&QueryRequest::default()).unwrap();
        let ada = &page.data[0];
        assert_eq!(ada.first_name, "Ada");
        assert_eq!(ada.marketing_source, "Referral");
        assert_eq!(ada.birth_date.to_string(), "1815-12-10");
        assert_eq!(ada.status, "ACTIVE");

        // Grace's empty status cell fell back to the default.
        assert_eq!(page.data[1].status, "UNKNOWN");
    }

    #[test]
    fn short_rows_count_as_failures() {
        let roster = create_test_roster();
        let csv = "\
firstname,lastname,email,phone,birth_date
Ada,Lovelace,ada@example.com,+44 20 7946 0001,1815-12-10
Grace,Hopper
";

        let outcome = roster.ingest_csv(csv.as_bytes()).unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failed_count, 1);
    }

    #[test]
    fn csv_rows_respect_email_uniqueness() {
        let roster = create_test_roster();
        roster.create(&sample_draft("ada@example.com")).unwrap();

        let csv = "\
firstname,lastname,email,phone,birth_date
Ada,Lovelace,ada@example.com,+44 20 7946 0001,1815-12-10
";
        let outcome = roster.ingest_csv(csv.as_bytes()).unwrap();
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.failed_count, 1);
    }

    #[test]
    fn unmapped_columns_are_dropped() {
        let roster = create_test_roster();
        let csv = "\
firstname,lastname,email,phone,birth_date,nickname
Ada,Lovelace,ada@example.com,+44 20 7946 0001,1815-12-10,Countess
";

        let outcome = roster.ingest_csv(csv.as_bytes()).unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failed_count, 0);
    }
}
