//! Record lifecycle and error-contract tests
//!
//! Walks records through create, update, and soft delete, and pins the
//! error taxonomy a transport layer would map onto status codes.

use crate::common::*;

use rosterdb::{QueryRequest, RecordPatch, RosterError};

// ============================================================================
// Create
// ============================================================================

mod create_flow {
    use super::*;

    #[test]
    fn created_record_is_listed() {
        let roster = create_test_roster();
        let record = roster.create(&sample_draft("ada@example.com")).unwrap();

        let page = roster.list(&QueryRequest::default()).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, record.id);
        assert_eq!(page.data[0].email, "ada@example.com");

        // Optional classification fields come back with defaults.
        assert_eq!(page.data[0].marketing_source, "UNKNOWN");
        assert_eq!(page.data[0].status, "UNKNOWN");
    }

    #[test]
    fn duplicate_email_has_the_fixed_message() {
        let roster = create_test_roster();
        roster.create(&sample_draft("ada@example.com")).unwrap();

        let err = roster.create(&sample_draft("ada@example.com")).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateKey));
        assert_eq!(
            err.to_string(),
            "There is already a user with that email address"
        );
    }

    #[test]
    fn validation_names_the_offending_field() {
        let roster = create_test_roster();

        let mut bad = sample_draft("ada@example.com");
        bad.phone = "555-CALL".to_string();
        let err = roster.create(&bad).unwrap_err();
        assert!(err.to_string().contains("phone"));

        let mut bad = sample_draft("ada@example.com");
        bad.last_name = "  ".to_string();
        let err = roster.create(&bad).unwrap_err();
        assert!(err.to_string().contains("lastName"));
    }
}

// ============================================================================
// Update
// ============================================================================

mod update_flow {
    use super::*;

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let roster = create_test_roster();
        let record = roster.create(&sample_draft("ada@example.com")).unwrap();

        let patch = RecordPatch {
            first_name: Some("Augusta".to_string()),
            status: Some("ACTIVE".to_string()),
            ..Default::default()
        };
        let updated = roster.update(&record.id.to_string(), &patch).unwrap();

        assert_eq!(updated.first_name, "Augusta");
        assert_eq!(updated.status, "ACTIVE");
        assert_eq!(updated.last_name, record.last_name);
        assert_eq!(updated.email, record.email);
        assert_eq!(updated.created_at, record.created_at);

        // The list view reflects the change.
        let page = roster.list(&QueryRequest::default()).unwrap();
        assert_eq!(page.data[0].first_name, "Augusta");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let roster = create_test_roster();
        seed_records(&roster, 1);

        let err = roster
            .update(
                &rosterdb::RecordId::new().to_string(),
                &RecordPatch::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RosterError::NotFound));
    }

    #[test]
    fn malformed_id_is_a_validation_error() {
        let roster = create_test_roster();
        let err = roster.update("42", &RecordPatch::default()).unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn email_change_frees_the_old_address() {
        let roster = create_test_roster();
        let record = roster.create(&sample_draft("old@example.com")).unwrap();

        let patch = RecordPatch {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        roster.update(&record.id.to_string(), &patch).unwrap();

        // The vacated address is usable again.
        roster.create(&sample_draft("old@example.com")).unwrap();

        // The new address is now reserved.
        let err = roster.create(&sample_draft("new@example.com")).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateKey));
    }
}

// ============================================================================
// Soft Delete
// ============================================================================

mod delete_flow {
    use super::*;

    #[test]
    fn delete_hides_the_record_from_lists() {
        let roster = create_test_roster();
        let records = seed_records(&roster, 3);

        let deleted = roster.delete(&records[1].id.to_string()).unwrap();
        assert!(deleted.is_deleted);

        let page = roster.list(&QueryRequest::default()).unwrap();
        let ids: Vec<_> = page.data.iter().map(|r| r.id).collect();
        assert_eq!(ids, [records[0].id, records[2].id]);
    }

    #[test]
    fn deleted_record_rejects_further_writes() {
        let roster = create_test_roster();
        let record = roster.create(&sample_draft("ada@example.com")).unwrap();
        roster.delete(&record.id.to_string()).unwrap();

        let patch = RecordPatch {
            first_name: Some("Augusta".to_string()),
            ..Default::default()
        };
        let err = roster.update(&record.id.to_string(), &patch).unwrap_err();
        assert!(matches!(err, RosterError::NotFound));

        let err = roster.delete(&record.id.to_string()).unwrap_err();
        assert!(matches!(err, RosterError::NotFound));
    }

    #[test]
    fn deleted_email_stays_reserved() {
        let roster = create_test_roster();
        let record = roster.create(&sample_draft("ada@example.com")).unwrap();
        roster.delete(&record.id.to_string()).unwrap();

        let err = roster.create(&sample_draft("ada@example.com")).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateKey));
    }
}

// ============================================================================
// Error Contract
// ============================================================================

mod error_contract {
    use super::*;

    #[test]
    fn status_codes_by_variant() {
        assert_eq!(RosterError::validation("x").status_code(), 400);
        assert_eq!(RosterError::DuplicateKey.status_code(), 400);
        assert_eq!(RosterError::NotFound.status_code(), 404);
        assert_eq!(RosterError::store_unavailable("x").status_code(), 500);
        assert_eq!(
            RosterError::IngestionFailed("x".to_string()).status_code(),
            500
        );
    }

    #[test]
    fn body_carries_code_and_message() {
        let roster = create_test_roster();
        roster.create(&sample_draft("ada@example.com")).unwrap();
        let err = roster.create(&sample_draft("ada@example.com")).unwrap_err();

        let body = err.body();
        assert_eq!(body.status_code, 400);
        assert_eq!(body.message, "There is already a user with that email address");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["statusCode"], 400);
        assert!(json["message"].is_string());
    }

    #[test]
    fn not_found_body() {
        let roster = create_test_roster();
        let err = roster
            .delete(&rosterdb::RecordId::new().to_string())
            .unwrap_err();

        let body = err.body();
        assert_eq!(body.status_code, 404);
        assert_eq!(body.message, "User not found");
    }
}

// ============================================================================
// Full Scenario
// ============================================================================

mod full_scenario {
    use super::*;

    #[test]
    fn create_update_delete_round_trip() {
        let roster = create_test_roster();

        // Create
        let mut draft = sample_draft("grace@example.com");
        draft.marketing_source = Some("Conference".to_string());
        let record = roster.create(&draft).unwrap();
        assert_eq!(record.marketing_source, "Conference");

        // Appears in the list
        let page = roster.list(&QueryRequest::default()).unwrap();
        assert_eq!(page.data.len(), 1);

        // Update two fields
        let patch = RecordPatch {
            phone: Some("+1 555 000 1111".to_string()),
            status: Some("ACTIVE".to_string()),
            ..Default::default()
        };
        let updated = roster.update(&record.id.to_string(), &patch).unwrap();
        assert_eq!(updated.phone, "+1 555 000 1111");
        assert_eq!(updated.status, "ACTIVE");
        assert!(updated.updated_at >= record.updated_at);

        // Soft delete
        let deleted = roster.delete(&record.id.to_string()).unwrap();
        assert!(deleted.is_deleted);

        // Gone from the list, id no longer addressable
        let page = roster.list(&QueryRequest::default()).unwrap();
        assert!(page.data.is_empty());
        assert!(matches!(
            roster.delete(&record.id.to_string()).unwrap_err(),
            RosterError::NotFound
        ));

        // But the email is still spoken for
        assert!(matches!(
            roster.create(&sample_draft("grace@example.com")).unwrap_err(),
            RosterError::DuplicateKey
        ));
    }

    #[test]
    fn filtered_query_sees_updates_until_the_record_is_deleted() {
        let roster = create_test_roster();
        let record = roster.create(&sample_draft("a@x.com")).unwrap();

        // A second claim on the address loses with the fixed message.
        let err = roster.create(&sample_draft("a@x.com")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "There is already a user with that email address"
        );

        let patch = RecordPatch {
            marketing_source: Some("Instagram".to_string()),
            ..Default::default()
        };
        roster.update(&record.id.to_string(), &patch).unwrap();

        // Querying by the untouched name field surfaces the new value.
        let mut request = QueryRequest {
            sort_by: Some("createdAt".to_string()),
            ..Default::default()
        };
        request
            .filters
            .insert("firstName".to_string(), serde_json::json!("John"));
        let page = roster.list(&request).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].marketing_source, "Instagram");

        roster.delete(&record.id.to_string()).unwrap();
        let err = roster.delete(&record.id.to_string()).unwrap_err();
        assert!(matches!(err, RosterError::NotFound));
    }
}
