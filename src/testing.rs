// Test fixtures shared by the unit tests.

use chrono::NaiveDate;

use crate::client::PortalClient;
use crate::types::DocumentRecord;

/// A client pointed at a port nothing listens on; fine for tests that
/// never touch the network
pub fn offline_client() -> PortalClient {
    PortalClient::new("http://localhost:1").expect("static URL parses")
}

pub fn sample_record() -> DocumentRecord {
    DocumentRecord {
        doc_record_id: "1".into(),
        doc_encrypted_id: "enc-1".into(),
        doc_owner_name: "Aminah binti Hassan".into(),
        doc_owner_ic: "880808-08-8888".into(),
        document_type: "IC".into(),
        issuer_id: 1,
        issuer_name: "JPN".into(),
        issue_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
        verification_url: None,
        is_deleted: false,
        deleted_by: None,
        deleted_by_name: None,
        deleted_at: None,
    }
}
