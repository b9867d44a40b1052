// Shared wire types used across the codebase.
//
// Field names follow the portal API payloads verbatim so the serde derives
// stay free of rename attributes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Document categories issued by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DocumentType {
    #[serde(rename = "IC")]
    Ic,
    #[serde(rename = "BRG_PENGESAHAN_BRN")]
    BrgPengesahanBrn,
}

impl DocumentType {
    pub const ALL: &'static [DocumentType] = &[DocumentType::Ic, DocumentType::BrgPengesahanBrn];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Ic => "IC",
            DocumentType::BrgPengesahanBrn => "BRG_PENGESAHAN_BRN",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IC" => Ok(DocumentType::Ic),
            "BRG_PENGESAHAN_BRN" => Ok(DocumentType::BrgPengesahanBrn),
            other => Err(format!("Unknown document type: {}", other)),
        }
    }
}

/// One issued document as returned by the listing and edit endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_record_id: String,
    /// Opaque URL-safe identifier; stands in for the primary key in every
    /// external reference
    pub doc_encrypted_id: String,
    pub doc_owner_name: String,
    pub doc_owner_ic: String,
    pub document_type: String,
    pub issuer_id: i64,
    pub issuer_name: String,
    pub issue_date: NaiveDate,
    pub verification_url: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_by: Option<String>,
    #[serde(default)]
    pub deleted_by_name: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One page of a server-paginated document listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPage {
    pub documents: Vec<DocumentRecord>,
    pub total: u64,
}

/// Outcome of authenticating an uploaded copy against the stored original
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    Invalid,
}

/// Authenticated staff account as returned by the session endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAccount {
    pub id: String,
    pub email: String,
    pub account_holder_name: String,
    pub is_super: bool,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Staff directory entry from the admin endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffInfo {
    pub staff_id: String,
    pub full_name: String,
    #[serde(default)]
    pub job_title: Option<String>,
}

/// One notification delivered over the feed or the push source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub notification_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub has_read: bool,
}
