// HTTP bindings for the staff portal REST API
//
// One method per endpoint the workflows consume. Every server-side failure
// is mapped into a typed ClientError here so callers never inspect raw
// responses.

pub mod error;

use chrono::NaiveDate;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::types::{
    DocumentPage, DocumentType, NotificationEvent, StaffAccount, StaffInfo, VerifyOutcome,
};
use error::ClientError;

/// Fields submitted when issuing a new document
#[derive(Debug, Clone)]
pub struct NewDocumentUpload {
    pub doc_owner_name: String,
    pub doc_owner_ic: String,
    pub doc_type: String,
    pub issuer_name: String,
    pub issue_date: NaiveDate,
}

/// Fields submitted when an administrator creates a staff account
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub staff_id: String,
    pub account_holder_name: String,
    pub email: String,
    pub password: String,
    pub is_super: bool,
}

#[derive(Debug, Deserialize)]
struct NameResponse {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    status: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    download_url: String,
}

/// Thin wrapper over reqwest bound to one portal base URL
///
/// Holds the cookie-backed session, so one client instance spans login
/// through logout.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PortalClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let config = crate::config::config();
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn from_config() -> Result<Self, ClientError> {
        Self::new(&crate::config::config().portal.base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Map a non-success response into the error taxonomy. Conflict bodies
    /// carry `{status, message}`; everything else carries `{detail}`.
    async fn response_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if body.get("status").and_then(Value::as_str) == Some("soft_deleted_conflict") {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Target slot is occupied by a soft-deleted record")
                .to_string();
            return ClientError::SoftDeleteConflict { message };
        }

        let detail = body
            .get("detail")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ClientError::Unauthorized(detail);
        }

        ClientError::Api {
            status: status.as_u16(),
            detail,
        }
    }

    async fn expect_ok(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::response_error(response).await)
        }
    }

    // ---- session -----------------------------------------------------------

    /// Authenticate and establish the cookie session
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let form = multipart::Form::new()
            .text("email", email.to_string())
            .text("password", password.to_string());

        let response = self
            .http
            .post(self.url("/login")?)
            .multipart(form)
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    /// Fetch the account attached to the current session cookie
    pub async fn current_user(&self) -> Result<StaffAccount, ClientError> {
        let response = self.http.get(self.url("/user")?).send().await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    // ---- document listings -------------------------------------------------

    pub async fn get_documents(
        &self,
        owner_ic: &str,
        doc_type: Option<DocumentType>,
        page: u64,
        limit: u64,
    ) -> Result<DocumentPage, ClientError> {
        self.fetch_listing("/get-document", owner_ic, doc_type, page, limit)
            .await
    }

    pub async fn get_soft_deleted_documents(
        &self,
        owner_ic: &str,
        doc_type: Option<DocumentType>,
        page: u64,
        limit: u64,
    ) -> Result<DocumentPage, ClientError> {
        self.fetch_listing("/get-soft-deleted-document", owner_ic, doc_type, page, limit)
            .await
    }

    async fn fetch_listing(
        &self,
        path: &str,
        owner_ic: &str,
        doc_type: Option<DocumentType>,
        page: u64,
        limit: u64,
    ) -> Result<DocumentPage, ClientError> {
        if crate::config::config().http.enable_request_logging {
            tracing::debug!(path, owner_ic, page, "fetching document listing");
        }

        let doc_type = doc_type.map(|t| t.to_string()).unwrap_or_default();
        let response = self
            .http
            .get(self.url(path)?)
            .query(&[
                ("owner_ic", owner_ic.to_string()),
                ("doc_type", doc_type),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        Ok(Self::expect_ok(response).await?.json().await?)
    }

    // ---- owner identity lookups --------------------------------------------

    /// Resolve an IC to the registered owner name; the server answers with
    /// an error status when the IC is unknown
    pub async fn check_ic_exists(&self, doc_owner_ic: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .get(self.url("/check-ic-exist")?)
            .query(&[("doc_owner_ic", doc_owner_ic)])
            .send()
            .await?;

        let body: NameResponse = Self::expect_ok(response).await?.json().await?;
        body.name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ClientError::Api {
                status: 404,
                detail: format!("No registered owner for IC {}", doc_owner_ic),
            })
    }

    /// Pre-submission name lookup; a missing name comes back as `None`
    /// rather than an error so the submitter can abort with its own message
    pub async fn get_owner_name(&self, doc_owner_ic: &str) -> Result<Option<String>, ClientError> {
        let response = self
            .http
            .get(self.url("/get-owner-name")?)
            .query(&[("doc_owner_ic", doc_owner_ic)])
            .send()
            .await?;

        let body: NameResponse = Self::expect_ok(response).await?.json().await?;
        Ok(body.name.filter(|n| !n.is_empty()))
    }

    // ---- edits and conflicts -----------------------------------------------

    /// Pre-flight conflict probe; Ok(()) means the changed fields can be
    /// written without touching a soft-deleted occupant
    pub async fn check_conflict(
        &self,
        encrypted_id: &str,
        changed: &Map<String, Value>,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/check-conflict/{}", encrypted_id))?)
            .json(changed)
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    /// Write changed fields; returns the subset of fields the server
    /// actually accepted
    pub async fn edit_document(
        &self,
        encrypted_id: &str,
        account_id: &str,
        changed: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/edit/{}", encrypted_id))?)
            .query(&[("account_id", account_id)])
            .json(changed)
            .send()
            .await?;

        Ok(Self::expect_ok(response).await?.json().await?)
    }

    pub async fn delete_document(
        &self,
        encrypted_id: &str,
        acc_id: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/delete/{}", encrypted_id))?)
            .query(&[("acc_id", acc_id)])
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    // ---- recovery ----------------------------------------------------------

    pub async fn recover_documents(
        &self,
        encrypted_doc_ids: &[String],
        account_id: &str,
    ) -> Result<String, ClientError> {
        let body = serde_json::json!({
            "encrypted_doc_ids": encrypted_doc_ids,
            "account_id": account_id,
        });

        let response = self
            .http
            .post(self.url("/recover-documents")?)
            .json(&body)
            .send()
            .await?;

        let body: MessageResponse = Self::expect_ok(response).await?.json().await?;
        Ok(body.message)
    }

    // ---- authentication of uploaded copies ---------------------------------

    /// Submit a candidate PDF for comparison against the stored original
    pub async fn verify_document(
        &self,
        encrypted_doc_id: &str,
        file: &Path,
    ) -> Result<(VerifyOutcome, String), ClientError> {
        let form = multipart::Form::new()
            .text("encrypted_doc_id", encrypted_doc_id.to_string())
            .part("file", Self::pdf_part(file).await?);

        let response = self
            .http
            .post(self.url("/verify")?)
            .multipart(form)
            .send()
            .await?;

        let body: VerifyResponse = Self::expect_ok(response).await?.json().await?;
        let outcome = if body.status == "valid" {
            VerifyOutcome::Valid
        } else {
            VerifyOutcome::Invalid
        };
        Ok((outcome, body.message))
    }

    // ---- issuance ----------------------------------------------------------

    pub async fn upload_document(
        &self,
        upload: &NewDocumentUpload,
        file: &Path,
    ) -> Result<String, ClientError> {
        let form = multipart::Form::new()
            .text("doc_owner_name", upload.doc_owner_name.clone())
            .text("doc_owner_ic", upload.doc_owner_ic.clone())
            .text("doc_type", upload.doc_type.clone())
            .text("issuer_name", upload.issuer_name.clone())
            .text("issue_date", upload.issue_date.to_string())
            .part("file", Self::pdf_part(file).await?);

        let response = self
            .http
            .post(self.url("/upload")?)
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = Self::expect_ok(response).await?.json().await?;
        Ok(body.download_url)
    }

    async fn pdf_part(file: &Path) -> Result<multipart::Part, ClientError> {
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        Ok(multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?)
    }

    // ---- staff administration ----------------------------------------------

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<(), ClientError> {
        let form = multipart::Form::new()
            .text("staff_id", request.staff_id.clone())
            .text("account_holder_name", request.account_holder_name.clone())
            .text("email", request.email.clone())
            .text("password", request.password.clone())
            .text("is_super", request.is_super.to_string());

        let response = self
            .http
            .post(self.url("/create-user")?)
            .multipart(form)
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    pub async fn staff_info(&self, email: &str) -> Result<StaffInfo, ClientError> {
        let response = self
            .http
            .get(self.url("/staff-info")?)
            .query(&[("email", email)])
            .send()
            .await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    /// Email suggestion list backing the create-user override validation
    pub async fn available_staff_emails(&self, search: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .http
            .get(self.url("/available-staff-emails")?)
            .query(&[("search", search)])
            .send()
            .await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    // ---- notifications -----------------------------------------------------

    pub async fn notifications(
        &self,
        account_id: &str,
    ) -> Result<Vec<NotificationEvent>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/notifications/{}", account_id))?)
            .send()
            .await?;
        Ok(Self::expect_ok(response).await?.json().await?)
    }

    pub async fn mark_notification_read(
        &self,
        notification_id: &str,
        account_id: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/notifications/{}/read", notification_id))?)
            .query(&[("account_id", account_id)])
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self, account_id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/notifications/{}/read-all", account_id))?)
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }
}
