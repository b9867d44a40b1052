// New-document issuance: form validation plus the multipart upload.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::client::{NewDocumentUpload, PortalClient};
use crate::validate::form::{FormState, FormValues};
use crate::validate::ic::{final_ic_error, IcField};

use super::error::WorkflowError;

pub struct NewDocumentWorkflow {
    client: PortalClient,
    form: FormState,
    ic_field: IcField,
    file: Option<PathBuf>,
    in_flight: bool,
}

impl NewDocumentWorkflow {
    pub fn new(client: PortalClient) -> Self {
        let mut initial = FormValues::new();
        for field in ["doc_owner_name", "doc_owner_ic", "doc_type", "issuer_name", "issue_date"] {
            initial.insert(field.to_string(), String::new());
        }

        let form = FormState::new(initial)
            .rule("doc_owner_name", |value, _| {
                value
                    .is_empty()
                    .then(|| "Document owner name is required".to_string())
            })
            .rule("doc_owner_ic", |value, _| {
                if value.is_empty() {
                    Some("Document owner IC is required".to_string())
                } else {
                    final_ic_error(value)
                }
            })
            .rule("doc_type", |value, _| {
                value
                    .is_empty()
                    .then(|| "Document type is required".to_string())
            })
            .rule("issuer_name", |value, _| {
                value
                    .is_empty()
                    .then(|| "Issuer name is required".to_string())
            })
            .rule("issue_date", |value, _| {
                if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                    Some("Issue date must be a valid date (YYYY-MM-DD)".to_string())
                } else {
                    None
                }
            });

        Self {
            client,
            form,
            ic_field: IcField::new(),
            file: None,
            in_flight: false,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn set_field(&mut self, field: &str, value: &str) {
        self.form.handle_change(field, value);
    }

    /// IC input goes through the same incremental rules as the edit and
    /// search contexts
    pub fn input_owner_ic(&mut self, raw: &str) -> Option<&str> {
        self.ic_field.input(raw);
        let value = self.ic_field.value().to_string();
        self.form.set_value("doc_owner_ic", value);
        self.ic_field.live_error()
    }

    pub fn blur_owner_ic(&mut self) -> Option<&str> {
        let error = self.ic_field.blur().map(str::to_string);
        match &error {
            Some(message) => self.form.set_error("doc_owner_ic", message.clone()),
            None => {
                let value = self.ic_field.value().to_string();
                self.form.validate_field("doc_owner_ic", &value);
            }
        }
        self.ic_field.live_error()
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.file = Some(path.into());
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some()
    }

    /// Validate, then post the document fields and PDF; returns the
    /// download URL of the issued copy. The form resets on success.
    pub async fn submit(&mut self) -> Result<String, WorkflowError> {
        if self.in_flight {
            return Err(WorkflowError::Busy);
        }
        if !self.form.validate_all() {
            return Err(WorkflowError::Validation(
                "One or more fields are invalid".to_string(),
            ));
        }
        let file = self.file.clone().ok_or(WorkflowError::NoFile)?;

        let issue_date = NaiveDate::parse_from_str(self.form.value("issue_date"), "%Y-%m-%d")
            .map_err(|_| {
                WorkflowError::Validation("Issue date must be a valid date (YYYY-MM-DD)".to_string())
            })?;

        let upload = NewDocumentUpload {
            doc_owner_name: self.form.value("doc_owner_name").to_string(),
            doc_owner_ic: self.form.value("doc_owner_ic").to_string(),
            doc_type: self.form.value("doc_type").to_string(),
            issuer_name: self.form.value("issuer_name").to_string(),
            issue_date,
        };

        self.in_flight = true;
        let result = self.client.upload_document(&upload, &file).await;
        self.in_flight = false;

        let download_url = result?;
        self.form.reset();
        self.ic_field = IcField::new();
        self.file = None;
        Ok(download_url)
    }
}
