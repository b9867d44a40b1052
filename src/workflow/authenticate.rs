// Authenticate an uploaded copy against the stored original.

use std::path::{Path, PathBuf};

use crate::client::PortalClient;
use crate::types::{DocumentRecord, VerifyOutcome};

use super::error::WorkflowError;

pub struct AuthenticateWorkflow {
    client: PortalClient,
    document: DocumentRecord,
    /// At most one candidate file; selecting a new one supersedes the old
    file: Option<PathBuf>,
    status: Option<VerifyOutcome>,
    in_flight: bool,
}

impl AuthenticateWorkflow {
    pub fn new(client: PortalClient, document: DocumentRecord) -> Self {
        Self {
            client,
            document,
            file: None,
            status: None,
            in_flight: false,
        }
    }

    pub fn document(&self) -> &DocumentRecord {
        &self.document
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.file = Some(path.into());
        self.status = None;
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn status(&self) -> Option<VerifyOutcome> {
        self.status
    }

    pub fn can_authenticate(&self) -> bool {
        self.file.is_some()
    }

    /// Submit the candidate file for comparison against the stored original
    pub async fn authenticate(&mut self) -> Result<(VerifyOutcome, String), WorkflowError> {
        let file = self.file.clone().ok_or(WorkflowError::NoFile)?;
        if self.in_flight {
            return Err(WorkflowError::Busy);
        }

        self.in_flight = true;
        let result = self
            .client
            .verify_document(&self.document.doc_encrypted_id, &file)
            .await;
        self.in_flight = false;

        let (outcome, message) = result?;
        self.status = Some(outcome);
        Ok((outcome, message))
    }

    /// Drop the candidate file and any recorded outcome
    pub fn clear(&mut self) {
        self.file = None;
        self.status = None;
    }
}
