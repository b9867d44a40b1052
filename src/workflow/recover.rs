// Bulk recovery of soft-deleted documents: a selection set that survives
// pagination, submitted as one batch.

use std::collections::BTreeSet;

use crate::client::PortalClient;

use super::error::WorkflowError;
use super::listing::{DocumentLister, ListingScope};

pub struct RecoverWorkflow {
    client: PortalClient,
    account_id: String,
    lister: DocumentLister,
    selection: BTreeSet<String>,
    in_flight: bool,
}

impl RecoverWorkflow {
    pub fn new(client: PortalClient, account_id: impl Into<String>) -> Self {
        let lister = DocumentLister::new(client.clone(), ListingScope::SoftDeleted);
        Self {
            client,
            account_id: account_id.into(),
            lister,
            selection: BTreeSet::new(),
            in_flight: false,
        }
    }

    pub fn lister(&self) -> &DocumentLister {
        &self.lister
    }

    pub fn lister_mut(&mut self) -> &mut DocumentLister {
        &mut self.lister
    }

    // ---- selection ---------------------------------------------------------

    /// Flip membership of one encrypted id; idempotent in the sense that
    /// two toggles restore the prior state regardless of order
    pub fn toggle(&mut self, encrypted_id: &str) {
        if !self.selection.remove(encrypted_id) {
            self.selection.insert(encrypted_id.to_string());
        }
    }

    pub fn is_selected(&self, encrypted_id: &str) -> bool {
        self.selection.contains(encrypted_id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selection.iter().map(String::as_str)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn can_recover(&self) -> bool {
        !self.selection.is_empty()
    }

    // ---- recovery ----------------------------------------------------------

    /// Post the full selection as one batch. Success clears the selection
    /// and refreshes page 0; failure keeps the selection so the user can
    /// retry without re-selecting.
    pub async fn confirm_recover(&mut self) -> Result<String, WorkflowError> {
        if self.selection.is_empty() {
            return Err(WorkflowError::EmptySelection);
        }
        if self.in_flight {
            return Err(WorkflowError::Busy);
        }

        let ids: Vec<String> = self.selection.iter().cloned().collect();

        self.in_flight = true;
        let result = self.client.recover_documents(&ids, &self.account_id).await;
        self.in_flight = false;

        let message = result?;
        self.selection.clear();

        if let Err(err) = self.lister.search(0).await {
            // The recovery itself succeeded; a failed refresh only leaves
            // the listing stale
            tracing::warn!(error = %err, "listing refresh after recovery failed");
        }

        Ok(message)
    }
}
