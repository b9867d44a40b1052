// Conflict-aware edit submitter.
//
// Submits only changed fields, resolves the owner name before any IC change
// leaves the client, and turns the server's soft-delete conflict signal
// into an explicit confirm/override step instead of a silent overwrite.

use serde_json::{Map, Value};

use crate::client::error::ClientError;
use crate::client::PortalClient;
use crate::types::DocumentRecord;
use crate::validate::form::{FormState, FormValues};
use crate::validate::ic::{final_ic_error, IcField, IC_LEN};

use super::error::WorkflowError;

/// Fields the edit form may change; issuer identity and issue date are
/// immutable post-creation
pub const EDITABLE_FIELDS: &[&str] = &["doc_owner_name", "doc_owner_ic", "document_type"];

/// Submission lifecycle. `Success`, `Failed` and `Cancelled` are terminal
/// per attempt; the next `submit` starts a fresh attempt from any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    ConflictPending,
    OverrideSubmitting,
    Success,
    Failed,
    Cancelled,
}

impl SubmitState {
    fn in_flight(self) -> bool {
        matches!(self, SubmitState::Submitting | SubmitState::OverrideSubmitting)
    }
}

/// The server reported a soft-deleted occupant of the target slot; holds
/// the would-be changed fields until the user confirms or cancels
#[derive(Debug, Clone)]
pub struct PendingConflict {
    pub message: String,
    pub changed_fields: FormValues,
}

/// Outcome of a completed submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The server accepted these fields; local state reflects exactly them
    Updated(Map<String, Value>),
    /// A soft-delete conflict needs explicit confirmation
    ConflictPending,
}

pub struct EditWorkflow {
    client: PortalClient,
    account_id: String,
    document: DocumentRecord,
    form: FormState,
    ic_field: IcField,
    /// Last IC the server successfully resolved to an owner name
    last_resolved_ic: Option<String>,
    state: SubmitState,
    pending: Option<PendingConflict>,
}

impl EditWorkflow {
    /// Capture the server-supplied record as the immutable original and
    /// seed the form from it
    pub fn new(client: PortalClient, account_id: impl Into<String>, document: DocumentRecord) -> Self {
        let mut initial = FormValues::new();
        initial.insert("doc_owner_name".into(), document.doc_owner_name.clone());
        initial.insert("doc_owner_ic".into(), document.doc_owner_ic.clone());
        initial.insert("document_type".into(), document.document_type.clone());

        let form = FormState::new(initial)
            .rule("doc_owner_ic", |value, _| {
                if value.is_empty() {
                    Some("Document owner IC is required".to_string())
                } else {
                    final_ic_error(value)
                }
            })
            .rule("document_type", |value, _| {
                value
                    .is_empty()
                    .then(|| "Document type is required".to_string())
            });

        let ic_field = IcField::with_value(document.doc_owner_ic.clone());

        Self {
            client,
            account_id: account_id.into(),
            document,
            form,
            ic_field,
            last_resolved_ic: None,
            state: SubmitState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn document(&self) -> &DocumentRecord {
        &self.document
    }

    pub fn pending_conflict(&self) -> Option<&PendingConflict> {
        self.pending.as_ref()
    }

    pub fn ic_live_error(&self) -> Option<&str> {
        self.ic_field.live_error()
    }

    // ---- field events ------------------------------------------------------

    /// One keystroke worth of IC input: live rules first, then owner-name
    /// resolution once the value reaches full length
    pub async fn input_owner_ic(&mut self, raw: &str) {
        self.ic_field.input(raw);
        let value = self.ic_field.value().to_string();
        self.form.set_value("doc_owner_ic", value.clone());

        if value.chars().count() == IC_LEN {
            self.resolve_owner_name(&value).await;
        } else {
            self.form.set_value("doc_owner_name", "");
            self.last_resolved_ic = None;
        }
    }

    /// Focus loss on the IC field: final-format check, then re-resolution
    /// of the owner name when the value is complete
    pub async fn blur_owner_ic(&mut self) {
        let value = self.ic_field.value().to_string();
        if let Some(error) = self.ic_field.blur() {
            let message = error.to_string();
            self.form.set_error("doc_owner_ic", message);
            return;
        }
        self.form.validate_field("doc_owner_ic", &value);
        self.resolve_owner_name(&value).await;
    }

    pub fn set_document_type(&mut self, value: &str) {
        self.form.handle_change("document_type", value);
    }

    async fn resolve_owner_name(&mut self, ic: &str) {
        match self.client.check_ic_exists(ic).await {
            Ok(name) => {
                self.form.set_value("doc_owner_name", name);
                self.form.set_error("doc_owner_name", "");
                self.last_resolved_ic = Some(ic.to_string());
                self.form.validate_field("doc_owner_ic", ic);
            }
            Err(err) => {
                tracing::debug!(ic, error = %err, "owner name lookup failed");
                self.form.set_value("doc_owner_name", "");
                self.form.validate_field("doc_owner_ic", ic);
                self.form.set_error("doc_owner_name", err.to_string());
                self.last_resolved_ic = None;
            }
        }
    }

    // ---- changed-field detection -------------------------------------------

    pub fn changed_fields(&self) -> FormValues {
        self.form.changed_fields(EDITABLE_FIELDS)
    }

    /// Submit-enablement: at least one editable field differs from the
    /// original. An IC change whose owner name is still unresolved counts
    /// as not modified, so a half-resolved edit can never be submitted.
    pub fn is_modified(&self) -> bool {
        let changed = self.changed_fields();
        if changed.contains_key("doc_owner_ic") && self.form.value("doc_owner_name").is_empty() {
            return false;
        }
        !changed.is_empty()
    }

    // ---- submission --------------------------------------------------------

    /// Run the full submit pass: validation gate, owner-name resolution for
    /// IC changes, pre-flight conflict check, then the write itself
    pub async fn submit(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        if self.state.in_flight() {
            return Err(WorkflowError::Busy);
        }
        if self.state == SubmitState::ConflictPending {
            return Err(WorkflowError::Validation(
                "Resolve the pending conflict before submitting again".to_string(),
            ));
        }

        self.state = SubmitState::Validating;
        if !self.form.validate_all() {
            self.state = SubmitState::Failed;
            return Err(WorkflowError::Validation(
                "One or more fields are invalid".to_string(),
            ));
        }

        let mut changed = self.changed_fields();
        if changed.is_empty() {
            self.state = SubmitState::Failed;
            return Err(WorkflowError::Validation("No fields changed".to_string()));
        }

        if let Some(ic) = changed.get("doc_owner_ic").cloned() {
            // A name carried over from an earlier, different IC is stale
            if self.last_resolved_ic.as_deref() != Some(ic.as_str()) {
                self.form.set_value("doc_owner_name", "");
                changed.remove("doc_owner_name");
            }

            if !changed.contains_key("doc_owner_name") {
                match self.client.get_owner_name(&ic).await {
                    Ok(Some(name)) => {
                        changed.insert("doc_owner_name".to_string(), name.clone());
                        self.form.set_value("doc_owner_name", name);
                        self.last_resolved_ic = Some(ic);
                    }
                    Ok(None) => {
                        self.state = SubmitState::Failed;
                        return Err(WorkflowError::OwnerLookup(
                            "Could not fetch owner name for the new IC".to_string(),
                        ));
                    }
                    Err(err) => {
                        self.state = SubmitState::Failed;
                        return Err(WorkflowError::OwnerLookup(err.to_string()));
                    }
                }
            }
        }

        self.state = SubmitState::Submitting;
        let body = to_wire(&changed);

        if let Err(err) = self
            .client
            .check_conflict(&self.document.doc_encrypted_id, &body)
            .await
        {
            return self.handle_submit_error(err, changed);
        }

        match self
            .client
            .edit_document(&self.document.doc_encrypted_id, &self.account_id, &body)
            .await
        {
            Ok(accepted) => {
                self.apply_accepted(&accepted);
                self.state = SubmitState::Success;
                Ok(SubmitOutcome::Updated(accepted))
            }
            Err(err) => self.handle_submit_error(err, changed),
        }
    }

    fn handle_submit_error(
        &mut self,
        err: ClientError,
        changed: FormValues,
    ) -> Result<SubmitOutcome, WorkflowError> {
        match err {
            ClientError::SoftDeleteConflict { message } => {
                self.pending = Some(PendingConflict {
                    message,
                    changed_fields: changed,
                });
                self.state = SubmitState::ConflictPending;
                Ok(SubmitOutcome::ConflictPending)
            }
            other => {
                self.state = SubmitState::Failed;
                Err(other.into())
            }
        }
    }

    /// Confirm the override: resubmit the pending fields tagged so the
    /// server permanently replaces the soft-deleted occupant. Irreversible.
    pub async fn confirm_override(&mut self) -> Result<Map<String, Value>, WorkflowError> {
        if self.state.in_flight() {
            return Err(WorkflowError::Busy);
        }
        let pending = self.pending.take().ok_or(WorkflowError::NoPendingConflict)?;

        self.state = SubmitState::OverrideSubmitting;
        let mut body = to_wire(&pending.changed_fields);
        body.insert(
            "status".to_string(),
            Value::String("soft_delete_conflict".to_string()),
        );

        match self
            .client
            .edit_document(&self.document.doc_encrypted_id, &self.account_id, &body)
            .await
        {
            Ok(accepted) => {
                self.apply_accepted(&accepted);
                self.state = SubmitState::Success;
                Ok(accepted)
            }
            Err(err) => {
                tracing::warn!(error = %err, "conflict override failed");
                self.state = SubmitState::Failed;
                Err(err.into())
            }
        }
    }

    /// Discard the pending conflict without any network call
    pub fn cancel_override(&mut self) -> Result<(), WorkflowError> {
        if self.pending.take().is_none() {
            return Err(WorkflowError::NoPendingConflict);
        }
        self.state = SubmitState::Cancelled;
        Ok(())
    }

    /// Apply exactly the fields the server accepted, nothing more
    fn apply_accepted(&mut self, accepted: &Map<String, Value>) {
        for field in EDITABLE_FIELDS {
            if let Some(value) = accepted.get(*field).and_then(Value::as_str) {
                self.form.set_value(field, value);
            }
        }
        if let Some(ic) = accepted.get("doc_owner_ic").and_then(Value::as_str) {
            self.ic_field = IcField::with_value(ic);
        }
    }
}

fn to_wire(changed: &FormValues) -> Map<String, Value> {
    changed
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}
