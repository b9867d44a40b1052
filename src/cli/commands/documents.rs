use clap::Subcommand;

use crate::cli::utils::{establish_session, output_document_page, output_error, output_success};
use crate::cli::{Credentials, OutputFormat};
use crate::session::Session;
use crate::types::{DocumentRecord, DocumentType};
use crate::workflow::edit::{EditWorkflow, SubmitOutcome};
use crate::workflow::listing::{DocumentLister, ListingScope};

#[derive(Subcommand)]
pub enum DocsCommands {
    #[command(about = "Search issued documents by owner IC")]
    Search {
        #[arg(help = "Owner IC in canonical form (e.g. 123456-78-9012)")]
        owner_ic: String,
        #[arg(long, help = "Restrict to one document type")]
        doc_type: Option<DocumentType>,
        #[arg(long, default_value_t = 0, help = "Page to fetch (0-indexed)")]
        page: u64,
    },

    #[command(about = "Edit an issued document's owner or type")]
    Edit {
        #[arg(help = "Current owner IC of the document")]
        owner_ic: String,
        #[arg(help = "Encrypted document id")]
        encrypted_id: String,
        #[arg(long, help = "New owner IC")]
        new_owner_ic: Option<String>,
        #[arg(long, help = "New document type")]
        new_doc_type: Option<DocumentType>,
        #[arg(
            long,
            help = "Permanently replace a conflicting soft-deleted record; cannot be undone"
        )]
        replace_soft_deleted: bool,
    },

    #[command(about = "Soft-delete an issued document")]
    Delete {
        #[arg(help = "Encrypted document id")]
        encrypted_id: String,
    },
}

pub async fn handle(
    cmd: DocsCommands,
    credentials: &Credentials,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let session = establish_session(credentials).await?;

    let result = match cmd {
        DocsCommands::Search {
            owner_ic,
            doc_type,
            page,
        } => search(&session, &owner_ic, doc_type, page, &output_format).await,
        DocsCommands::Edit {
            owner_ic,
            encrypted_id,
            new_owner_ic,
            new_doc_type,
            replace_soft_deleted,
        } => {
            edit(
                &session,
                &owner_ic,
                &encrypted_id,
                new_owner_ic.as_deref(),
                new_doc_type,
                replace_soft_deleted,
                &output_format,
            )
            .await
        }
        DocsCommands::Delete { encrypted_id } => {
            delete(&session, &encrypted_id, &output_format).await
        }
    };

    session.logout();
    result
}

async fn search(
    session: &Session,
    owner_ic: &str,
    doc_type: Option<DocumentType>,
    page: u64,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let mut lister = DocumentLister::new(session.client().clone(), ListingScope::Active);
    if let Some(error) = lister.input_owner_ic(owner_ic) {
        output_error(output_format, error)?;
        return Err(anyhow::anyhow!("Invalid owner IC filter"));
    }
    lister.set_doc_type(doc_type);

    match lister.search(page).await {
        Ok(_) => output_document_page(
            output_format,
            lister.documents(),
            lister.total(),
            lister.current_page(),
        ),
        Err(err) => {
            output_error(output_format, &err.to_string())?;
            Err(err.into())
        }
    }
}

/// Walk the listing pages for `owner_ic` until the encrypted id shows up
pub async fn find_document(
    session: &Session,
    owner_ic: &str,
    encrypted_id: &str,
    scope: ListingScope,
) -> anyhow::Result<DocumentRecord> {
    let mut lister = DocumentLister::new(session.client().clone(), scope);
    if lister.input_owner_ic(owner_ic).is_some() || !lister.can_search() {
        return Err(anyhow::anyhow!("Owner IC must be in canonical form"));
    }

    let mut page = 0;
    loop {
        lister.search(page).await?;
        if let Some(doc) = lister
            .documents()
            .iter()
            .find(|d| d.doc_encrypted_id == encrypted_id)
        {
            return Ok(doc.clone());
        }
        page += 1;
        if page >= lister.page_count() {
            return Err(anyhow::anyhow!(
                "Document {} not found for owner {}",
                encrypted_id,
                owner_ic
            ));
        }
    }
}

async fn edit(
    session: &Session,
    owner_ic: &str,
    encrypted_id: &str,
    new_owner_ic: Option<&str>,
    new_doc_type: Option<DocumentType>,
    replace_soft_deleted: bool,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let document = find_document(session, owner_ic, encrypted_id, ListingScope::Active).await?;
    let mut workflow = EditWorkflow::new(
        session.client().clone(),
        session.account_id(),
        document,
    );

    if let Some(ic) = new_owner_ic {
        workflow.input_owner_ic(ic).await;
        if let Some(error) = workflow.ic_live_error() {
            output_error(output_format, error)?;
            return Err(anyhow::anyhow!("Invalid new owner IC"));
        }
    }
    if let Some(doc_type) = new_doc_type {
        workflow.set_document_type(doc_type.as_str());
    }

    if !workflow.is_modified() {
        output_error(output_format, "Nothing to change")?;
        return Ok(());
    }

    match workflow.submit().await {
        Ok(SubmitOutcome::Updated(accepted)) => output_success(
            output_format,
            "Document record updated successfully",
            Some(serde_json::Value::Object(accepted)),
        ),
        Ok(SubmitOutcome::ConflictPending) => {
            let message = workflow
                .pending_conflict()
                .map(|p| p.message.clone())
                .unwrap_or_default();

            if replace_soft_deleted {
                let accepted = workflow.confirm_override().await?;
                output_success(
                    output_format,
                    "Conflicting soft-deleted record permanently replaced",
                    Some(serde_json::Value::Object(accepted)),
                )
            } else {
                workflow.cancel_override()?;
                output_error(output_format, &message)?;
                output_error(
                    output_format,
                    "Re-run with --replace-soft-deleted to permanently replace it; this cannot be undone",
                )?;
                Ok(())
            }
        }
        Err(err) => {
            output_error(output_format, &err.to_string())?;
            Err(err.into())
        }
    }
}

async fn delete(
    session: &Session,
    encrypted_id: &str,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match session
        .client()
        .delete_document(encrypted_id, session.account_id())
        .await
    {
        Ok(()) => output_success(output_format, "Document soft-deleted", None),
        Err(err) => {
            output_error(output_format, &err.to_string())?;
            Err(err.into())
        }
    }
}
