use clap::Subcommand;

use crate::cli::utils::{establish_session, output_document_page, output_error, output_success};
use crate::cli::{Credentials, OutputFormat};
use crate::types::DocumentType;
use crate::workflow::recover::RecoverWorkflow;

#[derive(Subcommand)]
pub enum RecoverCommands {
    #[command(about = "List soft-deleted documents for an owner IC")]
    List {
        #[arg(help = "Owner IC in canonical form")]
        owner_ic: String,
        #[arg(long, help = "Restrict to one document type")]
        doc_type: Option<DocumentType>,
        #[arg(long, default_value_t = 0, help = "Page to fetch (0-indexed)")]
        page: u64,
    },

    #[command(about = "Recover a batch of soft-deleted documents")]
    Run {
        #[arg(help = "Owner IC in canonical form")]
        owner_ic: String,
        #[arg(required = true, help = "Encrypted document ids to recover")]
        encrypted_ids: Vec<String>,
    },
}

pub async fn handle(
    cmd: RecoverCommands,
    credentials: &Credentials,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let session = establish_session(credentials).await?;

    let result = match cmd {
        RecoverCommands::List {
            owner_ic,
            doc_type,
            page,
        } => {
            let mut workflow = RecoverWorkflow::new(session.client().clone(), session.account_id());
            let lister = workflow.lister_mut();
            if let Some(error) = lister.input_owner_ic(&owner_ic) {
                output_error(&output_format, error)?;
                return Err(anyhow::anyhow!("Invalid owner IC filter"));
            }
            lister.set_doc_type(doc_type);

            match lister.search(page).await {
                Ok(_) => {
                    let lister = workflow.lister();
                    output_document_page(
                        &output_format,
                        lister.documents(),
                        lister.total(),
                        lister.current_page(),
                    )
                }
                Err(err) => {
                    output_error(&output_format, &err.to_string())?;
                    Err(err.into())
                }
            }
        }
        RecoverCommands::Run {
            owner_ic,
            encrypted_ids,
        } => {
            let mut workflow = RecoverWorkflow::new(session.client().clone(), session.account_id());
            if let Some(error) = workflow.lister_mut().input_owner_ic(&owner_ic) {
                output_error(&output_format, error)?;
                return Err(anyhow::anyhow!("Invalid owner IC filter"));
            }

            for id in &encrypted_ids {
                workflow.toggle(id);
            }

            match workflow.confirm_recover().await {
                Ok(message) => output_success(
                    &output_format,
                    &message,
                    Some(serde_json::json!({ "recovered": encrypted_ids })),
                ),
                Err(err) => {
                    output_error(&output_format, &err.to_string())?;
                    Err(err.into())
                }
            }
        }
    };

    session.logout();
    result
}
