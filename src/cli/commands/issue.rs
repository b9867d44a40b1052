use std::path::PathBuf;

use clap::Args;

use crate::cli::utils::{establish_session, output_error, output_success};
use crate::cli::{Credentials, OutputFormat};
use crate::types::DocumentType;
use crate::workflow::create::NewDocumentWorkflow;

#[derive(Args)]
pub struct IssueArgs {
    #[arg(long, help = "Document owner name")]
    pub owner_name: String,
    #[arg(long, help = "Document owner IC in canonical form")]
    pub owner_ic: String,
    #[arg(long, help = "Document type")]
    pub doc_type: DocumentType,
    #[arg(long, help = "Issuer name")]
    pub issuer_name: String,
    #[arg(long, help = "Issue date (YYYY-MM-DD)")]
    pub issue_date: String,
    #[arg(help = "PDF to issue")]
    pub file: PathBuf,
}

pub async fn handle(
    args: IssueArgs,
    credentials: &Credentials,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let session = establish_session(credentials).await?;

    let mut workflow = NewDocumentWorkflow::new(session.client().clone());
    workflow.set_field("doc_owner_name", &args.owner_name);
    if workflow.input_owner_ic(&args.owner_ic).is_some() {
        output_error(&output_format, "Owner IC must be in canonical form")?;
        session.logout();
        return Err(anyhow::anyhow!("Invalid owner IC"));
    }
    workflow.set_field("doc_type", args.doc_type.as_str());
    workflow.set_field("issuer_name", &args.issuer_name);
    workflow.set_field("issue_date", &args.issue_date);
    workflow.select_file(&args.file);

    let result = match workflow.submit().await {
        Ok(download_url) => output_success(
            &output_format,
            "Document issued",
            Some(serde_json::json!({ "download_url": download_url })),
        ),
        Err(err) => {
            for (field, error) in workflow.form().errors() {
                output_error(&output_format, &format!("{}: {}", field, error))?;
            }
            output_error(&output_format, &err.to_string())?;
            Err(err.into())
        }
    };

    session.logout();
    result
}
