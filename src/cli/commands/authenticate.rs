use std::path::PathBuf;

use clap::Args;

use crate::cli::commands::documents::find_document;
use crate::cli::utils::{establish_session, output_error, output_success};
use crate::cli::{Credentials, OutputFormat};
use crate::types::VerifyOutcome;
use crate::workflow::authenticate::AuthenticateWorkflow;
use crate::workflow::listing::ListingScope;

#[derive(Args)]
pub struct AuthenticateArgs {
    #[arg(help = "Owner IC of the document in canonical form")]
    pub owner_ic: String,
    #[arg(help = "Encrypted document id")]
    pub encrypted_id: String,
    #[arg(help = "PDF copy (with QR) to authenticate")]
    pub file: PathBuf,
}

pub async fn handle(
    args: AuthenticateArgs,
    credentials: &Credentials,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let session = establish_session(credentials).await?;

    let result = async {
        let document = find_document(
            &session,
            &args.owner_ic,
            &args.encrypted_id,
            ListingScope::Active,
        )
        .await?;

        let mut workflow = AuthenticateWorkflow::new(session.client().clone(), document);
        workflow.select_file(&args.file);

        match workflow.authenticate().await {
            Ok((VerifyOutcome::Valid, message)) => output_success(
                &output_format,
                &message,
                Some(serde_json::json!({ "status": "valid" })),
            ),
            Ok((VerifyOutcome::Invalid, message)) => {
                output_error(&output_format, &message)?;
                output_error(&output_format, "Authenticate status: Invalid")?;
                Ok(())
            }
            Err(err) => {
                output_error(&output_format, &err.to_string())?;
                Err(err.into())
            }
        }
    }
    .await;

    session.logout();
    result
}
