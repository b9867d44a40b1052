use clap::Subcommand;

use crate::cli::utils::{establish_session, output_error, output_success};
use crate::cli::{Credentials, OutputFormat};
use crate::client::CreateUserRequest;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a staff account (super users only)")]
    Create {
        #[arg(long, help = "Staff id")]
        staff_id: String,
        #[arg(long, help = "Account holder name")]
        name: String,
        #[arg(long, help = "Staff email; must come from the available list")]
        email: String,
        #[arg(long, help = "Initial password (minimum 5 characters)")]
        password: String,
        #[arg(long, help = "Grant super-user permission")]
        super_user: bool,
    },

    #[command(about = "Show a staff member's directory info")]
    Info {
        #[arg(help = "Staff email")]
        email: String,
    },

    #[command(about = "List staff emails still available for account creation")]
    Emails {
        #[arg(help = "Search term (minimum 3 characters)")]
        search: String,
    },

    #[command(about = "Show the account behind the current credentials")]
    Whoami,
}

pub async fn handle(
    cmd: UserCommands,
    credentials: &Credentials,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let session = establish_session(credentials).await?;

    let result = match cmd {
        UserCommands::Create {
            staff_id,
            name,
            email,
            password,
            super_user,
        } => {
            if !session.is_super() {
                output_error(&output_format, "Only super users can create accounts")?;
                session.logout();
                return Err(anyhow::anyhow!("Not a super user"));
            }
            if password.len() < 5 {
                output_error(&output_format, "Password must be at least 5 characters")?;
                session.logout();
                return Err(anyhow::anyhow!("Password too short"));
            }

            // The email must come from the server's available list, the
            // same check the create-user form runs on blur
            let available = session.client().available_staff_emails(&email).await?;
            if !available.iter().any(|e| e == &email) {
                output_error(&output_format, "Please select an email from the suggestions.")?;
                session.logout();
                return Err(anyhow::anyhow!("Email not in the available list"));
            }

            let request = CreateUserRequest {
                staff_id,
                account_holder_name: name,
                email,
                password,
                is_super: super_user,
            };

            match session.client().create_user(&request).await {
                Ok(()) => output_success(&output_format, "User created successfully", None),
                Err(err) => {
                    output_error(&output_format, "Failed to create user")?;
                    Err(err.into())
                }
            }
        }
        UserCommands::Info { email } => match session.client().staff_info(&email).await {
            Ok(info) => output_success(
                &output_format,
                &format!("{} ({})", info.full_name, info.staff_id),
                Some(serde_json::json!({ "staff": info })),
            ),
            Err(err) => {
                output_error(&output_format, &err.to_string())?;
                Err(err.into())
            }
        },
        UserCommands::Emails { search } => {
            if search.len() <= 2 {
                output_error(&output_format, "Search term must be longer than 2 characters")?;
                Ok(())
            } else {
                let emails = session.client().available_staff_emails(&search).await?;
                output_success(
                    &output_format,
                    &format!("{} email(s) available", emails.len()),
                    Some(serde_json::json!({ "emails": emails })),
                )
            }
        }
        UserCommands::Whoami => {
            let account = session.account();
            output_success(
                &output_format,
                &format!(
                    "{} <{}>{}",
                    account.account_holder_name,
                    account.email,
                    if account.is_super { " (super)" } else { "" }
                ),
                Some(serde_json::json!({ "account": account })),
            )
        }
    };

    session.logout();
    result
}
