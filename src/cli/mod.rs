pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "sijil")]
#[command(about = "Sijil CLI - staff portal client for document issuance and authentication")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "SIJIL_EMAIL", help = "Staff email for the portal session")]
    pub email: Option<String>,

    #[arg(
        long,
        global = true,
        env = "SIJIL_PASSWORD",
        hide_env_values = true,
        help = "Password for the portal session"
    )]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Search, edit and delete issued documents")]
    Docs {
        #[command(subcommand)]
        cmd: commands::documents::DocsCommands,
    },

    #[command(about = "List and recover soft-deleted documents")]
    Recover {
        #[command(subcommand)]
        cmd: commands::recover::RecoverCommands,
    },

    #[command(about = "Authenticate an uploaded copy against the stored original")]
    Authenticate(commands::authenticate::AuthenticateArgs),

    #[command(about = "Issue a new document")]
    Issue(commands::issue::IssueArgs),

    #[command(about = "Staff account administration")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Notification feed")]
    Notify {
        #[command(subcommand)]
        cmd: commands::notify::NotifyCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Credentials for the per-invocation portal session
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let email = cli
            .email
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No staff email provided (--email or SIJIL_EMAIL)"))?;
        let password = cli.password.clone().ok_or_else(|| {
            anyhow::anyhow!("No password provided (--password or SIJIL_PASSWORD)")
        })?;
        Ok(Self { email, password })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let credentials = Credentials::from_cli(&cli)?;

    match cli.command {
        Commands::Docs { cmd } => commands::documents::handle(cmd, &credentials, output_format).await,
        Commands::Recover { cmd } => commands::recover::handle(cmd, &credentials, output_format).await,
        Commands::Authenticate(args) => {
            commands::authenticate::handle(args, &credentials, output_format).await
        }
        Commands::Issue(args) => commands::issue::handle(args, &credentials, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, &credentials, output_format).await,
        Commands::Notify { cmd } => commands::notify::handle(cmd, &credentials, output_format).await,
    }
}
