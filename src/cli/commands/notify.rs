use clap::Subcommand;

use crate::cli::utils::{establish_session, output_error, output_success};
use crate::cli::{Credentials, OutputFormat};
use crate::notify::NotificationFeed;

#[derive(Subcommand)]
pub enum NotifyCommands {
    #[command(about = "List notifications, newest first")]
    List {
        #[arg(long, help = "Only unread notifications")]
        unread: bool,
    },

    #[command(about = "Mark one notification as read")]
    Read {
        #[arg(help = "Notification id")]
        notification_id: String,
    },

    #[command(about = "Mark every notification as read")]
    ReadAll,
}

pub async fn handle(
    cmd: NotifyCommands,
    credentials: &Credentials,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let session = establish_session(credentials).await?;

    let mut feed = match NotificationFeed::load(session.client().clone(), session.account_id()).await
    {
        Ok(feed) => feed,
        Err(err) => {
            output_error(&output_format, &err.to_string())?;
            session.logout();
            return Err(err.into());
        }
    };

    let result = match cmd {
        NotifyCommands::List { unread } => {
            let notifications: Vec<_> = feed
                .notifications()
                .iter()
                .filter(|n| !unread || !n.has_read)
                .cloned()
                .collect();

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "notifications": notifications,
                            "has_unread": feed.has_unread()
                        }))?
                    );
                }
                OutputFormat::Text => {
                    if notifications.is_empty() {
                        println!("No notifications");
                    }
                    for n in &notifications {
                        let marker = if n.has_read { " " } else { "*" };
                        println!("{} {}  {}  {}", marker, n.created_at, n.notification_id, n.message);
                    }
                }
            }
            Ok(())
        }
        NotifyCommands::Read { notification_id } => match feed.mark_read(&notification_id).await {
            Ok(()) => output_success(&output_format, "Notification marked as read", None),
            Err(err) => {
                output_error(&output_format, &err.to_string())?;
                Err(err.into())
            }
        },
        NotifyCommands::ReadAll => match feed.mark_all_read().await {
            Ok(()) => output_success(&output_format, "All notifications marked as read", None),
            Err(err) => {
                output_error(&output_format, &err.to_string())?;
                Err(err.into())
            }
        },
    };

    session.logout();
    result
}
