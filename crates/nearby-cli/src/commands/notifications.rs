//! Notification inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use nearby_core::error::AppError;
use nearby_core::types::ProfileId;
use nearby_database::repositories::NotificationRepository;
use nearby_entity::Notification;

use crate::output::{self, OutputFormat};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationsArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List the latest notifications of a profile
    List {
        /// Recipient profile
        profile_id: ProfileId,
        /// Maximum rows
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}

/// Table row for a notification
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Body")]
    body: String,
    #[tabled(rename = "Km")]
    distance: String,
    #[tabled(rename = "Read")]
    read: bool,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Expires")]
    expires_at: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            body: n.body.clone(),
            distance: n.data.distance.clone(),
            read: n.read,
            created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
            expires_at: n.expires_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute notification commands
pub async fn execute(
    args: &NotificationsArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config).await?;
    let repo = NotificationRepository::new(db.pool().clone(), config.dispatch.insert_chunk_size);

    match &args.command {
        NotificationsCommand::List { profile_id, limit } => {
            let notifications = repo.find_by_recipient(*profile_id, *limit).await?;
            match format {
                OutputFormat::Json => output::print_item(&notifications, format),
                OutputFormat::Table => {
                    let rows: Vec<NotificationRow> =
                        notifications.iter().map(NotificationRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::commands::{Cli, Commands};

    const PROFILE: &str = "6f1c2d9e-3d4b-4a57-9d0c-0b8f4a1e2c3d";

    #[test]
    fn test_list_limit_defaults_to_twenty() {
        let cli = Cli::try_parse_from(["nearby", "notifications", "list", PROFILE]).expect("parse");
        let Commands::Notifications(args) = cli.command else {
            panic!("expected notifications command");
        };
        let NotificationsCommand::List { limit, .. } = args.command;
        assert_eq!(limit, 20);
    }

    #[test]
    fn test_list_rejects_negative_limit() {
        let result =
            Cli::try_parse_from(["nearby", "notifications", "list", PROFILE, "--limit", "-5"]);
        assert!(result.is_err());
    }
}
