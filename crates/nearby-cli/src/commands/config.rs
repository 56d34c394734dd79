//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use nearby_core::error::AppError;
use nearby_database::connection::mask_password;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            config.database.url = mask_password(&config.database.url);
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Database", &mask_password(&config.database.url));
                output::print_kv(
                    "Default radius",
                    &format!("{} km", config.dispatch.default_radius_km),
                );
                output::print_kv(
                    "Notification TTL",
                    &format!("{} days", config.dispatch.notification_ttl_days),
                );
                output::print_kv("Post channel", &config.dispatch.channel);
                output::print_kv("Sweep schedule", &config.sweeper.schedule);
                output::print_kv("Sweep batch limit", &config.sweeper.batch_limit.to_string());
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
