//! CLI command definitions and dispatch.

pub mod config;
pub mod dispatch;
pub mod migrate;
pub mod notifications;
pub mod sweep;

use clap::{Parser, Subcommand};

use nearby_core::config::{AppConfig, DEFAULT_CONFIG_PATH};
use nearby_core::error::AppError;
use nearby_database::DatabasePool;

use crate::output::OutputFormat;

/// Nearby: proximity notifications for new posts
#[derive(Debug, Parser)]
#[command(name = "nearby", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "NEARBY_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Re-run the dispatch pipeline for an existing post
    Dispatch(dispatch::DispatchArgs),
    /// Remove expired notifications now
    Sweep(sweep::SweepArgs),
    /// Inspect stored notifications
    Notifications(notifications::NotificationsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Dispatch(args) => dispatch::execute(args, &self.config, self.format).await,
            Commands::Sweep(args) => sweep::execute(args, &self.config, self.format).await,
            Commands::Notifications(args) => {
                notifications::execute(args, &self.config, self.format).await
            }
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
