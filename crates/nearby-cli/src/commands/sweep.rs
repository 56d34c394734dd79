//! One-shot expiry sweep.

use std::sync::Arc;

use chrono::Utc;
use clap::Args;

use nearby_core::error::AppError;
use nearby_database::NotificationGateway;
use nearby_database::repositories::NotificationRepository;
use nearby_service::ExpirySweeper;

use crate::output::{self, OutputFormat};

/// Arguments for the sweep command
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Only count expired notifications
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the sweep command
pub async fn execute(
    args: &SweepArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config).await?;
    let repo = Arc::new(NotificationRepository::new(
        db.pool().clone(),
        config.dispatch.insert_chunk_size,
    ));
    let now = Utc::now();

    if args.dry_run {
        let expired = repo.count_expired(now).await?;
        match format {
            OutputFormat::Json => {
                output::print_item(&serde_json::json!({ "expired": expired }), format)
            }
            OutputFormat::Table => {
                output::print_kv("Expired", &expired.to_string());
                output::print_kv("Removed per run", &config.sweeper.batch_limit.to_string());
            }
        }
    } else {
        let report = ExpirySweeper::new(repo, &config.sweeper).sweep(now).await?;
        match format {
            OutputFormat::Json => output::print_item(&report, format),
            OutputFormat::Table => {
                output::print_success(&format!(
                    "{} expired notifications deleted.",
                    report.deleted
                ));
                if report.limit_reached {
                    output::print_warning("Batch limit reached; run again to continue.");
                }
            }
        }
    }

    db.close().await;
    Ok(())
}
