//! Manual re-dispatch of an existing post.

use std::sync::Arc;

use clap::Args;

use nearby_core::error::AppError;
use nearby_core::types::PostId;
use nearby_database::PostGateway;
use nearby_database::repositories::{NotificationRepository, PostRepository, ProfileRepository};
use nearby_service::{DispatchOutcome, DispatchPipeline};

use crate::output::{self, OutputFormat};

/// Arguments for the dispatch command
#[derive(Debug, Args)]
pub struct DispatchArgs {
    /// Post to dispatch
    pub post_id: PostId,

    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Execute the dispatch command
pub async fn execute(
    args: &DispatchArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config).await?;
    let pool = db.pool().clone();

    let post = PostRepository::new(pool.clone())
        .find_by_id(args.post_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Post {} not found", args.post_id)))?;

    if !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(
                "Profiles already notified about this post will be notified again. Continue?",
            )
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let pipeline = DispatchPipeline::new(
        Arc::new(ProfileRepository::new(pool.clone())),
        Arc::new(NotificationRepository::new(
            pool,
            config.dispatch.insert_chunk_size,
        )),
        &config.dispatch,
    );

    let outcome = pipeline.dispatch(&post).await?;
    match format {
        OutputFormat::Json => output::print_item(&outcome, format),
        OutputFormat::Table => match outcome {
            DispatchOutcome::SkippedNoLocation => {
                output::print_warning("Post has no usable location; nothing dispatched.")
            }
            DispatchOutcome::NobodyNearby { considered } => {
                output::print_success(&format!(
                    "No opt-in profile in range ({considered} considered)."
                ));
            }
            DispatchOutcome::Notified {
                considered,
                notified,
            } => {
                output::print_success(&format!(
                    "{notified} notifications created ({considered} profiles considered)."
                ));
            }
        },
    }

    db.close().await;
    Ok(())
}
