//! Nearby Server: proximity notifications for new posts.
//!
//! Main entry point that wires all crates together: the post-event runner
//! draining the post creation outbox and the cron scheduler driving the
//! expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use nearby_core::config::AppConfig;
use nearby_core::error::AppError;
use nearby_database::repositories::{
    NotificationRepository, PostEventRepository, PostRepository, ProfileRepository,
};
use nearby_database::{DatabasePool, PostCreatedListener};
use nearby_service::{DispatchPipeline, ExpirySweeper};
use nearby_worker::{CronScheduler, PostEventRunner};

#[tokio::main]
async fn main() {
    let config_path = AppConfig::path_from_env();
    let config = match AppConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from '{config_path}': {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Nearby v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect_and_migrate(&config.database).await?;
    if !db.health_check().await? {
        return Err(AppError::service_unavailable("Database health check failed"));
    }
    let pool = db.pool().clone();

    // ── Step 2: Gateways ─────────────────────────────────────────
    let profile_repo = Arc::new(ProfileRepository::new(pool.clone()));
    let notification_repo = Arc::new(NotificationRepository::new(
        pool.clone(),
        config.dispatch.insert_chunk_size,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 3: Post-event runner ────────────────────────────────
    let runner_handle = if config.dispatch.enabled {
        let pipeline = Arc::new(DispatchPipeline::new(
            profile_repo,
            notification_repo.clone(),
            &config.dispatch,
        ));
        let listener = PostCreatedListener::connect(&pool, &config.dispatch.channel).await?;
        let runner = PostEventRunner::new(
            pipeline,
            Arc::new(PostRepository::new(pool.clone())),
            Arc::new(PostEventRepository::new(pool.clone())),
            &config.dispatch,
        );
        let cancel = shutdown_rx.clone();

        tracing::info!("Post event runner starting");
        Some(tokio::spawn(async move {
            runner.run(listener, cancel).await;
        }))
    } else {
        tracing::info!("Dispatch disabled");
        None
    };

    // ── Step 4: Cron scheduler ───────────────────────────────────
    let mut scheduler = if config.sweeper.enabled {
        let sweeper = Arc::new(ExpirySweeper::new(notification_repo, &config.sweeper));
        let scheduler = CronScheduler::new().await?;
        scheduler.register_sweep(sweeper, &config.sweeper).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Expiry sweeper disabled");
        None
    };

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
    let _ = shutdown_tx.send(true);

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler did not shut down cleanly");
        }
    }

    if let Some(handle) = runner_handle {
        let _ = tokio::time::timeout(Duration::from_secs(35), handle).await;
    }

    db.close().await;
    tracing::info!("Nearby server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
