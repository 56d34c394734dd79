//! Cron scheduler for the expiry sweep.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, error, info};

use nearby_core::config::SweeperConfig;
use nearby_core::error::AppError;
use nearby_core::events::ScheduledTick;
use nearby_core::result::AppResult;
use nearby_core::traits::EventHandler;

use crate::invoke::{InvocationPolicy, invoke};

/// Task name carried by sweep ticks.
pub const SWEEP_TASK: &str = "notification_expiry_sweep";

/// Cron-based scheduler for periodic tasks.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new() -> AppResult<Self> {
        let scheduler = JobScheduler::new().await.map_err(|e| {
            AppError::scheduler(format!("Failed to create scheduler: {e}"))
        })?;

        Ok(Self { scheduler })
    }

    /// Register the expiry sweep on `config.schedule`.
    ///
    /// Each firing builds a [`ScheduledTick`] and invokes `sweeper` once
    /// under the configured time budget. Failures are logged; the next
    /// firing is the retry.
    pub async fn register_sweep(
        &self,
        sweeper: Arc<dyn EventHandler<ScheduledTick>>,
        config: &SweeperConfig,
    ) -> AppResult<()> {
        let policy = InvocationPolicy::for_sweep(config);

        let job = CronJob::new_async(config.schedule.as_str(), move |_uuid, _lock| {
            let sweeper = Arc::clone(&sweeper);
            Box::pin(async move {
                let tick = ScheduledTick::now(SWEEP_TASK);
                debug!(tick_id = %tick.id, "Running scheduled sweep");
                if let Err(e) = invoke(sweeper.as_ref(), &tick, policy).await {
                    error!(tick_id = %tick.id, error = %e, "Scheduled sweep failed");
                }
            })
        })
        .map_err(|e| {
            AppError::scheduler(format!(
                "Invalid sweep schedule '{}': {e}",
                config.schedule
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::scheduler(format!("Failed to add sweep schedule: {e}"))
        })?;

        info!(schedule = %config.schedule, "Registered: {}", SWEEP_TASK);
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler.start().await.map_err(|e| {
            AppError::scheduler(format!("Failed to start scheduler: {e}"))
        })?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler.shutdown().await.map_err(|e| {
            AppError::scheduler(format!("Failed to shutdown scheduler: {e}"))
        })?;

        info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nearby_database::MemoryGateway;
    use nearby_service::ExpirySweeper;

    use nearby_core::error::ErrorKind;

    use super::*;

    fn sweeper() -> Arc<dyn EventHandler<ScheduledTick>> {
        Arc::new(ExpirySweeper::new(
            Arc::new(MemoryGateway::new()),
            &SweeperConfig::default(),
        ))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_registers_default_schedule() {
        let scheduler = CronScheduler::new().await.expect("scheduler");
        scheduler
            .register_sweep(sweeper(), &SweeperConfig::default())
            .await
            .expect("default schedule is valid");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rejects_invalid_schedule() {
        let scheduler = CronScheduler::new().await.expect("scheduler");
        let config = SweeperConfig {
            schedule: "every day at three".to_string(),
            ..SweeperConfig::default()
        };
        let err = scheduler
            .register_sweep(sweeper(), &config)
            .await
            .expect_err("should reject");
        assert_eq!(err.kind, ErrorKind::Scheduler);
    }
}
