//! Handler invocation with a time budget and transient-failure retries.

use std::time::Duration;

use tracing::{error, warn};

use nearby_core::config::{DispatchConfig, SweeperConfig};
use nearby_core::error::AppError;
use nearby_core::result::AppResult;
use nearby_core::traits::EventHandler;

/// How the runtime invokes a handler.
#[derive(Debug, Clone, Copy)]
pub struct InvocationPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
    /// Budget of a single attempt.
    pub timeout: Duration,
}

impl InvocationPolicy {
    /// Policy for post creation events.
    pub fn for_dispatch(config: &DispatchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
            timeout: Duration::from_secs(config.invocation_timeout_seconds),
        }
    }

    /// Policy for scheduled sweeps. A failed sweep is not retried; the
    /// next tick picks up whatever is left.
    pub fn for_sweep(config: &SweeperConfig) -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Invoke `handler` for `event` under `policy`.
///
/// An attempt that exceeds the budget counts as a transient failure.
/// Because a timed-out attempt may already have committed, a retry can
/// produce duplicates; delivery is at-least-once.
pub async fn invoke<E, H>(handler: &H, event: &E, policy: InvocationPolicy) -> AppResult<()>
where
    E: Send + Sync + 'static,
    H: EventHandler<E> + ?Sized,
{
    let mut attempt = 1;
    loop {
        let result = match tokio::time::timeout(policy.timeout, handler.handle(event)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(format!(
                "{} exceeded its {}s budget",
                handler.name(),
                policy.timeout.as_secs()
            ))),
        };

        match result {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                warn!(
                    handler = handler.name(),
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "Handler failed, retrying"
                );
                attempt += 1;
                tokio::time::sleep(policy.backoff).await;
            }
            Err(e) => {
                error!(
                    handler = handler.name(),
                    attempt,
                    error = %e,
                    "Handler failed"
                );
                return Err(e);
            }
        }
    }
}
