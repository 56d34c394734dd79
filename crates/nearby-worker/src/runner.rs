//! Post-event runner: main loop that claims post creation events from
//! the outbox and feeds them to the dispatch pipeline.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tracing::{debug, error, info, trace, warn};

use nearby_core::config::DispatchConfig;
use nearby_core::error::AppError;
use nearby_core::traits::EventHandler;
use nearby_database::{PostEventGateway, PostGateway};
use nearby_entity::{PostCreated, PostEvent};

use crate::invoke::{InvocationPolicy, invoke};
use crate::source::PostEventSource;

/// Pause after a feed error before asking for the next wake-up.
const SOURCE_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Longest wait for in-flight dispatches at shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Settles one claimed outbox event.
#[derive(Clone)]
struct EventProcessor {
    handler: Arc<dyn EventHandler<PostCreated>>,
    posts: Arc<dyn PostGateway>,
    events: Arc<dyn PostEventGateway>,
    policy: InvocationPolicy,
    max_deliveries: u32,
}

impl EventProcessor {
    async fn process(&self, event: PostEvent) {
        debug!(
            event_id = %event.id,
            post_id = %event.post_id,
            attempt = event.attempts,
            "Dispatching post"
        );

        let result = match self.posts.find_by_id(event.post_id).await {
            Ok(Some(post)) => {
                invoke(self.handler.as_ref(), &PostCreated::new(post), self.policy).await
            }
            Ok(None) => Err(AppError::not_found(format!(
                "Post {} no longer exists",
                event.post_id
            ))),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                if let Err(e) = self.events.mark_dispatched(event.id).await {
                    error!(
                        event_id = %event.id,
                        error = %e,
                        "Failed to mark post event dispatched; it will be redelivered"
                    );
                }
            }
            Err(e) if e.is_transient() && event.attempts < self.max_deliveries => {
                warn!(
                    event_id = %event.id,
                    post_id = %event.post_id,
                    attempt = event.attempts,
                    max_deliveries = self.max_deliveries,
                    error = %e,
                    "Dispatch failed, event left for redelivery"
                );
            }
            Err(e) => {
                error!(
                    event_id = %event.id,
                    post_id = %event.post_id,
                    attempt = event.attempts,
                    error = %e,
                    "Dispatch abandoned"
                );
                if let Err(mark_err) = self.events.mark_failed(event.id, &e.to_string()).await {
                    error!(
                        event_id = %event.id,
                        error = %mark_err,
                        "Failed to mark post event failed"
                    );
                }
            }
        }
    }
}

/// Runs one handler invocation per post creation event.
///
/// Events come from the outbox, never from the wake-up feed itself, so
/// posts created while no runner was listening are dispatched on the
/// next drain. Invocations for different posts are independent and run
/// in parallel, up to `max_concurrent` at a time.
pub struct PostEventRunner {
    processor: EventProcessor,
    max_concurrent: usize,
    poll_interval: Duration,
    lease: chrono::Duration,
}

impl std::fmt::Debug for PostEventRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostEventRunner")
            .field("handler", &self.processor.handler.name())
            .field("policy", &self.processor.policy)
            .field("max_deliveries", &self.processor.max_deliveries)
            .field("max_concurrent", &self.max_concurrent)
            .field("poll_interval", &self.poll_interval)
            .field("lease", &self.lease)
            .finish()
    }
}

impl PostEventRunner {
    /// Create a runner for `handler` over the given post store and outbox.
    pub fn new(
        handler: Arc<dyn EventHandler<PostCreated>>,
        posts: Arc<dyn PostGateway>,
        events: Arc<dyn PostEventGateway>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            processor: EventProcessor {
                handler,
                posts,
                events,
                policy: InvocationPolicy::for_dispatch(config),
                max_deliveries: config.max_deliveries.max(1),
            },
            max_concurrent: config.max_concurrent.max(1),
            poll_interval: Duration::from_secs(config.poll_interval_seconds.max(1)),
            lease: lease_from_seconds(config.claim_lease_seconds),
        }
    }

    /// Override the invocation policy.
    pub fn with_policy(mut self, policy: InvocationPolicy) -> Self {
        self.processor.policy = policy;
        self
    }

    /// Drain the outbox, then keep draining on every wake-up and poll
    /// tick until the cancel signal is received or the feed closes. Waits
    /// for in-flight dispatches before returning.
    pub async fn run<S>(&self, mut source: S, mut cancel: watch::Receiver<bool>)
    where
        S: PostEventSource,
    {
        info!(
            handler = self.processor.handler.name(),
            max_concurrent = self.max_concurrent,
            max_attempts = self.processor.policy.max_attempts,
            poll_interval_secs = self.poll_interval.as_secs(),
            "Post event runner started"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut source_open = true;

        loop {
            let saturated = self.drain_backlog(&semaphore).await;
            if !source_open {
                info!("Post event feed closed");
                break;
            }

            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Post event runner received shutdown signal");
                        break;
                    }
                }
                wakeup = source.next_wakeup() => match wakeup {
                    Ok(Some(post_id)) => trace!(post_id = %post_id, "Post created"),
                    Ok(None) => source_open = false,
                    Err(e) => {
                        warn!(error = %e, "Failed to receive post creation wake-up");
                        tokio::time::sleep(SOURCE_ERROR_BACKOFF).await;
                    }
                },
                permit = semaphore.clone().acquire_owned(), if saturated => drop(permit),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!("Post event runner waiting for in-flight dispatches to complete...");
        let _ = tokio::time::timeout(
            DRAIN_TIMEOUT,
            semaphore.acquire_many(self.max_concurrent as u32),
        )
        .await;
        info!("Post event runner shut down complete");
    }

    /// Claim and spawn pending events while dispatch slots are free.
    ///
    /// Returns `true` when every slot is busy and the outbox may hold
    /// more.
    async fn drain_backlog(&self, semaphore: &Arc<Semaphore>) -> bool {
        loop {
            let free = semaphore.available_permits();
            if free == 0 {
                trace!("All dispatch slots occupied, waiting...");
                return true;
            }

            let events = match self.processor.events.claim_pending(free, self.lease).await {
                Ok(events) => events,
                Err(e) => {
                    error!(error = %e, "Failed to claim post events");
                    return false;
                }
            };
            let claimed = events.len();

            for event in events {
                let Ok(permit) = semaphore.clone().acquire_owned().await else {
                    return false;
                };
                let processor = self.processor.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    processor.process(event).await;
                });
            }

            if claimed < free {
                return false;
            }
        }
    }
}

fn lease_from_seconds(seconds: u64) -> chrono::Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}
