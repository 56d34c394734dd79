//! Handler interface invoked by the event runtime.

use async_trait::async_trait;

use crate::result::AppResult;

/// A unit of work triggered by an event of type `E`.
///
/// The runtime (listener loop, cron scheduler, CLI) owns the invocation
/// and the retry policy. A handler returns `Ok(())` once its work is
/// durably done or deliberately skipped, and propagates every failure
/// unchanged so the runtime can decide whether to re-invoke it.
#[async_trait]
pub trait EventHandler<E>: Send + Sync + 'static
where
    E: Send + Sync + 'static,
{
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Process one event.
    async fn handle(&self, event: &E) -> AppResult<()>;
}
