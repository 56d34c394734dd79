//! Expiry sweeper: deletes notifications past their expiration.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use nearby_core::config::SweeperConfig;
use nearby_core::events::ScheduledTick;
use nearby_core::result::AppResult;
use nearby_core::traits::EventHandler;
use nearby_database::NotificationGateway;

/// Result of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Expired notifications found, capped at the batch limit.
    pub matched: usize,
    /// Notifications actually deleted.
    pub deleted: u64,
    /// Whether the cap was hit, so more may be waiting for the next run.
    pub limit_reached: bool,
}

/// Removes at most `batch_limit` expired notifications per run as one
/// atomic delete. A backlog beyond the limit is left for later runs.
#[derive(Debug, Clone)]
pub struct ExpirySweeper {
    notifications: Arc<dyn NotificationGateway>,
    batch_limit: usize,
}

impl ExpirySweeper {
    /// Creates a new sweeper over the injected gateway.
    pub fn new(notifications: Arc<dyn NotificationGateway>, config: &SweeperConfig) -> Self {
        Self {
            notifications,
            batch_limit: config.batch_limit,
        }
    }

    /// Delete notifications with `expires_at < now`.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let expired = self
            .notifications
            .find_expired(now, self.batch_limit)
            .await?;

        if expired.is_empty() {
            info!("No expired notifications");
            return Ok(SweepReport {
                matched: 0,
                deleted: 0,
                limit_reached: false,
            });
        }

        let matched = expired.len();
        let deleted = self.notifications.delete_batch(&expired).await?;
        let limit_reached = matched >= self.batch_limit;

        info!(count = deleted, limit_reached, "Expired notifications deleted");
        Ok(SweepReport {
            matched,
            deleted,
            limit_reached,
        })
    }
}

#[async_trait]
impl EventHandler<ScheduledTick> for ExpirySweeper {
    fn name(&self) -> &'static str {
        "notification_expiry_sweep"
    }

    async fn handle(&self, tick: &ScheduledTick) -> AppResult<()> {
        self.sweep(tick.fired_at).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use nearby_core::types::{NotificationId, PostId, ProfileId};
    use nearby_database::MemoryGateway;
    use nearby_entity::{
        NewNotification, NotificationKind, NotificationPayload, NotificationPriority,
    };

    use super::*;

    fn seed(store: &MemoryGateway, created_at: DateTime<Utc>, count: usize) {
        for _ in 0..count {
            let n = NewNotification {
                id: NotificationId::new(),
                recipient_profile_id: ProfileId::new(),
                kind: NotificationKind::NearbyPost,
                priority: NotificationPriority::Medium,
                title: "t".to_string(),
                body: "b".to_string(),
                data: NotificationPayload {
                    post_id: PostId::new(),
                    distance: "1.0".to_string(),
                    city: "c".to_string(),
                    post_type: None,
                    author_name: "a".to_string(),
                    author_profile_id: None,
                },
                ttl: Duration::days(7),
            };
            store.insert_notification(n.stamp(created_at));
        }
    }

    fn sweeper(store: &MemoryGateway) -> ExpirySweeper {
        ExpirySweeper::new(Arc::new(store.clone()), &SweeperConfig::default())
    }

    #[tokio::test]
    async fn test_nothing_expired_makes_no_delete_call() {
        let store = MemoryGateway::new();
        let now = Utc::now();
        seed(&store, now - Duration::days(1), 3);

        let report = sweeper(&store).sweep(now).await.expect("sweep");
        assert_eq!(report.deleted, 0);
        assert_eq!(store.delete_commits(), 0);
        assert_eq!(store.notification_count(), 3);
    }

    #[tokio::test]
    async fn test_backlog_is_capped_per_run() {
        let store = MemoryGateway::new();
        let now = Utc::now();
        seed(&store, now - Duration::days(8), 600);
        seed(&store, now - Duration::days(2), 10);

        let sweeper = sweeper(&store);
        let first = sweeper.sweep(now).await.expect("first sweep");
        assert_eq!(first.deleted, 500);
        assert!(first.limit_reached);
        assert_eq!(store.delete_commits(), 1);
        assert_eq!(store.notification_count(), 110);

        let second = sweeper.sweep(now).await.expect("second sweep");
        assert_eq!(second.deleted, 100);
        assert!(!second.limit_reached);
        assert_eq!(store.notification_count(), 10);

        let third = sweeper.sweep(now).await.expect("third sweep");
        assert_eq!(third.deleted, 0);
        assert_eq!(store.delete_commits(), 2);
    }

    #[tokio::test]
    async fn test_expiry_is_strictly_before_now() {
        let store = MemoryGateway::new();
        let now = Utc::now();
        seed(&store, now - Duration::days(7), 1);

        let report = sweeper(&store).sweep(now).await.expect("sweep");
        assert_eq!(report.deleted, 0);
        assert_eq!(store.notification_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_failure_propagates() {
        let store = MemoryGateway::new();
        let now = Utc::now();
        seed(&store, now - Duration::days(30), 2);
        store.fail_next_commit();

        let tick = ScheduledTick::now("notification_expiry_sweep");
        assert!(sweeper(&store).handle(&tick).await.is_err());
        assert_eq!(store.notification_count(), 2);
    }
}
