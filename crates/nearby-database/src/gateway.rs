//! Persistence gateway traits.
//!
//! These are the only storage operations the core depends on. Every
//! implementation must make `create_batch` and `delete_batch` atomic:
//! either all records are written/removed or none are. Claims on the
//! post creation outbox must be exclusive until their lease runs out.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use nearby_core::result::AppResult;
use nearby_core::types::{NotificationId, PostEventId, PostId};
use nearby_entity::{NewNotification, Notification, Post, PostEvent, Profile};

/// Read access to profiles.
#[async_trait]
pub trait ProfileGateway: Send + Sync + std::fmt::Debug + 'static {
    /// All profiles whose proximity opt-in flag equals `true`.
    ///
    /// This is an equality query on the flag; the full profile set is
    /// never scanned.
    async fn find_opted_in(&self) -> AppResult<Vec<Profile>>;
}

/// Read access to posts.
#[async_trait]
pub trait PostGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Find a post by its identifier.
    async fn find_by_id(&self, id: PostId) -> AppResult<Option<Post>>;
}

/// Write and expiry access to notifications.
#[async_trait]
pub trait NotificationGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Atomically persist every notification.
    ///
    /// The store assigns one commit timestamp to the whole batch and
    /// derives each expiration from it.
    async fn create_batch(&self, notifications: Vec<NewNotification>)
    -> AppResult<Vec<Notification>>;

    /// Identifiers of notifications with `expires_at < before`, oldest
    /// first, at most `limit`.
    async fn find_expired(
        &self,
        before: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<NotificationId>>;

    /// Count notifications with `expires_at < before`.
    async fn count_expired(&self, before: DateTime<Utc>) -> AppResult<u64>;

    /// Atomically delete the given notifications. Returns the number removed.
    async fn delete_batch(&self, ids: &[NotificationId]) -> AppResult<u64>;
}

/// The post creation outbox.
#[async_trait]
pub trait PostEventGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Claim up to `limit` pending events, oldest first.
    ///
    /// A pending event is neither dispatched nor failed, and any earlier
    /// claim on it has expired. Claimed events stay invisible to other
    /// callers for `lease`.
    async fn claim_pending(
        &self,
        limit: usize,
        lease: chrono::Duration,
    ) -> AppResult<Vec<PostEvent>>;

    /// Record that the notifications of the event are committed.
    async fn mark_dispatched(&self, id: PostEventId) -> AppResult<()>;

    /// Stop redelivering the event.
    async fn mark_failed(&self, id: PostEventId, reason: &str) -> AppResult<()>;
}
