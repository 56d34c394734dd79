//! In-memory persistence gateway.
//!
//! Honors the same contracts as the PostgreSQL repositories: batch
//! writes and deletes are all-or-nothing, every record of a batch shares
//! one commit timestamp, expired lookups are ordered oldest first, and
//! inserting a post enqueues an outbox event the way the posts trigger
//! does. Used by tests and by local runs without a database.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use nearby_core::error::AppError;
use nearby_core::result::AppResult;
use nearby_core::types::{NotificationId, PostEventId, PostId, ProfileId};
use nearby_entity::{NewNotification, Notification, Post, PostEvent, Profile};

use crate::gateway::{NotificationGateway, PostEventGateway, PostGateway, ProfileGateway};

#[derive(Debug, Clone, PartialEq, Eq)]
enum EventState {
    Pending,
    Dispatched,
    Failed(String),
}

#[derive(Debug, Clone)]
struct EventRecord {
    event: PostEvent,
    claimed_until: Option<DateTime<Utc>>,
    state: EventState,
}

#[derive(Debug, Default)]
struct Inner {
    profiles: DashMap<ProfileId, Profile>,
    posts: DashMap<PostId, Post>,
    notifications: DashMap<NotificationId, Notification>,
    post_events: DashMap<PostEventId, EventRecord>,
    /// Serializes batch commits so a batch is observed whole or not at all.
    commit_lock: Mutex<()>,
    profile_queries: AtomicUsize,
    create_commits: AtomicUsize,
    delete_commits: AtomicUsize,
    fail_next_commit: AtomicBool,
    fail_next_query: AtomicBool,
}

/// A process-local gateway backed by concurrent maps.
///
/// Cloning is cheap and every clone shares the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Inner>,
}

impl MemoryGateway {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile.
    pub fn insert_profile(&self, profile: Profile) {
        self.inner.profiles.insert(profile.id, profile);
    }

    /// Insert a post and enqueue its creation event.
    pub fn insert_post(&self, post: Post) -> PostEventId {
        let post_id = post.id;
        self.inner.posts.insert(post_id, post);
        self.enqueue_post_event(post_id)
    }

    /// Enqueue a creation event for `post_id` without touching the posts.
    pub fn enqueue_post_event(&self, post_id: PostId) -> PostEventId {
        let id = PostEventId::new();
        self.inner.post_events.insert(
            id,
            EventRecord {
                event: PostEvent {
                    id,
                    post_id,
                    created_at: Utc::now(),
                    attempts: 0,
                },
                claimed_until: None,
                state: EventState::Pending,
            },
        );
        id
    }

    /// Insert an already committed notification.
    pub fn insert_notification(&self, notification: Notification) {
        self.inner
            .notifications
            .insert(notification.id, notification);
    }

    /// Snapshot of all stored notifications, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        let mut all: Vec<Notification> = self
            .inner
            .notifications
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|n| n.created_at);
        all
    }

    /// Notifications addressed to one profile.
    pub fn notifications_for(&self, recipient: ProfileId) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.recipient_profile_id == recipient)
            .collect()
    }

    /// Number of stored notifications.
    pub fn notification_count(&self) -> usize {
        self.inner.notifications.len()
    }

    /// Number of outbox events neither dispatched nor failed.
    pub fn pending_event_count(&self) -> usize {
        self.count_events(|state| *state == EventState::Pending)
    }

    /// Number of outbox events marked dispatched.
    pub fn dispatched_event_count(&self) -> usize {
        self.count_events(|state| *state == EventState::Dispatched)
    }

    /// Number of outbox events marked failed.
    pub fn failed_event_count(&self) -> usize {
        self.count_events(|state| matches!(state, EventState::Failed(_)))
    }

    /// Claims so far of one outbox event.
    pub fn event_attempts(&self, id: PostEventId) -> Option<u32> {
        self.inner
            .post_events
            .get(&id)
            .map(|entry| entry.value().event.attempts)
    }

    fn count_events(&self, predicate: impl Fn(&EventState) -> bool) -> usize {
        self.inner
            .post_events
            .iter()
            .filter(|entry| predicate(&entry.value().state))
            .count()
    }

    /// Number of opt-in profile queries served.
    pub fn profile_queries(&self) -> usize {
        self.inner.profile_queries.load(Ordering::SeqCst)
    }

    /// Number of successful `create_batch` commits.
    pub fn create_commits(&self) -> usize {
        self.inner.create_commits.load(Ordering::SeqCst)
    }

    /// Number of successful `delete_batch` commits.
    pub fn delete_commits(&self) -> usize {
        self.inner.delete_commits.load(Ordering::SeqCst)
    }

    /// Make the next batch create or delete fail without writing anything.
    pub fn fail_next_commit(&self) {
        self.inner.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Make the next read query fail.
    pub fn fail_next_query(&self) {
        self.inner.fail_next_query.store(true, Ordering::SeqCst);
    }

    fn check_query(&self) -> AppResult<()> {
        if self.inner.fail_next_query.swap(false, Ordering::SeqCst) {
            return Err(AppError::database("Injected query failure"));
        }
        Ok(())
    }

    fn check_commit(&self) -> AppResult<()> {
        if self.inner.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(AppError::database("Injected commit failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileGateway for MemoryGateway {
    async fn find_opted_in(&self) -> AppResult<Vec<Profile>> {
        self.check_query()?;
        self.inner.profile_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .inner
            .profiles
            .iter()
            .filter(|entry| entry.value().notification_radius_enabled)
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[async_trait]
impl PostGateway for MemoryGateway {
    async fn find_by_id(&self, id: PostId) -> AppResult<Option<Post>> {
        self.check_query()?;
        Ok(self.inner.posts.get(&id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl NotificationGateway for MemoryGateway {
    async fn create_batch(
        &self,
        notifications: Vec<NewNotification>,
    ) -> AppResult<Vec<Notification>> {
        let _guard = self.inner.commit_lock.lock().await;
        self.check_commit()?;

        let now = Utc::now();
        let stamped: Vec<Notification> = notifications.into_iter().map(|n| n.stamp(now)).collect();
        for n in &stamped {
            self.inner.notifications.insert(n.id, n.clone());
        }
        self.inner.create_commits.fetch_add(1, Ordering::SeqCst);
        debug!(count = stamped.len(), "Committed notification batch");
        Ok(stamped)
    }

    async fn find_expired(
        &self,
        before: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<NotificationId>> {
        self.check_query()?;
        let mut expired: Vec<(DateTime<Utc>, NotificationId)> = self
            .inner
            .notifications
            .iter()
            .filter(|entry| entry.value().is_expired_at(before))
            .map(|entry| (entry.value().expires_at, *entry.key()))
            .collect();
        expired.sort_by_key(|(expires_at, _)| *expires_at);
        Ok(expired.into_iter().take(limit).map(|(_, id)| id).collect())
    }

    async fn count_expired(&self, before: DateTime<Utc>) -> AppResult<u64> {
        self.check_query()?;
        Ok(self
            .inner
            .notifications
            .iter()
            .filter(|entry| entry.value().is_expired_at(before))
            .count() as u64)
    }

    async fn delete_batch(&self, ids: &[NotificationId]) -> AppResult<u64> {
        let _guard = self.inner.commit_lock.lock().await;
        self.check_commit()?;

        let removed = ids
            .iter()
            .filter(|id| self.inner.notifications.remove(id).is_some())
            .count() as u64;
        self.inner.delete_commits.fetch_add(1, Ordering::SeqCst);
        Ok(removed)
    }
}

#[async_trait]
impl PostEventGateway for MemoryGateway {
    async fn claim_pending(
        &self,
        limit: usize,
        lease: chrono::Duration,
    ) -> AppResult<Vec<PostEvent>> {
        let _guard = self.inner.commit_lock.lock().await;
        self.check_query()?;

        let now = Utc::now();
        let mut pending: Vec<PostEvent> = self
            .inner
            .post_events
            .iter()
            .filter(|entry| {
                let record = entry.value();
                record.state == EventState::Pending
                    && record.claimed_until.is_none_or(|until| until < now)
            })
            .map(|entry| entry.value().event.clone())
            .collect();
        pending.sort_by_key(|event| event.created_at);
        pending.truncate(limit);

        let mut claimed = Vec::with_capacity(pending.len());
        for event in pending {
            if let Some(mut record) = self.inner.post_events.get_mut(&event.id) {
                record.claimed_until = Some(now + lease);
                record.event.attempts += 1;
                claimed.push(record.event.clone());
            }
        }
        Ok(claimed)
    }

    async fn mark_dispatched(&self, id: PostEventId) -> AppResult<()> {
        if let Some(mut record) = self.inner.post_events.get_mut(&id) {
            record.state = EventState::Dispatched;
            record.claimed_until = None;
        }
        Ok(())
    }

    async fn mark_failed(&self, id: PostEventId, reason: &str) -> AppResult<()> {
        if let Some(mut record) = self.inner.post_events.get_mut(&id) {
            record.state = EventState::Failed(reason.to_string());
            record.claimed_until = None;
        }
        Ok(())
    }
}
