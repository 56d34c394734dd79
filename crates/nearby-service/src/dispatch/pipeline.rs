//! Dispatch pipeline: post creation event to committed notifications.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use nearby_core::config::DispatchConfig;
use nearby_core::result::AppResult;
use nearby_core::traits::EventHandler;
use nearby_database::{NotificationGateway, ProfileGateway};
use nearby_entity::{Post, PostCreated};

use crate::notification::NotificationBuilder;
use crate::proximity::CandidateFilter;

/// What one dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The post has no usable coordinate; nothing was queried.
    SkippedNoLocation,
    /// No opt-in profile was in range; nothing was written.
    NobodyNearby {
        /// Opt-in profiles examined.
        considered: usize,
    },
    /// One batch was committed.
    Notified {
        /// Opt-in profiles examined.
        considered: usize,
        /// Notifications persisted.
        notified: usize,
    },
}

/// Turns one post into the notifications for every opt-in profile in range.
///
/// Stateless across invocations. Fetch and commit failures propagate to
/// the caller, which owns the retry policy.
#[derive(Debug, Clone)]
pub struct DispatchPipeline {
    profiles: Arc<dyn ProfileGateway>,
    notifications: Arc<dyn NotificationGateway>,
    filter: CandidateFilter,
    builder: NotificationBuilder,
}

impl DispatchPipeline {
    /// Creates a new pipeline over the injected gateways.
    pub fn new(
        profiles: Arc<dyn ProfileGateway>,
        notifications: Arc<dyn NotificationGateway>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            profiles,
            notifications,
            filter: CandidateFilter::new(config.default_radius_km, config.near_miss_factor),
            builder: NotificationBuilder::new(config.notification_ttl_days),
        }
    }

    /// Run the pipeline for `post`.
    pub async fn dispatch(&self, post: &Post) -> AppResult<DispatchOutcome> {
        let Some(origin) = post.location else {
            warn!(post_id = %post.id, "Post has no usable location, skipping dispatch");
            return Ok(DispatchOutcome::SkippedNoLocation);
        };

        let profiles = self.profiles.find_opted_in().await?;
        let considered = profiles.len();
        info!(
            post_id = %post.id,
            count = considered,
            "Evaluating opt-in profiles"
        );

        let candidates = self.filter.select(post, origin, profiles);
        if candidates.is_empty() {
            info!(post_id = %post.id, "Nobody nearby");
            return Ok(DispatchOutcome::NobodyNearby { considered });
        }

        let batch = self.builder.build_all(post, &candidates);
        let committed = self.notifications.create_batch(batch).await?;

        info!(
            post_id = %post.id,
            count = committed.len(),
            "Nearby notifications committed"
        );
        Ok(DispatchOutcome::Notified {
            considered,
            notified: committed.len(),
        })
    }
}

#[async_trait]
impl EventHandler<PostCreated> for DispatchPipeline {
    fn name(&self) -> &'static str {
        "nearby_post_dispatch"
    }

    async fn handle(&self, event: &PostCreated) -> AppResult<()> {
        self.dispatch(&event.post).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use nearby_core::error::ErrorKind;
    use nearby_core::types::{PostId, ProfileId};
    use nearby_database::MemoryGateway;
    use nearby_entity::{GeoPoint, Profile};

    use super::*;

    fn pipeline(store: &MemoryGateway) -> DispatchPipeline {
        let shared = Arc::new(store.clone());
        DispatchPipeline::new(shared.clone(), shared, &DispatchConfig::default())
    }

    fn post_at(location: Option<GeoPoint>, author: Option<ProfileId>) -> Post {
        Post {
            id: PostId::new(),
            location,
            city: Some("São Paulo".to_string()),
            post_type: Some("band".to_string()),
            author_name: Some("Caio".to_string()),
            author_profile_id: author,
            created_at: None,
        }
    }

    fn opted_in(lat: f64, lon: f64) -> Profile {
        Profile {
            id: ProfileId::new(),
            name: None,
            location: GeoPoint::new(lat, lon),
            notification_radius_enabled: true,
            notification_radius: Some(20.0),
        }
    }

    #[tokio::test]
    async fn test_post_without_location_skips_without_querying() {
        let store = MemoryGateway::new();
        store.insert_profile(opted_in(-23.56, -46.64));

        let outcome = pipeline(&store)
            .dispatch(&post_at(None, None))
            .await
            .expect("dispatch");
        assert_eq!(outcome, DispatchOutcome::SkippedNoLocation);
        assert_eq!(store.profile_queries(), 0);
        assert_eq!(store.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_nobody_nearby_performs_no_write() {
        let store = MemoryGateway::new();
        store.insert_profile(opted_in(-22.9068, -43.1729));

        let outcome = pipeline(&store)
            .dispatch(&post_at(GeoPoint::new(-23.5505, -46.6333), None))
            .await
            .expect("dispatch");
        assert_eq!(outcome, DispatchOutcome::NobodyNearby { considered: 1 });
        assert_eq!(store.create_commits(), 0);
    }

    #[tokio::test]
    async fn test_matches_commit_as_one_batch() {
        let store = MemoryGateway::new();
        let author = opted_in(-23.5505, -46.6333);
        store.insert_profile(author.clone());
        store.insert_profile(opted_in(-23.5600, -46.6400));
        store.insert_profile(opted_in(-23.5700, -46.6500));

        let outcome = pipeline(&store)
            .dispatch(&post_at(GeoPoint::new(-23.5505, -46.6333), Some(author.id)))
            .await
            .expect("dispatch");
        assert_eq!(
            outcome,
            DispatchOutcome::Notified {
                considered: 3,
                notified: 2
            }
        );
        assert_eq!(store.create_commits(), 1);
        assert!(store.notifications_for(author.id).is_empty());
    }

    #[tokio::test]
    async fn test_profile_fetch_failure_propagates() {
        let store = MemoryGateway::new();
        store.fail_next_query();

        let err = pipeline(&store)
            .dispatch(&post_at(GeoPoint::new(-23.5505, -46.6333), None))
            .await
            .expect_err("should fail");
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_commit_failure_propagates_and_persists_nothing() {
        let store = MemoryGateway::new();
        store.insert_profile(opted_in(-23.5600, -46.6400));
        store.insert_profile(opted_in(-23.5700, -46.6500));
        store.fail_next_commit();

        let pipeline = pipeline(&store);
        let event = PostCreated::new(post_at(GeoPoint::new(-23.5505, -46.6333), None));
        let err = pipeline.handle(&event).await.expect_err("should fail");
        assert!(err.is_transient());
        assert_eq!(store.notification_count(), 0);

        pipeline.handle(&event).await.expect("retry succeeds");
        assert_eq!(store.notification_count(), 2);
    }
}
