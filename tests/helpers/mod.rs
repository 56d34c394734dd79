//! Shared test helpers for integration tests.
//!
//! Everything runs against the in-memory gateway; no database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use nearby_core::config::{DispatchConfig, SweeperConfig};
use nearby_core::types::{NotificationId, PostId, ProfileId};
use nearby_database::MemoryGateway;
use nearby_entity::{
    GeoPoint, NewNotification, NotificationKind, NotificationPayload, NotificationPriority, Post,
    Profile,
};
use nearby_service::{DispatchPipeline, ExpirySweeper};

pub const SAO_PAULO: (f64, f64) = (-23.5505, -46.6333);
pub const RIO_DE_JANEIRO: (f64, f64) = (-22.9068, -43.1729);
pub const PAULISTA: (f64, f64) = (-23.5600, -46.6400);

/// Test application context
pub struct TestApp {
    /// Shared in-memory store
    pub store: MemoryGateway,
    /// Pipeline wired to the store
    pub pipeline: Arc<DispatchPipeline>,
    /// Sweeper wired to the store
    pub sweeper: Arc<ExpirySweeper>,
}

impl TestApp {
    /// Create a new test application with default settings
    pub fn new() -> Self {
        let store = MemoryGateway::new();
        let shared = Arc::new(store.clone());
        let pipeline = Arc::new(DispatchPipeline::new(
            shared.clone(),
            shared.clone(),
            &DispatchConfig::default(),
        ));
        let sweeper = Arc::new(ExpirySweeper::new(shared, &SweeperConfig::default()));
        Self {
            store,
            pipeline,
            sweeper,
        }
    }

    /// Insert an opted-in profile and return it
    pub fn opted_in_profile(&self, at: (f64, f64), radius: Option<f64>) -> Profile {
        let profile = Profile {
            id: ProfileId::new(),
            name: Some("Test".to_string()),
            location: GeoPoint::new(at.0, at.1),
            notification_radius_enabled: true,
            notification_radius: radius,
        };
        self.store.insert_profile(profile.clone());
        profile
    }

    /// Seed `count` notifications created at `created_at` with a 7 day TTL
    pub fn seed_notifications(&self, created_at: DateTime<Utc>, count: usize) {
        for _ in 0..count {
            self.store
                .insert_notification(new_notification(ProfileId::new()).stamp(created_at));
        }
    }
}

/// A band post at `at`
pub fn band_post(at: Option<(f64, f64)>, author: Option<ProfileId>) -> Post {
    Post {
        id: PostId::new(),
        location: at.and_then(|(lat, lon)| GeoPoint::new(lat, lon)),
        city: Some("São Paulo".to_string()),
        post_type: Some("band".to_string()),
        author_name: Some("Caio".to_string()),
        author_profile_id: author,
        created_at: Some(Utc::now()),
    }
}

/// An uncommitted notification for `recipient`
pub fn new_notification(recipient: ProfileId) -> NewNotification {
    NewNotification {
        id: NotificationId::new(),
        recipient_profile_id: recipient,
        kind: NotificationKind::NearbyPost,
        priority: NotificationPriority::Medium,
        title: "Novo post próximo!".to_string(),
        body: "seeded".to_string(),
        data: NotificationPayload {
            post_id: PostId::new(),
            distance: "1.0".to_string(),
            city: "São Paulo".to_string(),
            post_type: Some("band".to_string()),
            author_name: "Caio".to_string(),
            author_profile_id: None,
        },
        ttl: Duration::days(7),
    }
}
