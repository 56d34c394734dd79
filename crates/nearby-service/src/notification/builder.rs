//! Builds nearby-post notifications from accepted candidates.

use chrono::Duration;

use nearby_core::types::NotificationId;
use nearby_entity::{
    NewNotification, NotificationKind, NotificationPayload, NotificationPriority, Post,
};

use crate::proximity::Candidate;

/// Title of every nearby-post notification.
pub const NEARBY_POST_TITLE: &str = "Novo post próximo!";

/// Render a distance with one decimal place.
pub fn format_distance(distance_km: f64) -> String {
    format!("{distance_km:.1}")
}

/// Produces uncommitted notification records.
///
/// Creation and expiration timestamps are left to the store; only the
/// lifetime is fixed here.
#[derive(Debug, Clone, Copy)]
pub struct NotificationBuilder {
    ttl: Duration,
}

impl NotificationBuilder {
    /// Create a builder whose notifications live for `ttl_days`.
    pub fn new(ttl_days: i64) -> Self {
        Self {
            ttl: Duration::days(ttl_days),
        }
    }

    /// Build the notification telling `candidate` about `post`.
    pub fn build(&self, post: &Post, candidate: &Candidate) -> NewNotification {
        let distance = format_distance(candidate.distance_km);
        let city = post.city_label();
        let author = post.author_label();

        let body = format!(
            "{author} está procurando {label} a {distance} km de você em {city}",
            label = post.category().label(),
        );

        NewNotification {
            id: NotificationId::new(),
            recipient_profile_id: candidate.profile.id,
            kind: NotificationKind::NearbyPost,
            priority: NotificationPriority::Medium,
            title: NEARBY_POST_TITLE.to_string(),
            body,
            data: NotificationPayload {
                post_id: post.id,
                distance,
                city: city.to_string(),
                post_type: post.post_type.clone(),
                author_name: author.to_string(),
                author_profile_id: post.author_profile_id,
            },
            ttl: self.ttl,
        }
    }

    /// Build one notification per candidate.
    pub fn build_all(&self, post: &Post, candidates: &[Candidate]) -> Vec<NewNotification> {
        candidates.iter().map(|c| self.build(post, c)).collect()
    }
}
