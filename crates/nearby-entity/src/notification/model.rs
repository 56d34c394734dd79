//! Notification entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use nearby_core::types::{NotificationId, ProfileId};

use super::kind::{NotificationKind, NotificationPriority};
use super::payload::NotificationPayload;

/// A persisted alert waiting for a delivery mechanism to pick it up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient profile.
    pub recipient_profile_id: ProfileId,
    /// Notification class.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Delivery priority.
    pub priority: NotificationPriority,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Structured payload.
    pub data: NotificationPayload,
    /// Assigned by the store when the batch is committed.
    pub created_at: DateTime<Utc>,
    /// Flipped by the client once seen.
    pub read: bool,
    /// After this instant the sweeper may delete the notification.
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    /// Whether the notification is past its expiration at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// A built notification that has not been committed yet.
///
/// Timestamps are left to the store so that every record in a batch
/// shares the commit instant.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Pre-generated identifier.
    pub id: NotificationId,
    /// The recipient profile.
    pub recipient_profile_id: ProfileId,
    /// Notification class.
    pub kind: NotificationKind,
    /// Delivery priority.
    pub priority: NotificationPriority,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Structured payload.
    pub data: NotificationPayload,
    /// Lifetime counted from the commit instant.
    pub ttl: Duration,
}

impl NewNotification {
    /// Finalize the record with the commit timestamp.
    pub fn stamp(self, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: self.id,
            recipient_profile_id: self.recipient_profile_id,
            kind: self.kind,
            priority: self.priority,
            title: self.title,
            body: self.body,
            data: self.data,
            created_at,
            read: false,
            expires_at: created_at + self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearby_core::types::PostId;

    fn new_notification() -> NewNotification {
        NewNotification {
            id: NotificationId::new(),
            recipient_profile_id: ProfileId::new(),
            kind: NotificationKind::NearbyPost,
            priority: NotificationPriority::Medium,
            title: "Novo post próximo!".to_string(),
            body: "body".to_string(),
            data: NotificationPayload {
                post_id: PostId::new(),
                distance: "1.3".to_string(),
                city: "São Paulo".to_string(),
                post_type: Some("band".to_string()),
                author_name: "Caio".to_string(),
                author_profile_id: Some(ProfileId::new()),
            },
            ttl: Duration::days(7),
        }
    }

    #[test]
    fn test_stamp_sets_expiry_and_unread() {
        let now = Utc::now();
        let n = new_notification().stamp(now);
        assert_eq!(n.created_at, now);
        assert_eq!(n.expires_at, now + Duration::days(7));
        assert!(!n.read);
        assert!(!n.is_expired_at(now));
        assert!(n.is_expired_at(now + Duration::days(8)));
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(new_notification().stamp(Utc::now())).expect("serialize");
        for key in [
            "recipientProfileId",
            "type",
            "priority",
            "title",
            "body",
            "data",
            "createdAt",
            "read",
            "expiresAt",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["type"], "nearbyPost");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["data"]["distance"], "1.3");
        assert!(json["data"].get("authorProfileId").is_some());
    }
}
