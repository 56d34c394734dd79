//! Post creation trigger events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearby_core::types::{PostEventId, PostId};

use super::model::Post;

/// Fired once (at least once) for every newly inserted post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreated {
    /// The post document as it was inserted.
    pub post: Post,
    /// When the runtime received the event.
    pub received_at: DateTime<Utc>,
}

impl PostCreated {
    /// Wrap a freshly created post.
    pub fn new(post: Post) -> Self {
        Self {
            post,
            received_at: Utc::now(),
        }
    }
}

/// A claimed row of the post creation outbox.
///
/// The row is written in the same transaction as the post, so every
/// insert leaves one behind even when no runner is listening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEvent {
    pub id: PostEventId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
    /// Number of claims so far, including the current one.
    pub attempts: u32,
}
