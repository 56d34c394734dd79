//! Structured notification payload.

use serde::{Deserialize, Serialize};

use nearby_core::types::{PostId, ProfileId};

/// Data a client needs to open the post behind a nearby-post notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// The triggering post.
    pub post_id: PostId,
    /// Distance to the recipient in km, one decimal place (`"1.3"`).
    pub distance: String,
    /// City label of the post.
    pub city: String,
    /// Raw category tag of the post.
    pub post_type: Option<String>,
    /// Author display name.
    pub author_name: String,
    /// Author profile.
    pub author_profile_id: Option<ProfileId>,
}
