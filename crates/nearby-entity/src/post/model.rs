//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearby_core::types::{PostId, ProfileId};

use super::category::PostCategory;
use crate::geo::GeoPoint;

/// City shown when a post carries none.
pub const UNKNOWN_CITY: &str = "cidade desconhecida";

/// Author name shown when a post carries none.
pub const ANONYMOUS_AUTHOR: &str = "Alguém";

/// A gig/opportunity listing created by the mobile client.
///
/// Read-only to this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post identifier.
    pub id: PostId,
    /// Where the gig is; `None` makes the post unmatchable.
    pub location: Option<GeoPoint>,
    /// Free-text city label.
    pub city: Option<String>,
    /// Raw category tag as stored by the client (`"band"`, `"musician"`).
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    /// Display name of the author.
    pub author_name: Option<String>,
    /// Profile that authored the post.
    pub author_profile_id: Option<ProfileId>,
    /// When the post was created.
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// City label, falling back to a placeholder.
    pub fn city_label(&self) -> &str {
        non_blank(self.city.as_deref()).unwrap_or(UNKNOWN_CITY)
    }

    /// Author display name, falling back to a placeholder.
    pub fn author_label(&self) -> &str {
        non_blank(self.author_name.as_deref()).unwrap_or(ANONYMOUS_AUTHOR)
    }

    /// Category derived from the raw type tag.
    pub fn category(&self) -> PostCategory {
        PostCategory::from_tag(self.post_type.as_deref())
    }

    /// Whether `profile_id` authored this post.
    pub fn is_authored_by(&self, profile_id: ProfileId) -> bool {
        self.author_profile_id == Some(profile_id)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            id: PostId::new(),
            location: GeoPoint::new(-23.5505, -46.6333),
            city: None,
            post_type: Some("band".to_string()),
            author_name: Some(String::new()),
            author_profile_id: None,
            created_at: None,
        }
    }

    #[test]
    fn test_placeholders() {
        let post = post();
        assert_eq!(post.city_label(), UNKNOWN_CITY);
        assert_eq!(post.author_label(), ANONYMOUS_AUTHOR);
        assert_eq!(post.category(), PostCategory::Band);
    }

    #[test]
    fn test_without_author_nobody_is_author() {
        assert!(!post().is_authored_by(ProfileId::new()));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(post()).expect("serialize");
        assert!(json.get("authorProfileId").is_some());
        assert_eq!(json["type"], "band");
        assert_eq!(json["location"]["latitude"], -23.5505);
    }
}
