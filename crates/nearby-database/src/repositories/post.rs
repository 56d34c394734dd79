//! Post repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use nearby_core::error::{AppError, ErrorKind};
use nearby_core::result::AppResult;
use nearby_core::types::{PostId, ProfileId};
use nearby_entity::{GeoPoint, Post};

use crate::gateway::PostGateway;

/// A `posts` row.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub post_type: Option<String>,
    pub author_name: Option<String>,
    pub author_profile_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::from_uuid(row.id),
            location: GeoPoint::from_parts(row.latitude, row.longitude),
            city: row.city,
            post_type: row.post_type,
            author_name: row.author_name,
            author_profile_id: row.author_profile_id.map(ProfileId::from_uuid),
            created_at: row.created_at,
        }
    }
}

/// Repository for post lookups.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostGateway for PostRepository {
    async fn find_by_id(&self, id: PostId) -> AppResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, latitude, longitude, city, post_type, author_name, author_profile_id, created_at \
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post by id", e))?;

        Ok(row.map(Post::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_maps_to_post() {
        let id = Uuid::new_v4();
        let author = Uuid::new_v4();
        let row = PostRow {
            id,
            latitude: Some(-23.5505),
            longitude: Some(-46.6333),
            city: Some("São Paulo".to_string()),
            post_type: Some("band".to_string()),
            author_name: Some("Caio".to_string()),
            author_profile_id: Some(author),
            created_at: Some(Utc::now()),
        };
        let post = Post::from(row);
        assert_eq!(post.id, PostId::from_uuid(id));
        assert_eq!(post.author_profile_id, Some(ProfileId::from_uuid(author)));
        assert!(post.location.is_some());
        assert!(post.created_at.is_some());
    }

    #[test]
    fn test_missing_longitude_means_no_location() {
        let row = PostRow {
            id: Uuid::new_v4(),
            latitude: Some(-23.5),
            longitude: None,
            city: None,
            post_type: None,
            author_name: None,
            author_profile_id: None,
            created_at: None,
        };
        assert!(Post::from(row).location.is_none());
    }
}
