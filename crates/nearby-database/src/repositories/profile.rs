//! Profile repository implementation.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use nearby_core::error::{AppError, ErrorKind};
use nearby_core::result::AppResult;
use nearby_core::types::ProfileId;
use nearby_entity::{GeoPoint, Profile};

use crate::gateway::ProfileGateway;

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    notification_radius_enabled: Option<bool>,
    notification_radius: Option<f64>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: ProfileId::from_uuid(row.id),
            name: row.name,
            location: GeoPoint::from_parts(row.latitude, row.longitude),
            notification_radius_enabled: row.notification_radius_enabled.unwrap_or(false),
            notification_radius: row.notification_radius,
        }
    }
}

/// Repository for profile queries.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileGateway for ProfileRepository {
    async fn find_opted_in(&self) -> AppResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, name, latitude, longitude, notification_radius_enabled, notification_radius \
             FROM profiles WHERE notification_radius_enabled = TRUE",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list opted-in profiles", e)
        })?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }
}
