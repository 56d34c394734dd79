//! Post creation outbox repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use nearby_core::error::{AppError, ErrorKind};
use nearby_core::result::AppResult;
use nearby_core::types::{PostEventId, PostId};
use nearby_entity::PostEvent;

use crate::gateway::PostEventGateway;

#[derive(Debug, FromRow)]
struct PostEventRow {
    id: Uuid,
    post_id: Uuid,
    created_at: DateTime<Utc>,
    attempts: i32,
}

impl From<PostEventRow> for PostEvent {
    fn from(row: PostEventRow) -> Self {
        Self {
            id: PostEventId::from_uuid(row.id),
            post_id: PostId::from_uuid(row.post_id),
            created_at: row.created_at,
            attempts: u32::try_from(row.attempts).unwrap_or(0),
        }
    }
}

/// Repository over the `post_events` table filled by the posts trigger.
#[derive(Debug, Clone)]
pub struct PostEventRepository {
    pool: PgPool,
}

impl PostEventRepository {
    /// Create a new outbox repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostEventGateway for PostEventRepository {
    /// Claim pending events (SKIP LOCKED so concurrent runners never share one).
    async fn claim_pending(
        &self,
        limit: usize,
        lease: chrono::Duration,
    ) -> AppResult<Vec<PostEvent>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut rows = sqlx::query_as::<_, PostEventRow>(
            "UPDATE post_events SET claimed_until = NOW() + make_interval(secs => $2), \
             attempts = attempts + 1 \
             WHERE id IN ( \
                SELECT id FROM post_events \
                WHERE dispatched_at IS NULL AND failed_at IS NULL \
                AND (claimed_until IS NULL OR claimed_until < NOW()) \
                ORDER BY created_at ASC \
                LIMIT $1 \
                FOR UPDATE SKIP LOCKED \
             ) RETURNING id, post_id, created_at, attempts",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(lease.num_milliseconds() as f64 / 1000.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim post events", e))?;

        rows.sort_by_key(|row| row.created_at);
        Ok(rows.into_iter().map(PostEvent::from).collect())
    }

    async fn mark_dispatched(&self, id: PostEventId) -> AppResult<()> {
        sqlx::query(
            "UPDATE post_events SET dispatched_at = NOW(), claimed_until = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark post event dispatched", e)
        })?;
        Ok(())
    }

    async fn mark_failed(&self, id: PostEventId, reason: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE post_events SET failed_at = NOW(), claimed_until = NULL, last_error = $2 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark post event failed", e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_attempts_read_as_zero() {
        let row = PostEventRow {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            created_at: Utc::now(),
            attempts: -1,
        };
        assert_eq!(PostEvent::from(row).attempts, 0);
    }
}
