//! Post-creation wake-ups.
//!
//! The `posts` insert trigger writes an outbox row and publishes the new
//! post id on a notification channel. NOTIFY is not durable, so the id
//! only tells the runner to look at the outbox sooner; the outbox row is
//! what gets dispatched.

use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tracing::{info, warn};
use uuid::Uuid;

use nearby_core::error::{AppError, ErrorKind};
use nearby_core::result::AppResult;
use nearby_core::types::PostId;

/// A subscription to the post-creation channel.
pub struct PostCreatedListener {
    listener: PgListener,
    channel: String,
}

impl std::fmt::Debug for PostCreatedListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostCreatedListener")
            .field("channel", &self.channel)
            .finish()
    }
}

impl PostCreatedListener {
    /// Open a dedicated connection and `LISTEN` on `channel`.
    pub async fn connect(pool: &PgPool, channel: &str) -> AppResult<Self> {
        let mut listener = PgListener::connect_with(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to open listener connection", e)
        })?;
        listener.listen(channel).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to listen on channel '{channel}'"),
                e,
            )
        })?;

        info!(channel = %channel, "Listening for post creation wake-ups");
        Ok(Self {
            listener,
            channel: channel.to_string(),
        })
    }

    /// Wait for the next post id published on the channel.
    ///
    /// Payloads that are not a post id are logged and skipped. Connection
    /// errors are returned; `PgListener` reconnects on the next call.
    pub async fn next_post_id(&mut self) -> AppResult<PostId> {
        loop {
            let notification = self.listener.recv().await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::ServiceUnavailable,
                    "Lost post creation listener connection",
                    e,
                )
            })?;

            match decode_post_id(notification.payload()) {
                Ok(post_id) => return Ok(post_id),
                Err(e) => {
                    warn!(
                        channel = %self.channel,
                        error = %e,
                        "Skipping undecodable post creation payload"
                    );
                }
            }
        }
    }
}

/// Decode a trigger payload: the bare id of the inserted post.
pub fn decode_post_id(payload: &str) -> AppResult<PostId> {
    Uuid::parse_str(payload.trim())
        .map(PostId::from_uuid)
        .map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Invalid post id payload", e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_post_id_payload() {
        let post_id = decode_post_id("6f1c2d9e-3d4b-4a57-9d0c-0b8f4a1e2c3d").expect("decode");
        assert_eq!(post_id.to_string(), "6f1c2d9e-3d4b-4a57-9d0c-0b8f4a1e2c3d");
    }

    #[test]
    fn test_decode_rejects_row_json() {
        let err = decode_post_id(r#"{"id":"6f1c2d9e-3d4b-4a57-9d0c-0b8f4a1e2c3d"}"#)
            .expect_err("only the id is published");
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_post_id("not an id").expect_err("should fail");
        assert_eq!(err.kind, ErrorKind::Serialization);
    }
}
