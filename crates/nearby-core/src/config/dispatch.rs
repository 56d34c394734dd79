//! Proximity dispatch configuration.

use serde::{Deserialize, Serialize};

/// Bind parameters used by one row of the notification INSERT.
pub const NOTIFICATION_BINDS_PER_ROW: usize = 10;

/// Largest `insert_chunk_size` that stays under the Postgres limit of
/// 65535 bind parameters per statement.
pub const MAX_INSERT_CHUNK_SIZE: usize = u16::MAX as usize / NOTIFICATION_BINDS_PER_ROW;

/// Settings for the post-created dispatch pipeline and its runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Whether the post-event runner is started.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Radius used when a profile has no usable radius of its own.
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    /// Lifetime of a notification before the sweeper may remove it.
    #[serde(default = "default_ttl_days")]
    pub notification_ttl_days: i64,
    /// Rows per INSERT statement inside the single commit transaction.
    #[serde(default = "default_insert_chunk_size")]
    pub insert_chunk_size: usize,
    /// Rejected profiles within `radius * factor` are logged at debug level.
    #[serde(default = "default_near_miss_factor")]
    pub near_miss_factor: f64,
    /// Postgres NOTIFY channel that wakes the runner when a post is inserted.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Maximum number of posts processed in parallel.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Attempts per post before giving up on a transient failure.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts, in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Time budget of one pipeline invocation.
    #[serde(default = "default_invocation_timeout")]
    pub invocation_timeout_seconds: u64,
    /// Interval between outbox polls when no wake-up arrives.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// How long a claimed outbox event stays invisible to other runners.
    #[serde(default = "default_claim_lease")]
    pub claim_lease_seconds: u64,
    /// Claims of one outbox event before it is marked failed.
    #[serde(default = "default_max_deliveries")]
    pub max_deliveries: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            default_radius_km: default_radius_km(),
            notification_ttl_days: default_ttl_days(),
            insert_chunk_size: default_insert_chunk_size(),
            near_miss_factor: default_near_miss_factor(),
            channel: default_channel(),
            max_concurrent: default_max_concurrent(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            invocation_timeout_seconds: default_invocation_timeout(),
            poll_interval_seconds: default_poll_interval(),
            claim_lease_seconds: default_claim_lease(),
            max_deliveries: default_max_deliveries(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_radius_km() -> f64 {
    20.0
}

fn default_ttl_days() -> i64 {
    7
}

fn default_insert_chunk_size() -> usize {
    500
}

fn default_near_miss_factor() -> f64 {
    1.5
}

fn default_channel() -> String {
    "post_created".to_string()
}

fn default_max_concurrent() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_invocation_timeout() -> u64 {
    60
}

fn default_poll_interval() -> u64 {
    30
}

fn default_claim_lease() -> u64 {
    300
}

fn default_max_deliveries() -> u32 {
    5
}
