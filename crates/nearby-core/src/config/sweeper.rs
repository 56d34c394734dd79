//! Expiry sweeper configuration.

use serde::{Deserialize, Serialize};

/// Settings for the scheduled removal of expired notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Whether the sweep is registered with the scheduler.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression evaluated in UTC.
    ///
    /// The default fires at 06:00 UTC, which is 03:00 in São Paulo.
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Maximum notifications removed per run.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
    /// Time budget of one sweep.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            schedule: default_schedule(),
            batch_limit: default_batch_limit(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    "0 0 6 * * *".to_string()
}

fn default_batch_limit() -> usize {
    500
}

fn default_timeout() -> u64 {
    120
}
