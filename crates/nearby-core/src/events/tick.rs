//! Scheduler tick event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One firing of a cron schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTick {
    /// Identifier of this firing, for log correlation.
    pub id: Uuid,
    /// Name of the scheduled task.
    pub task: String,
    /// When the scheduler fired.
    pub fired_at: DateTime<Utc>,
}

impl ScheduledTick {
    /// Create a tick for `task` firing now.
    pub fn now(task: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task: task.into(),
            fired_at: Utc::now(),
        }
    }
}
