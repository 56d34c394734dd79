//! Notification type tag and priority enumerations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use nearby_core::error::AppError;

/// Type tag distinguishing notification classes in the shared store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    /// A new post was created near the recipient.
    NearbyPost,
}

impl NotificationKind {
    /// Return the stored tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NearbyPost => "nearbyPost",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearbyPost" => Ok(Self::NearbyPost),
            other => Err(AppError::validation(format!(
                "Unknown notification type '{other}'"
            ))),
        }
    }
}

/// Delivery priority hint for the downstream delivery worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    /// Standard alerts. The only priority proximity notifications use.
    Medium,
}

impl NotificationPriority {
    /// Return the stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
        }
    }
}

impl FromStr for NotificationPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium" => Ok(Self::Medium),
            other => Err(AppError::validation(format!(
                "Unknown notification priority '{other}'"
            ))),
        }
    }
}
