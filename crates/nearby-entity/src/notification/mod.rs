//! Notification domain entities.

pub mod kind;
pub mod model;
pub mod payload;

pub use kind::{NotificationKind, NotificationPriority};
pub use model::{NewNotification, Notification};
pub use payload::NotificationPayload;
