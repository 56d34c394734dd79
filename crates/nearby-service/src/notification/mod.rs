//! Notification record construction.

pub mod builder;

pub use builder::{NEARBY_POST_TITLE, NotificationBuilder, format_distance};
