//! # nearby-entity
//!
//! Domain entity models for Nearby. The serde representation of every
//! persisted struct is the wire contract shared with the mobile client
//! and downstream delivery workers: field names are camelCase and must
//! not be renamed.

pub mod geo;
pub mod notification;
pub mod post;
pub mod profile;

pub use geo::GeoPoint;
pub use notification::{
    NewNotification, Notification, NotificationKind, NotificationPayload, NotificationPriority,
};
pub use post::{Post, PostCategory, PostCreated, PostEvent};
pub use profile::Profile;
