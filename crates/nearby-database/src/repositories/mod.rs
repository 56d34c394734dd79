//! PostgreSQL implementations of the persistence gateway.

pub mod notification;
pub mod post;
pub mod post_event;
pub mod profile;

pub use notification::NotificationRepository;
pub use post::PostRepository;
pub use post_event::PostEventRepository;
pub use profile::ProfileRepository;
