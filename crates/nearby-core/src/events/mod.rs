//! Trigger events delivered to handlers by the runtime.
//!
//! The post-creation event carries a full post document and therefore
//! lives next to the post entity in `nearby-entity`; the events here
//! carry no domain payload.

pub mod tick;

pub use tick::ScheduledTick;
