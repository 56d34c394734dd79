//! Scheduled removal of expired notifications.

pub mod sweeper;

pub use sweeper::{ExpirySweeper, SweepReport};
