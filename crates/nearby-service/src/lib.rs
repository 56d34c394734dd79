//! # nearby-service
//!
//! The proximity notification core. A post creation event flows through
//! the [`DispatchPipeline`]: the opt-in profile snapshot is filtered by
//! distance, one notification is built per accepted profile, and the
//! whole set is committed as one atomic batch. The [`ExpirySweeper`]
//! removes notifications past their expiration on a schedule.
//!
//! Storage is injected as gateway trait objects at construction time.

pub mod dispatch;
pub mod expiry;
pub mod geo;
pub mod notification;
pub mod proximity;

pub use dispatch::{DispatchOutcome, DispatchPipeline};
pub use expiry::{ExpirySweeper, SweepReport};
pub use geo::distance_km;
pub use notification::NotificationBuilder;
pub use proximity::{Candidate, CandidateFilter};
