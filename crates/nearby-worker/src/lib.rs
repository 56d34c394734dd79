//! Event runtime for Nearby.
//!
//! This crate provides:
//! - A post-event runner that claims post creation events from the
//!   outbox and feeds them to the dispatch pipeline with bounded
//!   concurrency, a time budget, and retries
//! - A cron scheduler that invokes the expiry sweeper once a day
//! - The invocation helper both of them share

pub mod invoke;
pub mod runner;
pub mod scheduler;
pub mod source;

pub use invoke::{InvocationPolicy, invoke};
pub use runner::PostEventRunner;
pub use scheduler::CronScheduler;
pub use source::{ChannelSource, PostEventSource};
