//! # nearby-database
//!
//! The persistence gateway: the narrow set of queries and atomic batch
//! writes the dispatch pipeline and the expiry sweeper need, a PostgreSQL
//! implementation of them, an in-memory implementation, the post creation
//! outbox, and the listener that wakes the runner when a post is inserted.

pub mod connection;
pub mod gateway;
pub mod listener;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use gateway::{NotificationGateway, PostEventGateway, PostGateway, ProfileGateway};
pub use listener::PostCreatedListener;
pub use memory::MemoryGateway;
