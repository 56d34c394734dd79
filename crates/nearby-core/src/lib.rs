//! # nearby-core
//!
//! Core crate for Nearby. Contains configuration schemas, typed
//! identifiers, trigger events, the handler trait invoked by the runtime,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Nearby crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
