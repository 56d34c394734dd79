//! Core traits defined in `nearby-core` and implemented by other crates.

pub mod handler;

pub use handler::EventHandler;
