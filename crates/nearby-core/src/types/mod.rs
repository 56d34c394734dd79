//! Core type definitions used across the Nearby workspace.

pub mod id;

pub use id::*;
