//! Post creation dispatch.

pub mod pipeline;

pub use pipeline::{DispatchOutcome, DispatchPipeline};
