//! Profile domain entities.

pub mod model;

pub use model::Profile;
