//! Candidate selection by distance.

pub mod filter;

pub use filter::{Candidate, CandidateFilter};
