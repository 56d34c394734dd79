//! Convenience result type alias for Nearby.

use crate::error::AppError;

/// A specialized `Result` type for Nearby operations.
pub type AppResult<T> = Result<T, AppError>;
